use crate::commands::common::{TokenArgs, build_context, load_config};
use crate::server::serve;
use camino::Utf8PathBuf;
use clap::Args;
use core::net::SocketAddr;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, value_name = "ADDR", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Path to configuration file (default is `gitpulse.toml` in the working directory)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub tokens: TokenArgs,
}

pub async fn serve_api(args: &ServeArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref())?;
    let context = build_context(config, &args.tokens)?;
    serve(Arc::new(context), args.bind).await
}
