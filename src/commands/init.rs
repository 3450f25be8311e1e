use crate::commands::Host;
use crate::config::{CONFIG_FILE_NAME, Config};
use camino::Utf8PathBuf;
use clap::Args;
use std::io::Write;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Output configuration file path
    #[arg(long, short = 'o', value_name = "PATH", default_value = CONFIG_FILE_NAME)]
    pub output: Utf8PathBuf,
}

pub fn init_config(host: &mut impl Host, args: &InitArgs) -> anyhow::Result<()> {
    Config::save_default(&args.output)?;
    let _ = writeln!(host.output(), "Generated default configuration file at {}", args.output);
    Ok(())
}
