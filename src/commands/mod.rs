mod analyze;
mod common;
mod init;
mod serve;

pub use analyze::{AnalyzeArgs, analyze_repository};
pub use common::{GH_TOKEN_ENV, GITHUB_TOKEN_ENV, TokenArgs};
pub use init::{InitArgs, init_config};
pub use serve::{ServeArgs, serve_api};

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::io::Write;

/// Abstracts the process environment so the CLI can run inside tests.
pub trait Host {
    fn output(&mut self) -> impl Write;
    fn error(&mut self) -> impl Write;
    fn exit(&mut self, code: i32);
}

#[derive(Parser, Debug)]
#[command(name = "gitpulse", version, about = "Analyze branching and commit activity of GitHub repositories")]
struct Cli {
    /// Log debug output
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve(ServeArgs),

    /// Analyze a single repository and print the result
    Analyze(AnalyzeArgs),

    /// Write the default configuration file
    Init(InitArgs),
}

/// Parses `args` and runs the selected command, reporting the outcome through `host`.
pub async fn run<I, T>(host: &mut impl Host, args: I)
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            if e.use_stderr() {
                let _ = write!(host.error(), "{e}");
                host.exit(1);
            } else {
                let _ = write!(host.output(), "{e}");
                host.exit(0);
            }
            return;
        }
    };

    init_logging(cli.verbose);

    let result = match &cli.command {
        Command::Serve(args) => serve_api(args).await,
        Command::Analyze(args) => analyze_repository(host, args).await,
        Command::Init(args) => init_config(host, args),
    };

    match result {
        Ok(()) => host.exit(0),
        Err(e) => {
            let _ = writeln!(host.error(), "Error: {e:#}");
            host.exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    let _ = env_logger::Builder::new().filter_level(level).parse_default_env().try_init();
}
