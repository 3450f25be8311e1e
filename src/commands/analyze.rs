use crate::commands::Host;
use crate::commands::common::{TokenArgs, build_context, load_config};
use crate::facts::{ProgressReporter, RequestTracker, TimeRange};
use crate::misc::{ColorMode, OutputFormat};
use crate::reports::generate_text;
use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use core::time::Duration;
use std::io::Write;

const PROGRESS_DELAY: Duration = Duration::from_millis(500);

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Repository URL, e.g. `https://github.com/owner/repo`
    #[arg(value_name = "REPO_URL")]
    pub repo_url: String,

    /// Time window to analyze
    #[arg(long, short = 't', value_enum, value_name = "RANGE", default_value_t = TimeRange::Week)]
    pub time_range: TimeRange,

    /// Output format
    #[arg(long, short = 'f', value_enum, value_name = "FORMAT", default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Color mode for text output
    #[arg(long, value_enum, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Path to configuration file (default is `gitpulse.toml` in the working directory)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub tokens: TokenArgs,
}

pub async fn analyze_repository(host: &mut impl Host, args: &AnalyzeArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref())?;
    let context = build_context(config, &args.tokens)?;

    let progress = ProgressReporter::new(PROGRESS_DELAY);
    let tracker = RequestTracker::with_progress(progress.clone());
    let result = context.analyze(&args.repo_url, args.time_range, tracker).await;
    progress.finish_and_clear();
    let result = result.with_context(|| format!("analyzing '{}'", args.repo_url))?;

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(result.as_ref()).context("serializing the analysis")?;
            writeln!(host.output(), "{json}").context("writing the analysis")?;
        }
        OutputFormat::Text => {
            generate_text(&result, args.color.enabled_for_stdout(), host.output()).context("writing the report")?;
        }
    }

    Ok(())
}
