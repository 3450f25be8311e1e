use crate::analysis::AnalysisContext;
use crate::config::Config;
use crate::facts::SystemClock;
use crate::reports::ExecutiveSummarizer;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use std::sync::Arc;

const LOG_TARGET: &str = "cli";

pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const GH_TOKEN_ENV: &str = "GH_TOKEN";

#[derive(Args, Debug, Clone, Default)]
pub struct TokenArgs {
    /// GitHub access token; falls back to `GH_TOKEN` when `GITHUB_TOKEN` is unset
    #[arg(long, value_name = "TOKEN", env = GITHUB_TOKEN_ENV, hide_env_values = true)]
    pub github_token: Option<String>,
}

impl TokenArgs {
    #[must_use]
    pub fn resolve(&self) -> Option<String> {
        self.github_token
            .clone()
            .or_else(|| std::env::var(GH_TOKEN_ENV).ok())
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    }
}

pub fn load_config(config_path: Option<&Utf8PathBuf>) -> anyhow::Result<Config> {
    let cwd = std::env::current_dir().context("determining the working directory")?;
    let base_dir = Utf8PathBuf::from_path_buf(cwd).map_err(|p| anyhow::anyhow!("working directory '{}' is not valid UTF-8", p.display()))?;
    Config::load(Utf8Path::new(&base_dir), config_path)
}

pub fn build_context(config: Config, tokens: &TokenArgs) -> anyhow::Result<AnalysisContext> {
    let token = tokens.resolve();
    if token.is_none() {
        log::warn!(target: LOG_TARGET, "No GitHub token configured, requests are limited to 60 per hour");
    }

    let summarizer = ExecutiveSummarizer::from_env(&config.llm)?;
    AnalysisContext::new(config, token, Arc::new(SystemClock), summarizer)
}
