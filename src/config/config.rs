use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "gitpulse.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root of the GitHub REST API
    pub github_api_url: String,

    /// Minimum spacing between two upstream requests
    #[serde(with = "humantime_serde")]
    pub min_request_interval: Duration,

    /// Remaining-request count below which upstream calls pause until the reset time
    pub rate_limit_low_water: u64,

    /// Attempts per request on 403/429 or transport failure
    pub max_attempts: u32,

    /// Base of the exponential retry backoff
    #[serde(with = "humantime_serde")]
    pub backoff_base: Duration,

    /// Timeout of a single upstream request
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Maximum number of branches analyzed
    pub max_branches: usize,

    /// Commit pages fetched for the default branch
    pub primary_branch_pages: u32,

    /// Commit pages fetched for every other branch
    pub branch_pages: u32,

    /// Page size for paginated endpoints
    pub per_page: u32,

    /// Most recent closed pull requests inspected
    pub max_pull_requests: u32,

    /// Age after which a branch without recent commits is stale
    #[serde(with = "humantime_serde")]
    pub stale_after: Duration,

    /// Lifetime of cached analysis results
    #[serde(with = "humantime_serde")]
    pub cache_ttl: Duration,

    /// Recent commits whose file-level detail is fetched
    pub detail_commit_limit: usize,

    /// Per-commit diff budget in the executive summary prompt
    pub diff_char_limit: usize,

    /// Whether to probe for CI/CD configuration files
    pub detect_tooling: bool,

    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// When no explicit path is given, `gitpulse.toml` in `base_dir` is used if it exists.
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> anyhow::Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).with_context(|| format!("reading configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    // No config file found, use defaults
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).with_context(|| format!("reading configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).with_context(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        log::debug!("Loaded configuration from '{final_path}'");
        Ok(config)
    }

    /// Save the default configuration to a TOML file
    pub fn save_default(output_path: &Utf8Path) -> anyhow::Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).with_context(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> anyhow::Result<()> {
        let api_url = Url::parse(&self.github_api_url).with_context(|| format!("github_api_url '{}' is not a valid URL", self.github_api_url))?;
        if !matches!(api_url.scheme(), "http" | "https") {
            anyhow::bail!("github_api_url must use http or https, got '{}'", api_url.scheme());
        }

        if self.max_attempts == 0 {
            anyhow::bail!("max_attempts must be at least 1");
        }

        if !(1..=100).contains(&self.per_page) {
            anyhow::bail!("per_page must be between 1 and 100, got {}", self.per_page);
        }

        if !(1..=100).contains(&self.max_pull_requests) {
            anyhow::bail!("max_pull_requests must be between 1 and 100, got {}", self.max_pull_requests);
        }

        if self.max_branches == 0 {
            anyhow::bail!("max_branches must be at least 1");
        }

        if self.primary_branch_pages == 0 || self.branch_pages == 0 {
            anyhow::bail!(
                "primary_branch_pages ({}) and branch_pages ({}) must be at least 1",
                self.primary_branch_pages,
                self.branch_pages
            );
        }

        if self.stale_after.is_zero() {
            anyhow::bail!("stale_after must be greater than zero");
        }

        if !self.llm.endpoint.is_empty() {
            let _ = Url::parse(&self.llm.endpoint).with_context(|| format!("llm.endpoint '{}' is not a valid URL", self.llm.endpoint))?;
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
    }

    #[test]
    fn test_default_values_match_documented_bounds() {
        let config = Config::default();
        assert_eq!(config.min_request_interval, Duration::from_secs(1));
        assert_eq!(config.rate_limit_low_water, 10);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.max_branches, 20);
        assert_eq!(config.primary_branch_pages, 3);
        assert_eq!(config.branch_pages, 2);
        assert_eq!(config.per_page, 100);
        assert_eq!(config.max_pull_requests, 100);
        assert_eq!(config.stale_after, Duration::from_secs(90 * 24 * 60 * 60));
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.diff_char_limit, 2000);
    }

    #[test]
    fn test_validate_zero_attempts() {
        let config = Config { max_attempts: 0, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_per_page_out_of_range() {
        let config = Config { per_page: 0, ..Config::default() };
        assert!(config.validate().is_err());

        let config = Config { per_page: 101, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_pages() {
        let config = Config { branch_pages: 0, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_api_url() {
        let config = Config {
            github_api_url: "ftp://example.com".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            github_api_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_default_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let output_path = Utf8PathBuf::try_from(tmp.path().join(CONFIG_FILE_NAME)).unwrap();
        Config::save_default(&output_path).unwrap();
        let loaded = Config::load(&Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap(), Some(&output_path)).unwrap();
        loaded.validate().unwrap();
    }

    #[test]
    fn test_load_missing_config_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let base_dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        let config = Config::load(&base_dir, None).unwrap();
        assert_eq!(config.github_api_url, "https://api.github.com");
    }

    #[test]
    fn test_load_picks_up_file_in_base_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let base_dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        let text = DEFAULT_CONFIG_TOML.replace("max_branches = 20", "max_branches = 5");
        fs::write(base_dir.join(CONFIG_FILE_NAME), text).unwrap();

        let config = Config::load(&base_dir, None).unwrap();
        assert_eq!(config.max_branches, 5);
    }

    #[test]
    fn test_load_rejects_unknown_fields() {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("custom.toml")).unwrap();
        fs::write(&path, format!("bogus = 1\n{DEFAULT_CONFIG_TOML}")).unwrap();
        let base_dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        assert!(Config::load(&base_dir, Some(&path)).is_err());
    }

    #[test]
    fn test_load_explicit_missing_file_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let base_dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        let path = base_dir.join("absent.toml");
        let err = Config::load(&base_dir, Some(&path)).unwrap_err();
        assert!(err.to_string().contains("reading configuration file"));
    }
}
