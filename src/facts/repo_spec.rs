use core::fmt::{Display, Formatter, Result as FmtResult};
use core::str::FromStr;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

// Optional scheme, optional `user[:pass]@`, optional `www.`, then `github.com/owner/repo[.git][/]`.
// The `:` separator also admits scp-style `git@github.com:owner/repo.git`.
static GITHUB_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z][A-Za-z0-9+.\-]*://)?(?:[^@/\s]+@)?(?:www\.)?github\.com[/:]([A-Za-z0-9_.\-]+)/([A-Za-z0-9_.\-]+?)(?:\.git)?/?$")
        .expect("valid GitHub URL regex")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid GitHub URL")]
pub struct RepoUrlError;

/// The owner/name pair identifying a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoSpec {
    owner: String,
    repo: String,
}

impl RepoSpec {
    #[must_use]
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Extract the owner and repository name from a GitHub URL.
    pub fn parse_url(url: &str) -> Result<Self, RepoUrlError> {
        let captures = GITHUB_URL.captures(url.trim()).ok_or(RepoUrlError)?;
        let owner = &captures[1];
        let repo = &captures[2];

        if repo.is_empty() || repo == "." || repo == ".." {
            return Err(RepoUrlError);
        }

        Ok(Self::new(owner, repo))
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }

    #[must_use]
    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoSpec {
    type Err = RepoUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_url(s)
    }
}

impl Display for RepoSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
