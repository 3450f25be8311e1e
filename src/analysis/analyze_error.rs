use crate::facts::RepoUrlError;
use crate::facts::github::GitHubError;

/// Why an analysis request could not produce a result.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error(transparent)]
    InvalidRepoUrl(#[from] RepoUrlError),

    #[error("GitHub API rate limit exceeded, retry in {retry_after}s")]
    RateLimited { retry_after: u64 },

    #[error(transparent)]
    Upstream(GitHubError),
}

impl From<GitHubError> for AnalyzeError {
    fn from(error: GitHubError) -> Self {
        match error {
            GitHubError::RateLimited { retry_after } => Self::RateLimited { retry_after },
            other => Self::Upstream(other),
        }
    }
}
