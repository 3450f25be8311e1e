/// Failure talking to the GitHub REST API.
#[derive(Debug, thiserror::Error)]
pub enum GitHubError {
    /// Rate limited, either locally throttled or still rejected after the retry ceiling.
    #[error("GitHub API rate limit exceeded, retry in {retry_after}s")]
    RateLimited { retry_after: u64 },

    /// A non-success status that is not retried.
    #[error("GitHub API returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Network-level failure that persisted across every attempt.
    #[error("request to GitHub failed")]
    Transport(#[source] reqwest::Error),

    #[error("decoding GitHub response for '{endpoint}'")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

impl GitHubError {
    /// The upstream HTTP status, when there is one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited { .. } => Some(429),
            Self::Upstream { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Upstream { status: 404, .. })
    }
}
