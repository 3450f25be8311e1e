//! Access to the GitHub REST API.

mod api_types;
mod client;
mod github_error;
mod rate_limit;

pub use api_types::{BranchDto, CommitDetailDto, CommitDto, PullRequestDto, RepositoryDto};
pub use client::{ClientSettings, GitHubClient};
pub use github_error::GitHubError;
pub use rate_limit::RateLimitState;

/// Log target for the GitHub client
pub(crate) const LOG_TARGET: &str = "github";
