//! Wire shapes of the GitHub REST API responses we consume. Only the fields we use are declared.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryDto {
    pub default_branch: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BranchDto {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDto {
    pub sha: String,
    #[serde(default)]
    pub html_url: Option<String>,
    pub commit: CommitInfoDto,
    #[serde(default)]
    pub author: Option<UserDto>,
    #[serde(default)]
    pub parents: Vec<ParentDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitInfoDto {
    #[serde(default)]
    pub author: Option<GitPersonDto>,
    #[serde(default)]
    pub committer: Option<GitPersonDto>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitPersonDto {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserDto {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParentDto {
    pub sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestDto {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub user: Option<UserDto>,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
    pub head: PullHeadDto,
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullHeadDto {
    #[serde(rename = "ref")]
    pub ref_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetailDto {
    pub sha: String,
    #[serde(default)]
    pub stats: Option<CommitStatsDto>,
    #[serde(default)]
    pub files: Vec<CommitFileDto>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CommitStatsDto {
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitFileDto {
    pub filename: String,
    #[serde(default)]
    pub patch: Option<String>,
}

/// Error body returned alongside non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBodyDto {
    pub message: String,
}
