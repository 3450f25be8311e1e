use crate::facts::github::PullRequestDto;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A merged pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub author: Option<String>,
    pub merged_at: DateTime<Utc>,
    pub head_ref: String,
    pub url: String,
}

impl PullRequest {
    /// Convert a closed pull request, returning `None` when it was closed without merging.
    #[must_use]
    pub fn from_dto(dto: PullRequestDto) -> Option<Self> {
        Some(Self {
            merged_at: dto.merged_at?,
            number: dto.number,
            title: dto.title,
            author: dto.user.map(|u| u.login),
            head_ref: dto.head.ref_name,
            url: dto.html_url,
        })
    }
}
