use crate::facts::github::CommitDto;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest subject line kept for a commit, in characters.
pub const SUBJECT_MAX_CHARS: usize = 100;

const SHORT_SHA_LEN: usize = 7;

/// A commit as observed through the GitHub API.
///
/// Identity is the full `sha`. When the same commit is reachable from several branches, the
/// record is shared and `branches` lists every branch it was observed on, in observation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub sha: String,
    pub short_sha: String,
    pub author_name: String,
    pub author_email: String,
    pub author_login: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub subject: String,
    pub parents: Vec<String>,
    pub branches: Vec<String>,
    pub is_merge: bool,
    pub url: Option<String>,
}

impl Commit {
    /// Build a commit record from its API representation, first observed on `branch`.
    #[must_use]
    pub fn from_dto(dto: CommitDto, branch: &str) -> Self {
        let author = dto.commit.author.as_ref();
        let timestamp = author
            .and_then(|a| a.date)
            .or_else(|| dto.commit.committer.as_ref().and_then(|c| c.date))
            .unwrap_or(DateTime::UNIX_EPOCH);

        let parents: Vec<String> = dto.parents.into_iter().map(|p| p.sha).collect();

        Self {
            short_sha: dto.sha.chars().take(SHORT_SHA_LEN).collect(),
            author_name: author.and_then(|a| a.name.clone()).unwrap_or_else(|| "Unknown".to_string()),
            author_email: author.and_then(|a| a.email.clone()).unwrap_or_else(|| "unknown".to_string()),
            author_login: dto.author.map(|u| u.login),
            timestamp,
            subject: subject_line(&dto.commit.message),
            is_merge: parents.len() > 1,
            parents,
            branches: vec![branch.to_string()],
            url: dto.html_url,
            sha: dto.sha,
        }
    }

    /// Record that this commit is also reachable from `branch`.
    pub fn add_branch(&mut self, branch: &str) {
        if !self.branches.iter().any(|b| b == branch) {
            self.branches.push(branch.to_string());
        }
    }

    #[must_use]
    pub fn is_on_branch(&self, branch: &str) -> bool {
        self.branches.iter().any(|b| b == branch)
    }
}

/// First line of a commit message, truncated to [`SUBJECT_MAX_CHARS`].
#[must_use]
pub fn subject_line(message: &str) -> String {
    let first = message.lines().next().unwrap_or_default().trim();
    if first.chars().count() <= SUBJECT_MAX_CHARS {
        return first.to_string();
    }

    let mut subject: String = first.chars().take(SUBJECT_MAX_CHARS - 3).collect();
    subject.push_str("...");
    subject
}
