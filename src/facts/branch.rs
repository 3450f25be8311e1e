use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub name: String,

    /// Whether this is the repository's default branch.
    pub is_default: bool,

    /// Commits reachable from this branch that fall inside the analysis window.
    pub commit_count: usize,

    /// Committed to inside the analysis window and not stale.
    pub is_active: bool,

    /// No commits inside the window, or last commit older than the staleness threshold.
    /// Always the complement of `is_active`.
    pub is_stale: bool,

    /// Timestamp of the newest commit observed on the branch.
    pub last_seen: Option<DateTime<Utc>>,
}

impl Branch {
    #[must_use]
    pub fn new(name: impl Into<String>, is_default: bool) -> Self {
        Self {
            name: name.into(),
            is_default,
            commit_count: 0,
            is_active: false,
            is_stale: true,
            last_seen: None,
        }
    }

    /// Recompute activity and staleness once `commit_count` is known.
    pub fn settle(&mut self, stale_before: DateTime<Utc>) {
        self.is_stale = self.commit_count == 0 || self.last_seen.is_none_or(|seen| seen < stale_before);
        self.is_active = !self.is_stale;
    }

    /// Note a commit observed on this branch.
    pub fn observe(&mut self, at: DateTime<Utc>) {
        if self.last_seen.is_none_or(|seen| at > seen) {
            self.last_seen = Some(at);
        }
    }
}
