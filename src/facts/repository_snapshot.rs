use crate::facts::repo_spec::RepoSpec;
use crate::facts::time_range::TimeRange;
use crate::facts::{Branch, Commit, CommitDetail, FetchWarning, PullRequest};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

/// Everything gathered from GitHub for one analysis, before classification.
#[derive(Debug, Clone)]
pub struct RepositorySnapshot {
    pub repo: RepoSpec,
    pub default_branch: String,
    pub time_range: TimeRange,
    pub since: Option<DateTime<Utc>>,
    pub fetched_at: DateTime<Utc>,

    /// Deduplicated commits, newest first.
    pub commits: Vec<Commit>,

    /// Analyzed branches, default branch first.
    pub branches: Vec<Branch>,

    /// Merged pull requests among the most recently closed ones.
    pub pull_requests: Vec<PullRequest>,

    /// File-level detail for the most recent window commits, keyed by sha.
    pub commit_details: HashMap<String, CommitDetail>,

    /// Detected CI/CD tools, or `None` when detection is disabled.
    pub ci_cd_tools: Option<Vec<String>>,

    pub warnings: Vec<FetchWarning>,

    /// Upstream requests issued, per endpoint category.
    pub api_requests: BTreeMap<String, u64>,
}

impl RepositorySnapshot {
    #[must_use]
    pub fn in_window(&self, at: DateTime<Utc>) -> bool {
        self.time_range.contains(self.fetched_at, at)
    }

    /// Commits inside the analysis window, newest first.
    pub fn window_commits(&self) -> impl Iterator<Item = &Commit> {
        self.commits.iter().filter(|c| self.in_window(c.timestamp))
    }

    /// Merged pull requests inside the analysis window.
    pub fn window_pull_requests(&self) -> impl Iterator<Item = &PullRequest> {
        self.pull_requests.iter().filter(|pr| self.in_window(pr.merged_at))
    }
}
