use crate::analysis::{BranchPatternCounts, CategoryCounts, CommitCategory, Contributor, Keyword, Strategy, WorkArea, Workflow};
use crate::facts::{Branch, Commit, FetchWarning, PullRequest, TimeRange};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The complete outcome of analyzing one repository over one time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub repository: RepositoryInfo,
    pub time_range: TimeRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,
    pub generated_at: DateTime<Utc>,

    /// Every deduplicated commit, newest first.
    pub commits: Vec<ClassifiedCommit>,
    pub branches: Vec<Branch>,
    pub active_branches: Vec<String>,
    pub stale_branches: Vec<String>,
    pub contributors: Vec<Contributor>,
    pub pull_requests: Vec<PullRequest>,
    pub branching: BranchingSummary,
    pub commit_categories: CategoryCounts,
    pub work_areas: Vec<WorkArea>,
    pub keywords: Vec<Keyword>,
    pub window_pull_requests: WindowPullRequests,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executive_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ci_cd_tools: Option<Vec<String>>,
    pub warnings: Vec<FetchWarning>,
    pub stats: AnalysisStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryInfo {
    pub owner: String,
    pub repo: String,
    pub default_branch: String,
    pub url: String,
}

/// A commit together with the categories its subject falls into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedCommit {
    #[serde(flatten)]
    pub commit: Commit,
    pub categories: Vec<CommitCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchingSummary {
    pub pattern_counts: BranchPatternCounts,
    pub workflow: Workflow,
    pub strategy: Strategy,
    pub workflow_explanation: String,
    pub strategy_explanation: String,
    pub detection_criteria: Vec<String>,
}

/// Pull requests merged inside the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowPullRequests {
    pub merged: usize,
    pub features_shipped: usize,
    pub bugs_fixed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStats {
    pub total_commits: usize,
    pub window_commits: usize,
    pub branches_analyzed: usize,

    /// Upstream requests issued, per endpoint category.
    pub api_requests: BTreeMap<String, u64>,
}
