//! Gathers commits, branches and pull requests for one repository.
//!
//! The default branch is always fetched without the time-range filter so that the most recent
//! activity is visible even for narrow windows; every other branch is filtered server-side with
//! `since`. Window-scoped statistics intersect with the window afterwards.
//!
//! Failures while paging through a single branch, the pull request list, a commit detail or a
//! tooling probe are recorded as [`FetchWarning`]s and do not abort the fetch. Only failures to
//! resolve the repository itself propagate.

use crate::config::Config;
use crate::facts::clock::Clock;
use crate::facts::github::{BranchDto, CommitDetailDto, CommitDto, GitHubClient, GitHubError, PullRequestDto, RepositoryDto};
use crate::facts::repo_spec::RepoSpec;
use crate::facts::time_range::TimeRange;
use crate::facts::tooling::detect_tooling;
use crate::facts::{Branch, Commit, CommitDetail, FetchWarning, PullRequest, RepositorySnapshot, RequestTracker};
use chrono::{DateTime, SecondsFormat, Utc};
use futures::future::join_all;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Instant;

const LOG_TARGET: &str = "fetcher";

/// Deduplicating accumulator of commits observed across branches.
///
/// The first branch a commit is observed on owns the record; later observations only extend its
/// branch list.
#[derive(Debug, Default)]
pub struct CommitIndex {
    positions: HashMap<String, usize>,
    commits: Vec<Commit>,
    observations: usize,
}

impl CommitIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a commit seen on `branch`. Returns the commit's timestamp.
    pub fn observe(&mut self, dto: CommitDto, branch: &str) -> DateTime<Utc> {
        self.observations += 1;

        if let Some(&index) = self.positions.get(&dto.sha) {
            let commit = &mut self.commits[index];
            commit.add_branch(branch);
            return commit.timestamp;
        }

        let commit = Commit::from_dto(dto, branch);
        let timestamp = commit.timestamp;
        let _ = self.positions.insert(commit.sha.clone(), self.commits.len());
        self.commits.push(commit);
        timestamp
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Total observations, including repeats of the same commit.
    #[must_use]
    pub const fn observations(&self) -> usize {
        self.observations
    }

    /// The deduplicated commits, newest first.
    #[must_use]
    pub fn into_sorted(self) -> Vec<Commit> {
        let mut commits = self.commits;
        commits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        commits
    }
}

#[derive(Debug)]
pub struct RepositoryFetcher<'a> {
    client: &'a GitHubClient,
    config: &'a Config,
    clock: &'a dyn Clock,
    tracker: RequestTracker,
}

impl<'a> RepositoryFetcher<'a> {
    #[must_use]
    pub const fn new(client: &'a GitHubClient, config: &'a Config, clock: &'a dyn Clock, tracker: RequestTracker) -> Self {
        Self {
            client,
            config,
            clock,
            tracker,
        }
    }

    pub async fn fetch(&self, repo: &RepoSpec, time_range: TimeRange) -> Result<RepositorySnapshot, GitHubError> {
        self.client.ensure_not_throttled()?;

        let start_time = Instant::now();
        let now = self.clock.now();
        let since = time_range.since(now);
        let mut warnings = Vec::new();

        log::info!(target: LOG_TARGET, "Analyzing {repo} over '{time_range}'");

        let repository: RepositoryDto = self.get("repository", &repo_path(repo, ""), &[]).await?;
        let default_branch = repository.default_branch;

        let branch_names = self.list_branches(repo, &default_branch, &mut warnings).await;

        let mut index = CommitIndex::new();
        let mut branches = Vec::with_capacity(branch_names.len());
        for name in branch_names {
            let is_default = name == default_branch;
            let mut branch = Branch::new(name, is_default);
            self.fetch_branch_commits(repo, &mut branch, since, &mut index, &mut warnings).await;
            branches.push(branch);
        }

        log::debug!(
            target: LOG_TARGET,
            "Observed {} commit(s) across {} branch(es), {} unique",
            index.observations(),
            branches.len(),
            index.len()
        );

        let commits = index.into_sorted();

        let stale_before = now - chrono::Duration::from_std(self.config.stale_after).unwrap_or(chrono::Duration::days(90));
        for branch in &mut branches {
            branch.commit_count = commits
                .iter()
                .filter(|c| time_range.contains(now, c.timestamp) && c.is_on_branch(&branch.name))
                .count();
            branch.settle(stale_before);
        }

        let pull_requests = self.fetch_merged_pull_requests(repo, &mut warnings).await;

        let detail_shas: Vec<&str> = commits
            .iter()
            .filter(|c| time_range.contains(now, c.timestamp))
            .take(self.config.detail_commit_limit)
            .map(|c| c.sha.as_str())
            .collect();
        let commit_details = self.fetch_commit_details(repo, &detail_shas, &mut warnings).await;

        let ci_cd_tools = if self.config.detect_tooling {
            Some(detect_tooling(self.client, repo, &default_branch, &self.tracker).await)
        } else {
            None
        };

        for warning in &warnings {
            log::warn!(target: LOG_TARGET, "{repo}: {warning}");
        }

        log::info!(
            target: LOG_TARGET,
            "Fetched {repo}: {} commit(s), {} branch(es), {} merged PR(s), {} request(s) in {:.3}s",
            commits.len(),
            branches.len(),
            pull_requests.len(),
            self.tracker.total_issued(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(RepositorySnapshot {
            repo: repo.clone(),
            default_branch,
            time_range,
            since,
            fetched_at: now,
            commits,
            branches,
            pull_requests,
            commit_details,
            ci_cd_tools,
            warnings,
            api_requests: self.tracker.issued_counts(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, category: &str, path: &str, params: &[(&str, String)]) -> Result<T, GitHubError> {
        self.tracker.add_request(category);
        let result = self.client.request(path, params).await;
        self.tracker.complete_request(category);
        result
    }

    /// Branch names to analyze: the default branch first, then listed branches up to the cap.
    async fn list_branches(&self, repo: &RepoSpec, default_branch: &str, warnings: &mut Vec<FetchWarning>) -> Vec<String> {
        let cap = self.config.max_branches;
        let per_page = self.config.per_page;
        let mut names = vec![default_branch.to_string()];
        let mut page = 1u32;

        while names.len() < cap {
            let params = [("per_page", per_page.to_string()), ("page", page.to_string())];
            let batch: Vec<BranchDto> = match self.get("branches", &repo_path(repo, "/branches"), &params).await {
                Ok(batch) => batch,
                Err(e) => {
                    warnings.push(FetchWarning::new("branches", format!("stopped listing at page {page}: {e}")));
                    break;
                }
            };

            let exhausted = batch.len() < per_page as usize;
            for dto in batch {
                if names.len() >= cap {
                    break;
                }
                if dto.name != default_branch {
                    names.push(dto.name);
                }
            }

            if exhausted {
                break;
            }
            page += 1;
        }

        names
    }

    async fn fetch_branch_commits(
        &self,
        repo: &RepoSpec,
        branch: &mut Branch,
        since: Option<DateTime<Utc>>,
        index: &mut CommitIndex,
        warnings: &mut Vec<FetchWarning>,
    ) {
        let per_page = self.config.per_page;
        let (max_pages, since) = if branch.is_default {
            (self.config.primary_branch_pages, None)
        } else {
            (self.config.branch_pages, since)
        };

        for page in 1..=max_pages {
            let mut params = vec![
                ("sha", branch.name.clone()),
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ];
            if let Some(since) = since {
                params.push(("since", since.to_rfc3339_opts(SecondsFormat::Secs, true)));
            }

            let batch: Vec<CommitDto> = match self.get("commits", &repo_path(repo, "/commits"), &params).await {
                Ok(batch) => batch,
                Err(e) => {
                    warnings.push(FetchWarning::branch(&branch.name, page, &e));
                    break;
                }
            };

            let exhausted = batch.len() < per_page as usize;
            for dto in batch {
                let timestamp = index.observe(dto, &branch.name);
                branch.observe(timestamp);
            }

            if exhausted {
                break;
            }
        }
    }

    async fn fetch_merged_pull_requests(&self, repo: &RepoSpec, warnings: &mut Vec<FetchWarning>) -> Vec<PullRequest> {
        let params = [
            ("state", "closed".to_string()),
            ("sort", "updated".to_string()),
            ("direction", "desc".to_string()),
            ("per_page", self.config.max_pull_requests.to_string()),
            ("page", "1".to_string()),
        ];

        match self.get::<Vec<PullRequestDto>>("pulls", &repo_path(repo, "/pulls"), &params).await {
            Ok(dtos) => dtos.into_iter().filter_map(PullRequest::from_dto).collect(),
            Err(e) => {
                warnings.push(FetchWarning::new("pull_requests", e.to_string()));
                Vec::new()
            }
        }
    }

    async fn fetch_commit_details(&self, repo: &RepoSpec, shas: &[&str], warnings: &mut Vec<FetchWarning>) -> HashMap<String, CommitDetail> {
        let requests = shas.iter().map(|sha| async move {
            let result = self.get::<CommitDetailDto>("commit", &repo_path(repo, &format!("/commits/{sha}")), &[]).await;
            (*sha, result)
        });

        let mut details = HashMap::with_capacity(shas.len());
        for (sha, result) in join_all(requests).await {
            match result {
                Ok(dto) => {
                    let _ = details.insert(sha.to_string(), CommitDetail::from_dto(dto, self.config.diff_char_limit));
                }
                Err(e) => warnings.push(FetchWarning::new(format!("commit:{sha}"), e.to_string())),
            }
        }
        details
    }
}

fn repo_path(repo: &RepoSpec, suffix: &str) -> String {
    format!("repos/{}/{}{suffix}", repo.owner(), repo.repo())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dto(sha: &str, date: &str) -> CommitDto {
        serde_json::from_value(json!({
            "sha": sha,
            "commit": {
                "author": { "name": "Ada", "email": "ada@example.com", "date": date },
                "message": "Add thing"
            },
            "parents": []
        }))
        .unwrap()
    }

    #[test]
    fn test_commit_seen_on_two_branches_is_recorded_once() {
        let mut index = CommitIndex::new();
        let _ = index.observe(dto("abc123", "2024-05-01T10:00:00Z"), "main");
        let _ = index.observe(dto("abc123", "2024-05-01T10:00:00Z"), "feature/x");

        assert_eq!(index.len(), 1);
        assert_eq!(index.observations(), 2);
        let commits = index.into_sorted();
        assert_eq!(commits[0].branches, vec!["main", "feature/x"]);
    }

    #[test]
    fn test_dedup_count_equals_distinct_shas() {
        let mut index = CommitIndex::new();
        let observations = [
            ("a", "main"),
            ("b", "main"),
            ("c", "main"),
            ("b", "dev"),
            ("d", "dev"),
            ("a", "feature/y"),
            ("d", "feature/y"),
        ];
        for (sha, branch) in observations {
            let _ = index.observe(dto(sha, "2024-05-01T10:00:00Z"), branch);
        }

        assert_eq!(index.len(), 4);
        assert!(index.len() <= index.observations());
    }

    #[test]
    fn test_into_sorted_is_newest_first() {
        let mut index = CommitIndex::new();
        let _ = index.observe(dto("old", "2024-01-01T00:00:00Z"), "main");
        let _ = index.observe(dto("new", "2024-03-01T00:00:00Z"), "main");
        let _ = index.observe(dto("mid", "2024-02-01T00:00:00Z"), "dev");

        let shas: Vec<_> = index.into_sorted().into_iter().map(|c| c.sha).collect();
        assert_eq!(shas, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_repo_path() {
        let repo = RepoSpec::new("octo", "demo");
        assert_eq!(repo_path(&repo, ""), "repos/octo/demo");
        assert_eq!(repo_path(&repo, "/branches"), "repos/octo/demo/branches");
    }
}
