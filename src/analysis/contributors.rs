use crate::facts::{Commit, CommitDetail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Aggregated activity of one commit author, keyed by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
    pub name: String,
    pub email: String,
    pub login: Option<String>,
    pub commits: usize,
    pub merges: usize,

    /// Lines added across commits whose details were fetched; `None` when no detail was available.
    pub additions: Option<u64>,
    pub deletions: Option<u64>,
    pub branches: BTreeSet<String>,
    pub first_commit: DateTime<Utc>,
    pub last_commit: DateTime<Utc>,
}

impl Contributor {
    fn new(commit: &Commit) -> Self {
        Self {
            name: commit.author_name.clone(),
            email: commit.author_email.clone(),
            login: commit.author_login.clone(),
            commits: 0,
            merges: 0,
            additions: None,
            deletions: None,
            branches: BTreeSet::new(),
            first_commit: commit.timestamp,
            last_commit: commit.timestamp,
        }
    }

    fn record(&mut self, commit: &Commit, detail: Option<&CommitDetail>) {
        self.commits += 1;
        if commit.is_merge {
            self.merges += 1;
        }

        if self.login.is_none() {
            self.login.clone_from(&commit.author_login);
        }

        self.branches.extend(commit.branches.iter().cloned());
        self.first_commit = self.first_commit.min(commit.timestamp);
        self.last_commit = self.last_commit.max(commit.timestamp);

        if let Some(detail) = detail {
            *self.additions.get_or_insert(0) += detail.additions;
            *self.deletions.get_or_insert(0) += detail.deletions;
        }
    }
}

/// Folds commits into per-author totals, most active first.
///
/// Authors with equal commit counts keep the order in which they were first seen.
#[must_use]
pub fn fold_contributors<'a>(
    commits: impl IntoIterator<Item = &'a Commit>,
    details: &HashMap<String, CommitDetail>,
) -> Vec<Contributor> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut contributors: Vec<Contributor> = Vec::new();

    for commit in commits {
        let slot = *index.entry(commit.author_email.clone()).or_insert_with(|| {
            contributors.push(Contributor::new(commit));
            contributors.len() - 1
        });

        contributors[slot].record(commit, details.get(&commit.sha));
    }

    contributors.sort_by(|a, b| b.commits.cmp(&a.commits));
    contributors
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};

    fn commit(sha: &str, email: &str, day: u32, branches: &[&str], merge: bool) -> Commit {
        Commit {
            sha: sha.to_string(),
            short_sha: sha.to_string(),
            author_name: email.split('@').next().unwrap_or_default().to_string(),
            author_email: email.to_string(),
            author_login: None,
            timestamp: Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap(),
            subject: format!("commit {sha}"),
            parents: if merge { vec!["p1".into(), "p2".into()] } else { vec!["p1".into()] },
            branches: branches.iter().map(ToString::to_string).collect(),
            is_merge: merge,
            url: None,
        }
    }

    #[test]
    fn test_commit_counts_sum_to_total() {
        let commits = vec![
            commit("a", "ann@example.com", 1, &["main"], false),
            commit("b", "bob@example.com", 2, &["main", "dev"], true),
            commit("c", "ann@example.com", 3, &["feature/x"], false),
            commit("d", "cy@example.com", 4, &["main"], false),
            commit("e", "ann@example.com", 5, &["main"], false),
        ];

        let contributors = fold_contributors(&commits, &HashMap::new());
        assert_eq!(contributors.iter().map(|c| c.commits).sum::<usize>(), commits.len());
        assert_eq!(contributors[0].email, "ann@example.com");
        assert_eq!(contributors[0].commits, 3);
        assert_eq!(
            contributors[0].branches.iter().cloned().collect::<Vec<_>>(),
            vec!["feature/x".to_string(), "main".to_string()]
        );
        assert_eq!(contributors[0].first_commit.day(), 1);
        assert_eq!(contributors[0].last_commit.day(), 5);
        assert_eq!(contributors[1].email, "bob@example.com");
        assert_eq!(contributors[1].merges, 1);
    }

    #[test]
    fn test_line_totals_only_from_available_details() {
        let commits = vec![
            commit("a", "ann@example.com", 1, &["main"], false),
            commit("b", "ann@example.com", 2, &["main"], false),
            commit("c", "bob@example.com", 3, &["main"], false),
        ];
        let mut details = HashMap::new();
        let _ = details.insert(
            "a".to_string(),
            CommitDetail {
                sha: "a".into(),
                additions: 10,
                deletions: 4,
                diff: String::new(),
            },
        );

        let contributors = fold_contributors(&commits, &details);
        assert_eq!(contributors[0].additions, Some(10));
        assert_eq!(contributors[0].deletions, Some(4));
        assert_eq!(contributors[1].additions, None);
    }

    #[test]
    fn test_login_taken_from_later_commit() {
        let first = commit("a", "ann@example.com", 1, &["main"], false);
        let mut second = commit("b", "ann@example.com", 2, &["main"], false);
        second.author_login = Some("ann".into());

        let contributors = fold_contributors([&first, &second], &HashMap::new());
        assert_eq!(contributors[0].login.as_deref(), Some("ann"));
    }
}
