use crate::facts::github::CommitDetailDto;
use core::fmt::Write;
use serde::{Deserialize, Serialize};

/// File-level detail of a single commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitDetail {
    pub sha: String,
    pub additions: u64,
    pub deletions: u64,

    /// Concatenated per-file patches, truncated to the configured budget.
    pub diff: String,
}

impl CommitDetail {
    #[must_use]
    pub fn from_dto(dto: CommitDetailDto, diff_char_limit: usize) -> Self {
        let (additions, deletions) = dto.stats.map_or((0, 0), |s| (s.additions, s.deletions));

        let mut diff = String::new();
        for file in &dto.files {
            let _ = writeln!(diff, "--- {}", file.filename);
            if let Some(patch) = &file.patch {
                diff.push_str(patch);
                diff.push('\n');
            }
        }

        Self {
            sha: dto.sha,
            additions,
            deletions,
            diff: truncate_chars(&diff, diff_char_limit),
        }
    }
}

/// Truncate to at most `limit` characters, marking the cut.
#[must_use]
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        None => text.to_string(),
        Some((byte_index, _)) => {
            let mut out = text.get(..byte_index).unwrap_or(text).to_string();
            out.push_str("\n... (truncated)");
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_dto_concatenates_and_truncates() {
        let dto: CommitDetailDto = serde_json::from_value(json!({
            "sha": "abc",
            "stats": { "additions": 12, "deletions": 3, "total": 15 },
            "files": [
                { "filename": "src/a.rs", "patch": "@@ -1 +1 @@\n-old\n+new" },
                { "filename": "logo.png" }
            ]
        }))
        .unwrap();

        let detail = CommitDetail::from_dto(dto, 2000);
        assert_eq!(detail.additions, 12);
        assert_eq!(detail.deletions, 3);
        assert!(detail.diff.starts_with("--- src/a.rs\n@@ -1 +1 @@"));
        assert!(detail.diff.contains("--- logo.png"));

        let dto: CommitDetailDto = serde_json::from_value(json!({
            "sha": "big",
            "files": [{ "filename": "big.txt", "patch": "x".repeat(5000) }]
        }))
        .unwrap();
        let detail = CommitDetail::from_dto(dto, 2000);
        assert_eq!(detail.additions, 0);
        assert!(detail.diff.ends_with("... (truncated)"));
        assert!(detail.diff.len() < 2100);
    }

    #[test]
    fn test_truncate_chars_keeps_short_text() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("exactly", 7), "exactly");
    }
}
