use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use strum::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "camelCase")]
pub enum CommitCategory {
    Feature,
    #[strum(serialize = "Bug Fix")]
    BugFix,
    Performance,
    Security,
    Test,
    Documentation,
    Refactor,
    #[strum(serialize = "Breaking Change")]
    Breaking,
    Deprecation,
}

/// Keyword patterns per category, matched case-insensitively against a commit's first line.
///
/// Every pattern is tested independently; a message may land in several categories.
pub const CATEGORY_PATTERNS: &[(CommitCategory, &str)] = &[
    (
        CommitCategory::Feature,
        r"\b(?:feat|feature|features|add|adds|added|adding|new|implement|implements|implemented|introduce|introduces|support)\b",
    ),
    (
        CommitCategory::BugFix,
        r"\b(?:fix|fixes|fixed|fixing|bug|bugs|bugfix|hotfix|issue|issues|resolve|resolves|resolved|patch)\b",
    ),
    (
        CommitCategory::Performance,
        r"\b(?:perf|performance|optimize|optimizes|optimized|optimise|optimised|optimization|speed|speedup|faster)\b",
    ),
    (
        CommitCategory::Security,
        r"\b(?:security|secure|vulnerability|vulnerabilities|cve|auth|authentication|authorization|xss|csrf|injection|sanitize)\b",
    ),
    (CommitCategory::Test, r"\b(?:test|tests|testing|spec|specs|coverage)\b"),
    (CommitCategory::Documentation, r"\b(?:doc|docs|documentation|readme|changelog|comment|comments)\b"),
    (
        CommitCategory::Refactor,
        r"\b(?:refactor|refactors|refactored|refactoring|cleanup|restructure|simplify|simplifies|rename|renames)\b",
    ),
    (CommitCategory::Breaking, r"\bbreaking\b|^\w+(?:\([^)]*\))?!:"),
    (CommitCategory::Deprecation, r"\b(?:deprecate|deprecates|deprecated|deprecation)\b"),
];

static CATEGORY_REGEXES: LazyLock<Vec<(CommitCategory, Regex)>> = LazyLock::new(|| {
    CATEGORY_PATTERNS
        .iter()
        .map(|(category, pattern)| (*category, Regex::new(&format!("(?i){pattern}")).expect("valid category regex")))
        .collect()
});

/// Categories whose keywords appear in the first line of `message`, in table order.
#[must_use]
pub fn categorize(message: &str) -> Vec<CommitCategory> {
    let first_line = message.lines().next().unwrap_or_default();
    CATEGORY_REGEXES
        .iter()
        .filter(|(_, regex)| regex.is_match(first_line))
        .map(|(category, _)| *category)
        .collect()
}

/// Whether `text` matches the keyword pattern of `category`.
#[must_use]
pub fn matches_category(text: &str, category: CommitCategory) -> bool {
    CATEGORY_REGEXES
        .iter()
        .any(|(c, regex)| *c == category && regex.is_match(text))
}

/// Number of commits per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCounts {
    pub feature: usize,
    pub bug_fix: usize,
    pub performance: usize,
    pub security: usize,
    pub test: usize,
    pub documentation: usize,
    pub refactor: usize,
    pub breaking: usize,
    pub deprecation: usize,
}

impl CategoryCounts {
    pub fn add(&mut self, category: CommitCategory) {
        let slot = match category {
            CommitCategory::Feature => &mut self.feature,
            CommitCategory::BugFix => &mut self.bug_fix,
            CommitCategory::Performance => &mut self.performance,
            CommitCategory::Security => &mut self.security,
            CommitCategory::Test => &mut self.test,
            CommitCategory::Documentation => &mut self.documentation,
            CommitCategory::Refactor => &mut self.refactor,
            CommitCategory::Breaking => &mut self.breaking,
            CommitCategory::Deprecation => &mut self.deprecation,
        };
        *slot += 1;
    }

    #[must_use]
    pub const fn get(&self, category: CommitCategory) -> usize {
        match category {
            CommitCategory::Feature => self.feature,
            CommitCategory::BugFix => self.bug_fix,
            CommitCategory::Performance => self.performance,
            CommitCategory::Security => self.security,
            CommitCategory::Test => self.test,
            CommitCategory::Documentation => self.documentation,
            CommitCategory::Refactor => self.refactor,
            CommitCategory::Breaking => self.breaking,
            CommitCategory::Deprecation => self.deprecation,
        }
    }
}
