use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Leading `type(scope)!: ` marker of a conventional commit title.
static CONVENTIONAL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[A-Za-z]+(?:\([^)]*\))?!?:\s*").expect("valid prefix regex"));

const VERBS: &[&str] = &[
    "add", "adds", "added", "adding", "fix", "fixes", "fixed", "fixing", "update", "updates", "updated", "updating",
    "improve", "improves", "improved", "improving",
];

const MAX_TOKENS: usize = 4;
const MIN_AREA_CHARS: usize = 6;
const MAX_AREA_CHARS: usize = 59;

/// Number of work areas reported in an analysis.
pub const TOP_WORK_AREAS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkArea {
    pub area: String,
    pub count: usize,
}

/// Reduces a pull request title to a short lower-case phrase naming the part of the system it touches.
///
/// Returns `None` when nothing of a usable length remains.
#[must_use]
pub fn extract_work_area(title: &str) -> Option<String> {
    let stripped = CONVENTIONAL_PREFIX.replace(title, "");

    let area = stripped
        .split_whitespace()
        .filter(|token| !VERBS.iter().any(|verb| token.eq_ignore_ascii_case(verb)))
        .filter(|token| token.chars().count() > 2)
        .take(MAX_TOKENS)
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");

    let len = area.chars().count();
    (MIN_AREA_CHARS..=MAX_AREA_CHARS).contains(&len).then_some(area)
}

/// Tallies work areas across `titles` and returns the `limit` most frequent.
///
/// Ties keep the order in which areas were first encountered.
#[must_use]
pub fn top_work_areas<'a>(titles: impl IntoIterator<Item = &'a str>, limit: usize) -> Vec<WorkArea> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut tally: Vec<WorkArea> = Vec::new();

    for area in titles.into_iter().filter_map(extract_work_area) {
        if let Some(&slot) = index.get(&area) {
            tally[slot].count += 1;
        } else {
            let _ = index.insert(area.clone(), tally.len());
            tally.push(WorkArea { area, count: 1 });
        }
    }

    tally.sort_by(|a, b| b.count.cmp(&a.count));
    tally.truncate(limit);
    tally
}
