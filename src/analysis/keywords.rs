use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Common verbs, articles and connectives that carry no signal about the work being done.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "into", "this", "that", "when", "then", "than", "also", "more", "some",
    "have", "been", "were", "will", "should", "could", "would", "make", "made", "makes", "using", "used", "uses",
    "update", "updated", "updates", "added", "adds", "fixed", "fixes", "remove", "removed", "merge", "merged",
    "branch", "pull", "request", "commit", "change", "changes",
];

const MIN_KEYWORD_CHARS: usize = 4;

/// Number of keywords reported in an analysis.
pub const TOP_KEYWORDS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub word: String,
    pub count: usize,
}

/// Most frequent non-trivial words across commit subjects, ties in first-seen order.
#[must_use]
pub fn top_keywords<'a>(subjects: impl IntoIterator<Item = &'a str>, limit: usize) -> Vec<Keyword> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut tally: Vec<Keyword> = Vec::new();

    for subject in subjects {
        for token in subject.split(|c: char| !c.is_alphanumeric()) {
            if token.chars().count() < MIN_KEYWORD_CHARS || token.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }

            let word = token.to_lowercase();
            if STOP_WORDS.contains(&word.as_str()) {
                continue;
            }

            if let Some(&slot) = index.get(&word) {
                tally[slot].count += 1;
            } else {
                let _ = index.insert(word.clone(), tally.len());
                tally.push(Keyword { word, count: 1 });
            }
        }
    }

    tally.sort_by(|a, b| b.count.cmp(&a.count));
    tally.truncate(limit);
    tally
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_words_across_subjects() {
        let keywords = top_keywords(
            ["Refactor parser errors", "parser: handle unicode", "Update the README", "Handle parser panics"],
            TOP_KEYWORDS,
        );
        assert_eq!(keywords[0], Keyword { word: "parser".into(), count: 3 });
        assert_eq!(keywords[1], Keyword { word: "handle".into(), count: 2 });
        assert!(keywords.iter().all(|k| k.word != "update" && k.word != "the"));
    }

    #[test]
    fn test_skips_short_and_numeric_tokens() {
        let keywords = top_keywords(["Bump api to 2024 for ci"], TOP_KEYWORDS);
        assert_eq!(keywords, vec![Keyword { word: "bump".into(), count: 1 }]);
    }

    #[test]
    fn test_respects_limit() {
        let subjects: Vec<String> = (0..20).map(|i| format!("word{i:02}")).collect();
        let keywords = top_keywords(subjects.iter().map(String::as_str), TOP_KEYWORDS);
        assert_eq!(keywords.len(), TOP_KEYWORDS);
        assert_eq!(keywords[0].word, "word00");
    }

    #[test]
    fn test_stop_word_list_is_lower_case() {
        assert!(STOP_WORDS.iter().all(|w| w.chars().all(|c| c.is_ascii_lowercase())));
    }
}
