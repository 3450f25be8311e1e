use crate::analysis::WorkArea;
use crate::facts::TimeRange;

const BUSY_MIN_COMMITS: usize = 100;
const BUSY_MIN_CONTRIBUTORS: usize = 15;
const LIGHT_MAX_COMMITS: usize = 20;
const MAX_AREAS_MENTIONED: usize = 3;

/// Derived statistics a summary is written from.
#[derive(Debug, Clone, Copy)]
pub struct NarrativeInputs<'a> {
    pub repository: &'a str,
    pub time_range: TimeRange,
    pub commits: usize,
    pub contributors: usize,
    pub features: usize,
    pub bug_fixes: usize,
    pub top_areas: &'a [WorkArea],
}

/// Writes a short plain-English description of recent activity.
///
/// The output depends only on `inputs`.
#[must_use]
pub fn summarize(inputs: &NarrativeInputs<'_>) -> String {
    let NarrativeInputs {
        repository,
        time_range,
        commits,
        contributors,
        ..
    } = *inputs;
    let period = time_range.phrase();
    let commit_phrase = plural(commits, "commit", "commits");
    let contributor_phrase = plural(contributors, "contributor", "contributors");

    let mut summary = if commits > BUSY_MIN_COMMITS && contributors > BUSY_MIN_CONTRIBUTORS {
        format!("{repository} has been busy {period}, with {commit_phrase} from {contributor_phrase}.")
    } else if commits <= LIGHT_MAX_COMMITS {
        format!("{repository} saw light activity {period}, with {commit_phrase} from {contributor_phrase}.")
    } else {
        format!("{repository} saw steady activity {period}, with {commit_phrase} from {contributor_phrase}.")
    };

    let mut clauses = Vec::new();
    if inputs.features > 0 {
        clauses.push(plural(inputs.features, "feature change", "feature changes"));
    }
    if inputs.bug_fixes > 0 {
        clauses.push(plural(inputs.bug_fixes, "bug fix", "bug fixes"));
    }
    if !clauses.is_empty() {
        summary.push_str(&format!(" The work included {}.", clauses.join(" and ")));
    }

    let areas: Vec<&str> = inputs
        .top_areas
        .iter()
        .take(MAX_AREAS_MENTIONED)
        .map(|a| a.area.as_str())
        .collect();
    if !areas.is_empty() {
        summary.push_str(&format!(" Most pull requests touched {}.", join_list(&areas)));
    }

    summary
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 { format!("1 {one}") } else { format!("{count} {many}") }
}

fn join_list(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [only] => (*only).to_string(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn areas(names: &[&str]) -> Vec<WorkArea> {
        names
            .iter()
            .map(|n| WorkArea {
                area: (*n).to_string(),
                count: 1,
            })
            .collect()
    }

    fn inputs(commits: usize, contributors: usize, top_areas: &[WorkArea]) -> NarrativeInputs<'_> {
        NarrativeInputs {
            repository: "acme/widgets",
            time_range: TimeRange::Month,
            commits,
            contributors,
            features: 0,
            bug_fixes: 0,
            top_areas,
        }
    }

    #[test]
    fn test_busy_phrasing_needs_both_thresholds() {
        assert!(summarize(&inputs(150, 20, &[])).contains("has been busy in the last month"));
        assert!(summarize(&inputs(150, 10, &[])).contains("steady activity"));
        assert!(summarize(&inputs(100, 20, &[])).contains("steady activity"));
    }

    #[test]
    fn test_light_phrasing_at_boundary() {
        assert_eq!(
            summarize(&inputs(20, 3, &[])),
            "acme/widgets saw light activity in the last month, with 20 commits from 3 contributors."
        );
        assert!(summarize(&inputs(21, 3, &[])).contains("steady activity"));
    }

    #[test]
    fn test_singular_forms() {
        assert_eq!(
            summarize(&inputs(1, 1, &[])),
            "acme/widgets saw light activity in the last month, with 1 commit from 1 contributor."
        );
    }

    #[test]
    fn test_feature_and_fix_clauses() {
        let mut i = inputs(40, 5, &[]);
        i.features = 3;
        i.bug_fixes = 1;
        assert!(summarize(&i).ends_with(" The work included 3 feature changes and 1 bug fix."));

        i.features = 0;
        assert!(summarize(&i).ends_with(" The work included 1 bug fix."));
    }

    #[test]
    fn test_at_most_three_areas() {
        let top = areas(&["dark mode toggle", "login redirect", "release notes", "bump version"]);
        let summary = summarize(&inputs(40, 5, &top));
        assert!(summary.ends_with(" Most pull requests touched dark mode toggle, login redirect and release notes."));
        assert!(!summary.contains("bump version"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let top = areas(&["login redirect"]);
        assert_eq!(summarize(&inputs(40, 5, &top)), summarize(&inputs(40, 5, &top)));
    }
}
