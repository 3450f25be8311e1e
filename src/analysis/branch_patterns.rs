use serde::{Deserialize, Serialize};

/// Branch naming families recognized by substring matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchPattern {
    Feature,
    Fix,
    Hotfix,
    Develop,
    Release,
}

/// Case-sensitive substrings identifying each family.
///
/// A branch may belong to several families: `feature/hotfix-migration` counts as feature, fix and
/// hotfix at once.
pub const BRANCH_PATTERNS: &[(BranchPattern, &[&str])] = &[
    (BranchPattern::Feature, &["feature"]),
    (BranchPattern::Fix, &["fix"]),
    (BranchPattern::Hotfix, &["hotfix"]),
    (BranchPattern::Develop, &["develop", "dev"]),
    (BranchPattern::Release, &["release"]),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchPatternCounts {
    pub feature: usize,
    pub fix: usize,
    pub hotfix: usize,
    pub develop: usize,
    pub release: usize,
}

impl BranchPatternCounts {
    #[must_use]
    pub const fn get(&self, pattern: BranchPattern) -> usize {
        match pattern {
            BranchPattern::Feature => self.feature,
            BranchPattern::Fix => self.fix,
            BranchPattern::Hotfix => self.hotfix,
            BranchPattern::Develop => self.develop,
            BranchPattern::Release => self.release,
        }
    }

    const fn slot(&mut self, pattern: BranchPattern) -> &mut usize {
        match pattern {
            BranchPattern::Feature => &mut self.feature,
            BranchPattern::Fix => &mut self.fix,
            BranchPattern::Hotfix => &mut self.hotfix,
            BranchPattern::Develop => &mut self.develop,
            BranchPattern::Release => &mut self.release,
        }
    }
}

/// Families a single branch name belongs to.
#[must_use]
pub fn branch_patterns(name: &str) -> Vec<BranchPattern> {
    BRANCH_PATTERNS
        .iter()
        .filter(|(_, needles)| needles.iter().any(|needle| name.contains(needle)))
        .map(|(pattern, _)| *pattern)
        .collect()
}

#[must_use]
pub fn count_branch_patterns<'a>(names: impl IntoIterator<Item = &'a str>) -> BranchPatternCounts {
    let mut counts = BranchPatternCounts::default();
    for name in names {
        for pattern in branch_patterns(name) {
            *counts.slot(pattern) += 1;
        }
    }
    counts
}
