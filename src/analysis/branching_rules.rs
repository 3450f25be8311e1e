//! Ordered rule tables deciding the workflow and branching strategy labels.
//!
//! Each table is scanned top to bottom and the first rule whose predicate holds wins. When none
//! holds, the table's `otherwise` rule decides.

use crate::analysis::BranchPatternCounts;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Merged pull requests above which a repository is considered PR-driven.
const FORK_PR_MIN_MERGED: usize = 10;

/// Merged-PR to commit ratio above which a repository is considered PR-driven.
const FORK_PR_MIN_RATIO: f64 = 0.10;

/// Active branch count at or below which work is considered trunk-based.
const TRUNK_MAX_ACTIVE_BRANCHES: usize = 3;

/// Feature branch count above which the strategy is considered GitHub Flow.
const GITHUB_FLOW_MIN_FEATURE_BRANCHES: usize = 3;

/// Branch count at or below which the strategy is considered trunk-based.
const TRUNK_MAX_BRANCHES: usize = 3;

/// Observations the rules are evaluated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BranchingInputs {
    pub patterns: BranchPatternCounts,
    pub total_branches: usize,
    pub active_branches: usize,
    pub merged_pull_requests: usize,
    pub window_commits: usize,
}

impl BranchingInputs {
    /// Merged pull requests per commit in the window; zero when there are no commits.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "counts are far below 2^52")]
    pub fn merged_ratio(&self) -> f64 {
        if self.window_commits == 0 {
            0.0
        } else {
            self.merged_pull_requests as f64 / self.window_commits as f64
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Workflow {
    #[serde(rename = "Fork + Pull Request")]
    #[strum(serialize = "Fork + Pull Request")]
    ForkAndPullRequest,
    #[serde(rename = "Trunk-Based Development")]
    #[strum(serialize = "Trunk-Based Development")]
    TrunkBased,
    #[serde(rename = "Branch-based Development")]
    #[strum(serialize = "Branch-based Development")]
    BranchBased,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Strategy {
    #[serde(rename = "Git Flow")]
    #[strum(serialize = "Git Flow")]
    GitFlow,
    #[serde(rename = "GitHub Flow")]
    #[strum(serialize = "GitHub Flow")]
    GitHubFlow,
    #[serde(rename = "Trunk-Based Development")]
    #[strum(serialize = "Trunk-Based Development")]
    TrunkBased,
    #[serde(rename = "Custom Strategy")]
    #[strum(serialize = "Custom Strategy")]
    Custom,
}

/// One row of a rule table.
#[derive(Debug, Clone, Copy)]
pub struct Rule<L: 'static> {
    pub label: L,
    pub applies: fn(&BranchingInputs) -> bool,
    pub explanation: &'static str,
    pub criteria: fn(&BranchingInputs) -> String,
}

/// Ordered rules plus the decision taken when none of them applies.
#[derive(Debug, Clone, Copy)]
pub struct RuleTable<L: 'static> {
    pub rules: &'static [Rule<L>],
    pub otherwise: Rule<L>,
}

/// Outcome of evaluating a rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision<L> {
    pub label: L,
    pub explanation: &'static str,
    pub criteria: String,
}

pub const WORKFLOW_RULES: RuleTable<Workflow> = RuleTable {
    rules: &[
        Rule {
            label: Workflow::ForkAndPullRequest,
            applies: is_pull_request_driven,
            explanation: "Changes mostly land through merged pull requests, typical of fork-and-PR collaboration.",
            criteria: pull_request_criteria,
        },
        Rule {
            label: Workflow::TrunkBased,
            applies: has_few_active_branches,
            explanation: "Few branches are active, so most work is committed directly to the main line.",
            criteria: active_branch_criteria,
        },
    ],
    otherwise: Rule {
        label: Workflow::BranchBased,
        applies: always,
        explanation: "Work is spread across several active branches that are merged back over time.",
        criteria: active_branch_criteria,
    },
};

pub const STRATEGY_RULES: RuleTable<Strategy> = RuleTable {
    rules: &[
        Rule {
            label: Strategy::GitFlow,
            applies: is_git_flow,
            explanation: "A long-lived develop branch alongside feature or release branches indicates Git Flow.",
            criteria: git_flow_criteria,
        },
        Rule {
            label: Strategy::GitHubFlow,
            applies: is_github_flow,
            explanation: "Many short-lived feature branches off the default branch indicate GitHub Flow.",
            criteria: feature_branch_criteria,
        },
        Rule {
            label: Strategy::TrunkBased,
            applies: has_few_branches,
            explanation: "Only a handful of branches exist, so development happens on the trunk.",
            criteria: branch_count_criteria,
        },
    ],
    otherwise: Rule {
        label: Strategy::Custom,
        applies: always,
        explanation: "Branch names do not follow a recognized convention.",
        criteria: branch_count_criteria,
    },
};

/// Returns the decision of the first rule in `table` that applies to `inputs`.
#[must_use]
pub fn evaluate<L: Copy>(table: &RuleTable<L>, inputs: &BranchingInputs) -> Decision<L> {
    let rule = table
        .rules
        .iter()
        .find(|rule| (rule.applies)(inputs))
        .unwrap_or(&table.otherwise);

    Decision {
        label: rule.label,
        explanation: rule.explanation,
        criteria: (rule.criteria)(inputs),
    }
}

const fn always(_: &BranchingInputs) -> bool {
    true
}

fn is_pull_request_driven(inputs: &BranchingInputs) -> bool {
    inputs.merged_pull_requests > FORK_PR_MIN_MERGED || inputs.merged_ratio() > FORK_PR_MIN_RATIO
}

const fn has_few_active_branches(inputs: &BranchingInputs) -> bool {
    inputs.active_branches <= TRUNK_MAX_ACTIVE_BRANCHES
}

const fn is_git_flow(inputs: &BranchingInputs) -> bool {
    inputs.patterns.develop > 0 && (inputs.patterns.feature > 0 || inputs.patterns.release > 0)
}

const fn is_github_flow(inputs: &BranchingInputs) -> bool {
    inputs.patterns.feature > GITHUB_FLOW_MIN_FEATURE_BRANCHES
}

const fn has_few_branches(inputs: &BranchingInputs) -> bool {
    inputs.total_branches <= TRUNK_MAX_BRANCHES
}

fn pull_request_criteria(inputs: &BranchingInputs) -> String {
    format!(
        "{} merged pull requests against {} commits ({:.0}% ratio)",
        inputs.merged_pull_requests,
        inputs.window_commits,
        inputs.merged_ratio() * 100.0
    )
}

fn active_branch_criteria(inputs: &BranchingInputs) -> String {
    format!("{} of {} branches active in the time window", inputs.active_branches, inputs.total_branches)
}

fn git_flow_criteria(inputs: &BranchingInputs) -> String {
    format!(
        "{} develop, {} feature and {} release branches",
        inputs.patterns.develop, inputs.patterns.feature, inputs.patterns.release
    )
}

fn feature_branch_criteria(inputs: &BranchingInputs) -> String {
    format!("{} feature branches", inputs.patterns.feature)
}

fn branch_count_criteria(inputs: &BranchingInputs) -> String {
    format!("{} branches in total", inputs.total_branches)
}
