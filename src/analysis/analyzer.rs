//! Turns a fetched [`RepositorySnapshot`] into an [`AnalysisResult`].

use crate::analysis::{
    AnalysisResult, AnalysisStats, BranchingInputs, BranchingSummary, CategoryCounts, ClassifiedCommit, CommitCategory,
    RepositoryInfo, STRATEGY_RULES, TOP_KEYWORDS, TOP_WORK_AREAS, WORKFLOW_RULES, WindowPullRequests, categorize,
    count_branch_patterns, evaluate, fold_contributors, matches_category, top_keywords, top_work_areas,
};
use crate::facts::{Commit, RepositorySnapshot};
use crate::reports::{NarrativeInputs, summarize};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Classifies and summarizes everything in `snapshot`.
///
/// Categories, keywords and the narrative describe the commits inside the window. Contributors
/// cover every deduplicated commit, and work areas cover every retained merged pull request.
#[must_use]
pub fn build_result(snapshot: RepositorySnapshot, executive_summary: Option<String>, generated_at: DateTime<Utc>) -> AnalysisResult {
    let window: Vec<&Commit> = snapshot.window_commits().collect();

    let mut commit_categories = CategoryCounts::default();
    for commit in &window {
        for category in categorize(&commit.subject) {
            commit_categories.add(category);
        }
    }

    let window_pull_requests = {
        let merged: Vec<&str> = snapshot.window_pull_requests().map(|pr| pr.title.as_str()).collect();
        WindowPullRequests {
            merged: merged.len(),
            features_shipped: merged
                .iter()
                .filter(|title| matches_category(title, CommitCategory::Feature))
                .count(),
            bugs_fixed: merged
                .iter()
                .filter(|title| matches_category(title, CommitCategory::BugFix))
                .count(),
        }
    };

    let pattern_counts = count_branch_patterns(snapshot.branches.iter().map(|b| b.name.as_str()));
    let inputs = BranchingInputs {
        patterns: pattern_counts,
        total_branches: snapshot.branches.len(),
        active_branches: snapshot.branches.iter().filter(|b| b.is_active).count(),
        merged_pull_requests: window_pull_requests.merged,
        window_commits: window.len(),
    };
    let workflow = evaluate(&WORKFLOW_RULES, &inputs);
    let strategy = evaluate(&STRATEGY_RULES, &inputs);

    let work_areas = top_work_areas(snapshot.pull_requests.iter().map(|pr| pr.title.as_str()), TOP_WORK_AREAS);
    let keywords = top_keywords(window.iter().map(|c| c.subject.as_str()), TOP_KEYWORDS);
    let contributors = fold_contributors(&snapshot.commits, &snapshot.commit_details);

    let window_contributors = window.iter().map(|c| c.author_email.as_str()).collect::<HashSet<_>>().len();
    let repository = snapshot.repo.to_string();
    let summary = summarize(&NarrativeInputs {
        repository: &repository,
        time_range: snapshot.time_range,
        commits: window.len(),
        contributors: window_contributors,
        features: commit_categories.feature,
        bug_fixes: commit_categories.bug_fix,
        top_areas: &work_areas,
    });

    let stats = AnalysisStats {
        total_commits: snapshot.commits.len(),
        window_commits: window.len(),
        branches_analyzed: snapshot.branches.len(),
        api_requests: snapshot.api_requests.clone(),
    };

    let active_branches = snapshot.branches.iter().filter(|b| b.is_active).map(|b| b.name.clone()).collect();
    let stale_branches = snapshot.branches.iter().filter(|b| b.is_stale).map(|b| b.name.clone()).collect();

    let RepositorySnapshot {
        repo,
        default_branch,
        time_range,
        since,
        commits,
        branches,
        pull_requests,
        ci_cd_tools,
        warnings,
        ..
    } = snapshot;

    let commits = commits
        .into_iter()
        .map(|commit| ClassifiedCommit {
            categories: categorize(&commit.subject),
            commit,
        })
        .collect();

    AnalysisResult {
        repository: RepositoryInfo {
            url: repo.html_url(),
            owner: repo.owner().to_string(),
            repo: repo.repo().to_string(),
            default_branch,
        },
        time_range,
        since,
        generated_at,
        commits,
        branches,
        active_branches,
        stale_branches,
        contributors,
        pull_requests,
        branching: BranchingSummary {
            pattern_counts,
            workflow: workflow.label,
            strategy: strategy.label,
            workflow_explanation: workflow.explanation.to_string(),
            strategy_explanation: strategy.explanation.to_string(),
            detection_criteria: vec![workflow.criteria, strategy.criteria],
        },
        commit_categories,
        work_areas,
        keywords,
        window_pull_requests,
        summary,
        executive_summary,
        ci_cd_tools,
        warnings,
        stats,
    }
}
