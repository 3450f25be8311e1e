//! Classification of fetched repository data into labels, counts and summaries.

mod analysis_result;
mod analyze_error;
mod analyzer;
mod branch_patterns;
mod branching_rules;
mod commit_category;
mod context;
mod contributors;
mod keywords;
mod work_areas;

pub use analysis_result::{AnalysisResult, AnalysisStats, BranchingSummary, ClassifiedCommit, RepositoryInfo, WindowPullRequests};
pub use analyze_error::AnalyzeError;
pub use analyzer::build_result;
pub use branch_patterns::{BRANCH_PATTERNS, BranchPattern, BranchPatternCounts, branch_patterns, count_branch_patterns};
pub use branching_rules::{BranchingInputs, Decision, Rule, RuleTable, STRATEGY_RULES, Strategy, WORKFLOW_RULES, Workflow, evaluate};
pub use commit_category::{CATEGORY_PATTERNS, CategoryCounts, CommitCategory, categorize, matches_category};
pub use context::AnalysisContext;
pub use contributors::{Contributor, fold_contributors};
pub use keywords::{Keyword, TOP_KEYWORDS, top_keywords};
pub use work_areas::{TOP_WORK_AREAS, WorkArea, extract_work_area, top_work_areas};
