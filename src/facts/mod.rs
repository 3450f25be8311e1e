//! Gathering repository data from GitHub.

mod branch;
mod cache;
mod clock;
mod commit;
mod commit_detail;
mod fetch_warning;
pub mod github;
mod progress_reporter;
mod pull_request;
mod repo_spec;
mod repository_fetcher;
mod repository_snapshot;
mod request_tracker;
mod time_range;
mod tooling;

pub use branch::Branch;
pub use cache::{CacheResult, ResponseCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use commit::{Commit, SUBJECT_MAX_CHARS, subject_line};
pub use commit_detail::{CommitDetail, truncate_chars};
pub use fetch_warning::FetchWarning;
pub use progress_reporter::ProgressReporter;
pub use pull_request::PullRequest;
pub use repo_spec::{RepoSpec, RepoUrlError};
pub use repository_fetcher::{CommitIndex, RepositoryFetcher};
pub use repository_snapshot::RepositorySnapshot;
pub use request_tracker::RequestTracker;
pub use time_range::TimeRange;
pub use tooling::{TOOLING_PROBES, detect_tooling};
