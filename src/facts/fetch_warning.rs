use core::fmt::{Display, Formatter, Result as FmtResult};
use serde::{Deserialize, Serialize};

/// A recoverable failure encountered while gathering repository data.
///
/// The affected scope (a branch, the pull request list, a commit detail) is skipped or truncated and
/// the analysis continues with whatever was gathered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchWarning {
    pub scope: String,
    pub message: String,
}

impl FetchWarning {
    #[must_use]
    pub fn new(scope: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn branch(name: &str, page: u32, error: &dyn Display) -> Self {
        Self::new(format!("branch:{name}"), format!("stopped at page {page}: {error}"))
    }
}

impl Display for FetchWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}: {}", self.scope, self.message)
    }
}
