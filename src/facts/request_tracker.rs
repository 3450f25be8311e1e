//! Request tracking for monitoring upstream GitHub calls.

use crate::facts::progress_reporter::ProgressReporter;
use core::sync::atomic::{AtomicU64, Ordering};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

/// Counter for a specific named request type.
#[derive(Debug, Default)]
struct RequestCounter {
    issued: AtomicU64,
    completed: AtomicU64,
}

/// Tracks upstream requests by endpoint category (e.g. "commits", "branches", "pulls").
///
/// The per-category totals are reported with every analysis. When a progress reporter is attached,
/// it is updated as requests are issued and completed.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    counters: Arc<Mutex<HashMap<String, Arc<RequestCounter>>>>,
    progress: Option<ProgressReporter>,
}

impl RequestTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker that mirrors its counts into the given progress reporter.
    #[must_use]
    pub fn with_progress(progress: ProgressReporter) -> Self {
        Self {
            counters: Arc::default(),
            progress: Some(progress),
        }
    }

    fn get_counter(&self, name: &str) -> Arc<RequestCounter> {
        let mut counters = self.counters.lock().expect("lock poisoned");
        Arc::clone(
            counters
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(RequestCounter::default())),
        )
    }

    /// Mark that a new request has been issued for the given named category.
    pub fn add_request(&self, name: &str) {
        let counter = self.get_counter(name);
        let _ = counter.issued.fetch_add(1, Ordering::Relaxed);
        self.update_progress();
    }

    /// Mark that a request has completed, successfully or not, for the given named category.
    pub fn complete_request(&self, name: &str) {
        let counter = self.get_counter(name);
        let _ = counter.completed.fetch_add(1, Ordering::Relaxed);
        self.update_progress();
    }

    /// Issued request counts per category, sorted by name.
    #[must_use]
    pub fn issued_counts(&self) -> BTreeMap<String, u64> {
        let counters = self.counters.lock().expect("lock poisoned");
        counters
            .iter()
            .map(|(name, counter)| (name.clone(), counter.issued.load(Ordering::Relaxed)))
            .filter(|(_, issued)| *issued > 0)
            .collect()
    }

    #[must_use]
    pub fn total_issued(&self) -> u64 {
        self.issued_counts().values().sum()
    }

    fn update_progress(&self) {
        let Some(progress) = &self.progress else {
            return;
        };

        let counters = self.counters.lock().expect("lock poisoned");

        let mut total_issued = 0u64;
        let mut total_completed = 0u64;
        let mut parts = Vec::new();

        // Sorted by name for consistent ordering
        let mut names: Vec<_> = counters.keys().collect();
        names.sort();

        for name in names {
            if let Some(counter) = counters.get(name.as_str()) {
                let issued = counter.issued.load(Ordering::Relaxed);
                let completed = counter.completed.load(Ordering::Relaxed);

                if issued > 0 {
                    total_issued += issued;
                    total_completed += completed;
                    parts.push(format!("{completed}/{issued} {name}"));
                }
            }
        }

        if total_issued > 0 {
            progress.enable_determinate_mode(total_issued);
            progress.set_position(total_completed);
            progress.set_message(parts.join(", "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_are_kept_per_category() {
        let tracker = RequestTracker::new();
        tracker.add_request("commits");
        tracker.add_request("commits");
        tracker.complete_request("commits");
        tracker.add_request("branches");

        let counts = tracker.issued_counts();
        assert_eq!(counts.get("commits"), Some(&2));
        assert_eq!(counts.get("branches"), Some(&1));
        assert_eq!(tracker.total_issued(), 3);
    }

    #[test]
    fn test_clones_share_counters() {
        let tracker = RequestTracker::new();
        let clone = tracker.clone();
        clone.add_request("pulls");
        assert_eq!(tracker.issued_counts().get("pulls"), Some(&1));
    }

    #[test]
    fn test_progress_reporter_is_fed() {
        let progress = ProgressReporter::new(core::time::Duration::from_secs(3600));
        let tracker = RequestTracker::with_progress(progress.clone());
        tracker.add_request("repository");
        tracker.complete_request("repository");
        assert_eq!(progress.position(), 1);
        assert_eq!(progress.length(), Some(1));
    }
}
