//! Process-wide request spacing and rate-limit bookkeeping.
//!
//! The state is shared by every request issued through a [`GitHubClient`](super::GitHubClient),
//! including requests issued concurrently. Spacing is best-effort: two concurrent callers may
//! occasionally both observe an open slot.

use super::GitHubError;
use chrono::{DateTime, Utc};
use core::time::Duration;
use std::sync::Mutex;
use tokio::time::Instant;

/// Fallback throttle window, in seconds, when the upstream does not advertise a reset time.
const DEFAULT_RESET_SECS: i64 = 60;

#[derive(Debug, Default)]
struct Inner {
    next_slot: Option<Instant>,
    throttled: bool,
    reset_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
pub struct RateLimitState {
    inner: Mutex<Inner>,
}

impl RateLimitState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail fast while the throttle is engaged. Clears the throttle once the reset time has passed.
    pub fn check(&self, now: DateTime<Utc>) -> Result<(), GitHubError> {
        let mut inner = self.inner.lock().expect("lock poisoned");
        if !inner.throttled {
            return Ok(());
        }

        match inner.reset_at {
            Some(reset_at) if reset_at > now => Err(GitHubError::RateLimited {
                retry_after: seconds_until(now, reset_at),
            }),
            _ => {
                inner.throttled = false;
                inner.reset_at = None;
                Ok(())
            }
        }
    }

    /// Claim the next request slot, returning how long the caller must wait before sending.
    pub fn reserve_slot(&self, min_interval: Duration) -> Duration {
        let now = Instant::now();
        let mut inner = self.inner.lock().expect("lock poisoned");

        let start = match inner.next_slot {
            Some(slot) if slot > now => slot,
            _ => now,
        };
        inner.next_slot = Some(start + min_interval);
        start - now
    }

    /// Record the rate-limit headers of a response.
    pub fn observe(&self, remaining: Option<u64>, reset_at: Option<DateTime<Utc>>, low_water: u64, now: DateTime<Utc>) {
        let Some(remaining) = remaining else {
            return;
        };

        let mut inner = self.inner.lock().expect("lock poisoned");
        if remaining < low_water {
            let reset_at = reset_at.unwrap_or_else(|| now + chrono::Duration::seconds(DEFAULT_RESET_SECS));
            if !inner.throttled {
                log::warn!(
                    target: super::LOG_TARGET,
                    "Only {remaining} GitHub requests remaining, pausing upstream calls until {reset_at}"
                );
            }
            inner.throttled = true;
            inner.reset_at = Some(reset_at);
        } else if inner.throttled {
            inner.throttled = false;
            inner.reset_at = None;
        }
    }
}

fn seconds_until(now: DateTime<Utc>, then: DateTime<Utc>) -> u64 {
    let millis = u64::try_from((then - now).num_milliseconds()).unwrap_or(0);
    millis.div_ceil(1000).max(1)
}
