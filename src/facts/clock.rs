//! Wall-clock abstraction so that time-dependent logic can be driven deterministically in tests.

use chrono::{DateTime, Utc};
use core::fmt::Debug;
use std::sync::Mutex;

/// Source of the current time.
pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    #[must_use]
    pub const fn new(start: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(start) }
    }

    pub fn advance(&self, delta: chrono::Duration) {
        let mut now = self.now.lock().expect("lock poisoned");
        *now += delta;
    }

    pub fn set(&self, value: DateTime<Utc>) {
        *self.now.lock().expect("lock poisoned") = value;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("lock poisoned")
    }
}
