//! In-process response cache with a fixed time-to-live.
//!
//! Entries are never served once they are older than the TTL. Expired entries are evicted by the
//! lookup that observes them; there is no background sweeper.

use crate::facts::clock::Clock;
use chrono::{DateTime, Utc};
use core::hash::Hash;
use core::time::Duration;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const LOG_TARGET: &str = "cache";

#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    stored_at: DateTime<Utc>,
}

/// Result of a cache lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<V> {
    Hit(V),
    Miss,
}

impl<V> CacheResult<V> {
    pub fn hit(self) -> Option<V> {
        match self {
            Self::Hit(value) => Some(value),
            Self::Miss => None,
        }
    }
}

#[derive(Debug)]
pub struct ResponseCache<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> ResponseCache<K, V>
where
    K: Eq + Hash + core::fmt::Debug,
    V: Clone,
{
    #[must_use]
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Look up a key, evicting the entry if it has outlived the TTL.
    pub fn get(&self, key: &K) -> CacheResult<V> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().expect("lock poisoned");

        let Some(entry) = entries.get(key) else {
            return CacheResult::Miss;
        };

        let age = (now - entry.stored_at).to_std().unwrap_or(Duration::ZERO);
        if age > self.ttl {
            log::debug!(target: LOG_TARGET, "Evicting expired entry for {key:?} (age {}s)", age.as_secs());
            let _ = entries.remove(key);
            return CacheResult::Miss;
        }

        CacheResult::Hit(entry.value.clone())
    }

    pub fn set(&self, key: K, value: V) {
        let stored_at = self.clock.now();
        let _ = self
            .entries
            .lock()
            .expect("lock poisoned")
            .insert(key, CacheEntry { value, stored_at });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("lock poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
