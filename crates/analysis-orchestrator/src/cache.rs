//! Per-symbol TTL cache with an injectable clock.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::{Arc, Mutex};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Internal cache entry with timestamp
struct CacheEntry<V> {
    data: V,
    cached_at: DateTime<Utc>,
}

/// Keys are case-insensitive: they are upper-cased on the way in.
pub struct TtlCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    fn is_fresh(&self, entry: &CacheEntry<V>, now: DateTime<Utc>) -> bool {
        now - entry.cached_at < self.ttl
    }

    /// Cached value while it is younger than the TTL.
    pub fn get(&self, key: &str) -> Option<V> {
        let key = key.to_uppercase();
        let now = self.clock.now();
        {
            let entry = self.entries.get(&key)?;
            if self.is_fresh(&entry, now) {
                return Some(entry.data.clone());
            }
        }
        self.remove_stale(&key, now);
        None
    }

    /// Removes `key` only if the entry stored at removal time is stale, so a
    /// value inserted concurrently after the read survives.
    fn remove_stale(&self, key: &str, now: DateTime<Utc>) {
        self.entries.remove_if(key, |_, entry| !self.is_fresh(entry, now));
    }

    /// Stores `data` and sweeps out every expired entry.
    pub fn insert(&self, key: &str, data: V) {
        let now = self.clock.now();
        self.entries.retain(|_, entry| self.is_fresh(entry, now));
        self.entries.insert(
            key.to_uppercase(),
            CacheEntry {
                data,
                cached_at: now,
            },
        );
    }

    pub fn invalidate(&self, key: &str) {
        self.entries.remove(&key.to_uppercase());
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
