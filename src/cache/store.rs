//! Cache Store Module
//!
//! HashMap storage with per-entry TTL, lazy expiry on read, and a sweep
//! entry point for the background task.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock, DEFAULT_TTL};

// == Cache Store ==
/// Key-value storage with time-based expiry.
///
/// Operations are synchronous and never perform I/O. Sharing across tasks
/// goes through [`SharedCache`](crate::cache::SharedCache).
#[derive(Debug)]
pub struct CacheStore<V = Value> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Time source for expiry
    clock: Arc<dyn Clock>,
    /// TTL applied when `set` is called without one
    default_ttl: Duration,
    hits: u64,
    misses: u64,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a store on the system clock.
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    /// Creates a store reading time from `clock`.
    pub fn with_clock(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            clock,
            default_ttl,
            hits: 0,
            misses: 0,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Set ==
    /// Stores a value, overwriting any existing entry and resetting its expiry.
    ///
    /// `ttl` of None uses the store's default TTL. A zero TTL stores an entry
    /// that is already expired: reads miss and the next sweep removes it.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(value, self.clock.now_ms(), ttl);
        self.entries.insert(key.into(), entry);
    }

    // == Get ==
    /// Returns a copy of the value if present and not expired.
    ///
    /// An expired entry is removed as a side effect.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = self.clock.now_ms();
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                self.hits += 1;
                Some(entry.value.clone())
            }
            Some(_) => {
                self.entries.remove(key);
                self.misses += 1;
                None
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    // == Delete ==
    /// Removes an entry. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Delete By Prefix ==
    /// Removes every entry whose raw key starts with `prefix`.
    ///
    /// Matching is plain string prefix, not segment aware: `"profile:u1"`
    /// also matches `"profile:u10"`.
    pub fn delete_by_prefix(&mut self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        before - self.entries.len()
    }

    // == Clear ==
    /// Removes all entries. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    // == Remaining TTL ==
    /// Time until the entry expires. None for missing or expired keys.
    pub fn remaining_ttl(&self, key: &str) -> Option<Duration> {
        let now = self.clock.now_ms();
        self.entries.get(key).and_then(|entry| entry.remaining_at(now))
    }

    // == Stats ==
    /// Returns a snapshot of the store.
    pub fn stats(&self) -> CacheStats {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        CacheStats {
            size: self.entries.len(),
            keys,
            hits: self.hits,
            misses: self.misses,
        }
    }

    // == Sweep Expired ==
    /// Removes all expired entries, read or not.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        before - self.entries.len()
    }

    // == Length ==
    /// Returns the current number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
