//! Cache Module
//!
//! Process-wide in-memory cache with per-entry TTL, prefix invalidation and
//! periodic sweeping of expired entries.

mod clock;
mod entry;
mod keys;
mod stats;
mod store;


use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use keys::{CacheKey, Resource};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// TTL used when a caller does not give one
pub const DEFAULT_TTL: Duration = Duration::from_secs(20 * 60);

/// Interval between background sweeps
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Cache store handle shared between request handlers and the sweep task.
pub type SharedCache = Arc<RwLock<CacheStore>>;

/// Wraps a store for sharing.
pub fn shared(store: CacheStore) -> SharedCache {
    Arc::new(RwLock::new(store))
}
