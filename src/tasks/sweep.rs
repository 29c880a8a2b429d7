//! Cache Sweep Task
//!
//! Background task that periodically removes expired cache entries.
//! Without it, keys written once and never read again would stay in memory
//! for the life of the process.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Spawns a background task that sweeps expired entries every `interval`.
///
/// The task runs until aborted. Each pass holds the write lock only for the
/// duration of the sweep itself.
///
/// # Returns
/// A JoinHandle for the spawned task, aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = cache::shared(CacheStore::default());
/// let sweep_handle = spawn_sweep_task(cache.clone(), DEFAULT_SWEEP_INTERVAL);
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(cache: SharedCache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting cache sweep task with interval of {}s",
            interval.as_secs_f64()
        );

        loop {
            tokio::time::sleep(interval).await;

            let (removed, remaining) = {
                let mut cache_guard = cache.write().await;
                let removed = cache_guard.sweep_expired();
                (removed, cache_guard.len())
            };

            if removed > 0 {
                info!(removed, remaining, "Cache sweep evicted expired entries");
            } else {
                debug!(remaining, "Cache sweep found no expired entries");
            }
        }
    })
}
