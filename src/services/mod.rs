//! Services Module
//!
//! Request-independent operations behind the HTTP handlers: cache-fronted
//! Instagram aggregations, owner invalidation, and Wrapped recaps.

mod instagram;
mod wrapped;

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::cache::SharedCache;
use crate::error::{AppError, Result};

pub use instagram::{AggregatorSettings, InstagramService};
pub use wrapped::{summarize, WrappedService};

/// Serves `key` from the cache, or runs `load` and caches its result.
///
/// The lock is never held across `load`. Failures are returned as-is and
/// leave the cache untouched. Concurrent misses on the same key each run
/// `load`; the last write wins.
pub async fn cache_through<T, F, Fut>(
    cache: &SharedCache,
    key: String,
    ttl: Duration,
    load: F,
) -> Result<Value>
where
    T: Serialize,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let cached = cache.write().await.get(&key);
    if let Some(value) = cached {
        debug!(%key, "cache hit");
        return Ok(value);
    }

    debug!(%key, "cache miss");
    let fresh = serde_json::to_value(load().await?)?;
    cache.write().await.set(key, fresh.clone(), Some(ttl));
    Ok(fresh)
}

/// Rejects a blank owner identity. A blank owner would turn every owner
/// prefix into a bare resource prefix.
pub(crate) fn require_owner(owner_id: &str) -> Result<()> {
    if owner_id.trim().is_empty() {
        Err(AppError::Unauthorized)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::cache::{self, CacheStore};
    use crate::instagram::UpstreamError;

    #[tokio::test]
    async fn test_cache_through_loads_once() {
        let cache = cache::shared(CacheStore::default());
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        for _ in 0..3 {
            let ttl = Duration::from_secs(60);
            let value = cache_through(&cache, "profile:u1".into(), ttl, move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, AppError>(serde_json::json!({ "n": 1 }))
            })
            .await
            .unwrap();
            assert_eq!(value["n"], 1);
        }

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cache_through_does_not_cache_failures() {
        let cache = cache::shared(CacheStore::default());

        let ttl = Duration::from_secs(60);
        let result = cache_through(&cache, "media:u1".into(), ttl, || async {
            Err::<Value, _>(AppError::Upstream(UpstreamError::api(500, "down")))
        })
        .await;

        assert!(result.is_err());
        assert!(cache.read().await.is_empty());
    }

    #[test]
    fn test_require_owner() {
        assert!(require_owner("u1").is_ok());
        assert!(matches!(require_owner("  "), Err(AppError::Unauthorized)));
    }
}
