//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

// == Cache Entry ==
/// A stored value together with its absolute expiry instant.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp (Unix milliseconds, store clock)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds, store clock)
    pub expires_at: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry written at `now_ms` that lives for `ttl`.
    ///
    /// A zero `ttl` yields an entry that is already expired.
    pub fn new(value: V, now_ms: u64, ttl: Duration) -> Self {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        Self {
            value,
            created_at: now_ms,
            expires_at: now_ms.saturating_add(ttl_ms),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// Boundary condition: the entry is expired once `now_ms >= expires_at`,
    /// so an entry read exactly at its expiry instant is already gone.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }

    // == Time To Live ==
    /// Returns the time left before expiry, or None if already expired.
    pub fn remaining_at(&self, now_ms: u64) -> Option<Duration> {
        if self.is_expired_at(now_ms) {
            None
        } else {
            Some(Duration::from_millis(self.expires_at - now_ms))
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("test_value".to_string(), 1_000, Duration::from_secs(60));

        assert_eq!(entry.value, "test_value");
        assert_eq!(entry.created_at, 1_000);
        assert_eq!(entry.expires_at, 61_000);
        assert!(!entry.is_expired_at(1_000));
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("v", 0, Duration::from_millis(1_000));

        assert!(!entry.is_expired_at(999));
        assert!(entry.is_expired_at(1_001));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new("v", 500, Duration::from_millis(100));

        // Entry should be expired when current time >= expires_at
        assert!(entry.is_expired_at(600), "Entry should be expired at boundary");
    }

    #[test]
    fn test_zero_ttl_is_immediately_expired() {
        let entry = CacheEntry::new("v", 500, Duration::ZERO);
        assert!(entry.is_expired_at(500));
        assert!(entry.remaining_at(500).is_none());
    }

    #[test]
    fn test_remaining_counts_down() {
        let entry = CacheEntry::new("v", 0, Duration::from_secs(10));

        assert_eq!(entry.remaining_at(0), Some(Duration::from_secs(10)));
        assert_eq!(entry.remaining_at(4_000), Some(Duration::from_secs(6)));
        assert_eq!(entry.remaining_at(10_000), None);
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let entry = CacheEntry::new("v", 10, Duration::MAX);
        assert_eq!(entry.expires_at, u64::MAX);
        assert!(!entry.is_expired_at(u64::MAX - 1));
    }
}
