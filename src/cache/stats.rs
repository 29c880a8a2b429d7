//! Cache Statistics Module
//!
//! Point-in-time introspection of the store. Diagnostic only.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of the store's contents and read counters.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CacheStats {
    /// Number of stored entries, including expired ones not yet swept
    pub size: usize,
    /// Stored keys, sorted
    pub keys: Vec<String>,
    /// Number of reads that returned a value
    pub hits: u64,
    /// Number of reads that found nothing or an expired entry
    pub misses: u64,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = CacheStats::default();
        assert_eq!(stats.size, 0);
        assert!(stats.keys.is_empty());
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..Default::default()
        };
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_stats_serialize() {
        let stats = CacheStats {
            size: 1,
            keys: vec!["media:42".to_string()],
            hits: 0,
            misses: 0,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["size"], 1);
        assert_eq!(json["keys"][0], "media:42");
    }
}
