//! Response DTOs for the backend API
//!
//! Defines the structure of outgoing HTTP response bodies. Aggregate
//! responses are also what the cache stores.

use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;
use crate::instagram::{DemographicRow, MediaWithInsights, Profile, StoryWithInsights};
use crate::storage::{Account, Slide, WrappedReport};

/// GET /api/instagram/profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub account: Account,
    pub profile: Profile,
}

/// GET /api/instagram/media
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaResponse {
    pub count: usize,
    pub media: Vec<MediaWithInsights>,
}

impl MediaResponse {
    pub fn new(media: Vec<MediaWithInsights>) -> Self {
        Self {
            count: media.len(),
            media,
        }
    }
}

/// GET /api/instagram/stories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoriesResponse {
    pub count: usize,
    pub stories: Vec<StoryWithInsights>,
}

impl StoriesResponse {
    pub fn new(stories: Vec<StoryWithInsights>) -> Self {
        Self {
            count: stories.len(),
            stories,
        }
    }
}

/// GET /api/instagram/audience
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudienceResponse {
    pub count: usize,
    pub rows: Vec<DemographicRow>,
}

impl AudienceResponse {
    pub fn new(rows: Vec<DemographicRow>) -> Self {
        Self {
            count: rows.len(),
            rows,
        }
    }
}

/// POST /api/instagram/insights/sync
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResponse {
    pub synced: usize,
    pub days: u32,
}

/// POST /api/instagram/cache/invalidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvalidateResponse {
    pub ok: bool,
    /// Number of cache entries dropped
    pub removed: usize,
}

/// GET /api/cache/stats
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    pub size: usize,
    pub keys: Vec<String>,
    pub hits: u64,
    pub misses: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for CacheStatsResponse {
    fn from(stats: CacheStats) -> Self {
        let hit_rate = stats.hit_rate();
        Self {
            size: stats.size,
            keys: stats.keys,
            hits: stats.hits,
            misses: stats.misses,
            hit_rate,
        }
    }
}

/// GET /api/cache/ttl/:key
#[derive(Debug, Clone, Serialize)]
pub struct TtlResponse {
    pub key: String,
    pub ttl_seconds: u64,
}

/// Highest-liked post of the year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPost {
    pub id: String,
    pub caption: Option<String>,
    pub like_count: u64,
    pub permalink: Option<String>,
}

/// GET /api/wrapped/data/:year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrappedSummary {
    pub year: i32,
    pub username: String,
    pub post_count: usize,
    pub total_likes: u64,
    pub total_comments: u64,
    pub avg_reach: u64,
    pub top_post: Option<TopPost>,
    pub slides: Vec<Slide>,
}

/// POST /api/wrapped/generate and GET /api/wrapped/reports/:year
#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub report: WrappedReport,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable category, e.g. `not_linked`
    pub error: String,
    /// Human-readable description
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_response_hit_rate() {
        let resp = CacheStatsResponse::from(CacheStats {
            size: 2,
            keys: vec!["a".into(), "b".into()],
            hits: 80,
            misses: 20,
        });
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.size, 2);
    }

    #[test]
    fn test_profile_response_hides_token() {
        let resp = ProfileResponse {
            account: Account::new("u1", "ig-1", "mock.creator", "secret-token"),
            profile: Profile {
                id: "ig-1".into(),
                username: "mock.creator".into(),
                account_type: None,
                media_count: 0,
                followers_count: 0,
                follows_count: 0,
            },
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("secret-token"));
        assert!(json.contains("mock.creator"));
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("not_linked", "No Instagram account linked");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["error"], "not_linked");
        assert_eq!(json["message"], "No Instagram account linked");
    }
}
