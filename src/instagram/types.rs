//! Instagram resource shapes as returned by the upstream client.
//!
//! Field names follow the Graph API so live responses deserialize directly.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Account profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub media_count: u64,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub follows_count: u64,
}

/// A published post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    #[serde(default)]
    pub caption: Option<String>,
    pub media_type: String,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    /// Graph API timestamp, e.g. `2025-03-01T18:04:11+0000`
    pub timestamp: String,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub comments_count: u64,
}

impl MediaItem {
    /// Parses `timestamp`, accepting both RFC 3339 and the Graph API's
    /// colon-less offset form.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        parse_graph_timestamp(&self.timestamp)
    }
}

/// Per-post insights. All zero when the sub-fetch failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaInsights {
    pub reach: u64,
    pub impressions: u64,
    pub saved: u64,
    pub shares: u64,
}

/// A post together with its insights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaWithInsights {
    #[serde(flatten)]
    pub item: MediaItem,
    pub insights: MediaInsights,
}

/// A story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    pub media_type: String,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    pub timestamp: String,
}

/// Per-story insights. All zero when the sub-fetch failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryInsights {
    pub reach: u64,
    pub impressions: u64,
    pub replies: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryWithInsights {
    #[serde(flatten)]
    pub story: Story,
    pub insights: StoryInsights,
}

/// One day of account-level insights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyInsight {
    pub date: NaiveDate,
    pub impressions: u64,
    pub reach: u64,
    pub profile_views: u64,
    pub follower_count: u64,
}

/// One audience breakdown bucket, e.g. `country` / `BR` / 1320.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemographicRow {
    pub dimension: String,
    pub key: String,
    pub value: u64,
}

pub(crate) fn parse_graph_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn media(timestamp: &str) -> MediaItem {
        MediaItem {
            id: "1".to_string(),
            caption: None,
            media_type: "IMAGE".to_string(),
            media_url: None,
            permalink: None,
            timestamp: timestamp.to_string(),
            like_count: 0,
            comments_count: 0,
        }
    }

    #[test]
    fn test_parse_graph_timestamp_formats() {
        assert_eq!(media("2025-03-01T18:04:11+0000").published_at().unwrap().year(), 2025);
        assert_eq!(media("2024-12-31T23:00:00Z").published_at().unwrap().year(), 2024);
        assert!(media("yesterday").published_at().is_none());
    }

    #[test]
    fn test_media_deserialize_with_missing_counts() {
        let json = r#"{"id":"17","media_type":"VIDEO","timestamp":"2025-01-01T00:00:00+0000"}"#;
        let item: MediaItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.like_count, 0);
        assert!(item.caption.is_none());
    }

    #[test]
    fn test_media_with_insights_flattens() {
        let value = serde_json::to_value(MediaWithInsights {
            item: media("2025-01-01T00:00:00Z"),
            insights: MediaInsights::default(),
        })
        .unwrap();
        assert_eq!(value["id"], "1");
        assert_eq!(value["insights"]["reach"], 0);
    }
}
