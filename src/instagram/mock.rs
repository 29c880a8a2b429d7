//! Fixed dataset standing in for the Graph API when running in mock mode.

use async_trait::async_trait;
use chrono::{Duration, SecondsFormat, Utc};

use super::{
    DailyInsight, DemographicRow, InstagramClient, MediaInsights, MediaItem, Profile, Story,
    StoryInsights, UpstreamResult,
};

const MEDIA_COUNT: u64 = 8;
const STORY_COUNT: u64 = 3;

/// Deterministic mock client. Counts and values are fixed; timestamps are
/// relative to the time of the call.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockInstagramClient;

impl MockInstagramClient {
    pub fn new() -> Self {
        Self
    }
}

fn index_of(id: &str) -> u64 {
    id.rsplit('-')
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

fn days_ago(days: u64) -> String {
    (Utc::now() - Duration::days(days as i64)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[async_trait]
impl InstagramClient for MockInstagramClient {
    async fn fetch_profile(&self, _token: &str) -> UpstreamResult<Profile> {
        Ok(Profile {
            id: "mock-ig-001".to_string(),
            username: "mock.creator".to_string(),
            account_type: Some("CREATOR".to_string()),
            media_count: 42,
            followers_count: 12_034,
            follows_count: 420,
        })
    }

    async fn fetch_media(&self, _token: &str) -> UpstreamResult<Vec<MediaItem>> {
        Ok((0..MEDIA_COUNT)
            .map(|i| {
                let n = i + 1;
                MediaItem {
                    id: format!("mock-media-{}", n),
                    caption: Some(format!("Mock post #{}", n)),
                    media_type: if i % 2 == 0 { "IMAGE" } else { "VIDEO" }.to_string(),
                    media_url: Some(format!("https://picsum.photos/seed/mock-{}/1000/1000", n)),
                    permalink: Some(format!("https://instagram.com/p/mock-{}", n)),
                    timestamp: days_ago(i),
                    like_count: 120 + i * 12,
                    comments_count: 10 + i * 2,
                }
            })
            .collect())
    }

    async fn fetch_media_insights(
        &self,
        _token: &str,
        media_id: &str,
    ) -> UpstreamResult<MediaInsights> {
        let i = index_of(media_id);
        Ok(MediaInsights {
            reach: 800 + i * 45,
            impressions: 1_100 + i * 60,
            saved: 12 + i * 3,
            shares: 4 + i,
        })
    }

    async fn fetch_stories(&self, _token: &str) -> UpstreamResult<Vec<Story>> {
        Ok((0..STORY_COUNT)
            .map(|i| {
                let n = i + 1;
                Story {
                    id: format!("mock-story-{}", n),
                    media_type: "IMAGE".to_string(),
                    media_url: Some(format!("https://picsum.photos/seed/story-{}/1080/1920", n)),
                    permalink: Some(format!("https://instagram.com/stories/mock.creator/{}", n)),
                    timestamp: days_ago(0),
                }
            })
            .collect())
    }

    async fn fetch_story_insights(
        &self,
        _token: &str,
        story_id: &str,
    ) -> UpstreamResult<StoryInsights> {
        let i = index_of(story_id);
        Ok(StoryInsights {
            reach: 400 + i * 30,
            impressions: 520 + i * 35,
            replies: 2 + i,
        })
    }

    async fn fetch_audience(&self, _token: &str) -> UpstreamResult<Vec<DemographicRow>> {
        let row = |dimension: &str, key: &str, value: u64| DemographicRow {
            dimension: dimension.to_string(),
            key: key.to_string(),
            value,
        };
        Ok(vec![
            row("country", "US", 4_210),
            row("country", "BR", 1_320),
            row("country", "DE", 870),
            row("age", "18-24", 3_900),
            row("age", "25-34", 5_100),
            row("age", "35-44", 1_640),
            row("gender", "F", 6_800),
            row("gender", "M", 5_234),
        ])
    }

    async fn fetch_account_insights(
        &self,
        _token: &str,
        days: u32,
    ) -> UpstreamResult<Vec<DailyInsight>> {
        let today = Utc::now().date_naive();
        Ok((0..u64::from(days))
            .map(|i| DailyInsight {
                date: today - Duration::days(i as i64),
                impressions: 1_000 + i * 15,
                reach: 700 + i * 11,
                profile_views: 90 + i,
                follower_count: 11_500 + i * 5,
            })
            .collect())
    }
}
