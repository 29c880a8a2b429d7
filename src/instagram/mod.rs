//! Instagram Module
//!
//! Upstream data client used by the aggregators. The live implementation
//! talks to the Graph API; the mock returns a fixed dataset for local runs.

mod error;
mod graph;
mod mock;
mod types;

use async_trait::async_trait;

pub use error::{UpstreamError, UpstreamResult};
pub use graph::{GraphApiClient, DEFAULT_GRAPH_API_BASE};
pub use mock::MockInstagramClient;
pub use types::{
    DailyInsight, DemographicRow, MediaInsights, MediaItem, MediaWithInsights, Profile, Story,
    StoryInsights, StoryWithInsights,
};

pub(crate) use types::parse_graph_timestamp;

/// Resource fetches against Instagram, authenticated by an access token.
#[async_trait]
pub trait InstagramClient: Send + Sync {
    async fn fetch_profile(&self, token: &str) -> UpstreamResult<Profile>;

    async fn fetch_media(&self, token: &str) -> UpstreamResult<Vec<MediaItem>>;

    async fn fetch_media_insights(&self, token: &str, media_id: &str)
        -> UpstreamResult<MediaInsights>;

    async fn fetch_stories(&self, token: &str) -> UpstreamResult<Vec<Story>>;

    async fn fetch_story_insights(&self, token: &str, story_id: &str)
        -> UpstreamResult<StoryInsights>;

    /// Audience demographics across every supported breakdown.
    async fn fetch_audience(&self, token: &str) -> UpstreamResult<Vec<DemographicRow>>;

    /// Daily account insights for the last `days` days.
    async fn fetch_account_insights(&self, token: &str, days: u32)
        -> UpstreamResult<Vec<DailyInsight>>;
}
