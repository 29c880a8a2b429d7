//! Cache-fronted Instagram aggregations and owner invalidation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, StreamExt};
use serde_json::Value;
use tracing::{info, warn};

use super::{cache_through, require_owner};
use crate::cache::{CacheKey, Resource, SharedCache, DEFAULT_TTL};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::instagram::{
    InstagramClient, MediaInsights, MediaWithInsights, StoryInsights, StoryWithInsights,
    UpstreamError, UpstreamResult,
};
use crate::models::{
    AudienceResponse, MediaResponse, ProfileResponse, StoriesResponse, SyncInsightsRequest,
    SyncResponse,
};
use crate::storage::{Account, Repository};

/// Knobs for the aggregation path.
#[derive(Debug, Clone)]
pub struct AggregatorSettings {
    /// TTL for cached aggregates
    pub resource_ttl: Duration,
    /// Timeout applied to every individual upstream call
    pub step_timeout: Duration,
    /// Max in-flight per-item insights calls
    pub fan_out_concurrency: usize,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            resource_ttl: DEFAULT_TTL,
            step_timeout: Duration::from_secs(15),
            fan_out_concurrency: 4,
        }
    }
}

impl AggregatorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            resource_ttl: config.cache_ttl(),
            step_timeout: config.upstream_timeout(),
            fan_out_concurrency: config.insights_concurrency.max(1),
        }
    }
}

/// Fetch-persist-cache pipeline for each Instagram resource.
pub struct InstagramService {
    cache: SharedCache,
    client: Arc<dyn InstagramClient>,
    repo: Arc<dyn Repository>,
    settings: AggregatorSettings,
}

impl InstagramService {
    pub fn new(
        cache: SharedCache,
        client: Arc<dyn InstagramClient>,
        repo: Arc<dyn Repository>,
        settings: AggregatorSettings,
    ) -> Self {
        Self {
            cache,
            client,
            repo,
            settings,
        }
    }

    // == Aggregations ==

    /// Account summary plus live profile.
    pub async fn profile(&self, owner_id: &str) -> Result<Value> {
        self.cached(Resource::Profile, owner_id, || self.load_profile(owner_id))
            .await
    }

    /// Media list with per-item insights.
    pub async fn media(&self, owner_id: &str) -> Result<Value> {
        self.cached(Resource::Media, owner_id, || self.load_media(owner_id))
            .await
    }

    /// Current stories with per-story insights.
    pub async fn stories(&self, owner_id: &str) -> Result<Value> {
        self.cached(Resource::Stories, owner_id, || self.load_stories(owner_id))
            .await
    }

    /// Audience demographics.
    pub async fn audience(&self, owner_id: &str) -> Result<Value> {
        self.cached(Resource::Audience, owner_id, || self.load_audience(owner_id))
            .await
    }

    /// Pulls daily account insights into storage. Not cached.
    pub async fn sync_insights(
        &self,
        owner_id: &str,
        request: &SyncInsightsRequest,
    ) -> Result<SyncResponse> {
        require_owner(owner_id)?;
        if let Some(message) = request.validate() {
            return Err(AppError::Validation(message));
        }
        let days = request.days();

        let account = self.account(owner_id).await?;
        let rows = self
            .step(
                "account insights",
                self.client.fetch_account_insights(&account.access_token, days),
            )
            .await?;
        let synced = self.repo.upsert_daily_insights(&account.id, &rows).await?;

        info!(owner_id, synced, days, "Synced daily insights");
        Ok(SyncResponse { synced, days })
    }

    // == Invalidation ==

    /// Drops every cached resource for `owner_id`. The next read of each
    /// resource goes upstream. Storage is not touched.
    pub async fn invalidate(&self, owner_id: &str) -> Result<usize> {
        require_owner(owner_id)?;

        let removed: usize = {
            let mut cache = self.cache.write().await;
            Resource::ALL
                .iter()
                .map(|resource| cache.delete_by_prefix(&CacheKey::owner_prefix(*resource, owner_id)))
                .sum()
        };

        info!(owner_id, removed, "Invalidated cached resources");
        Ok(removed)
    }

    // == Loaders ==

    async fn load_profile(&self, owner_id: &str) -> Result<ProfileResponse> {
        let mut account = self.account(owner_id).await?;
        let profile = self
            .step("profile", self.client.fetch_profile(&account.access_token))
            .await?;
        self.repo.record_profile(&account.id, &profile).await?;

        account.username = profile.username.clone();
        account.followers_count = profile.followers_count;
        Ok(ProfileResponse { account, profile })
    }

    async fn load_media(&self, owner_id: &str) -> Result<MediaResponse> {
        let account = self.account(owner_id).await?;
        let token = account.access_token.as_str();
        let items = self
            .step("media list", self.client.fetch_media(token))
            .await?;

        let media: Vec<MediaWithInsights> = stream::iter(items)
            .map(|item| async move {
                let insights = self
                    .step(
                        "media insights",
                        self.client.fetch_media_insights(token, &item.id),
                    )
                    .await
                    .unwrap_or_else(|err| {
                        warn!(media_id = %item.id, error = %err, "Media insights unavailable, using zero defaults");
                        MediaInsights::default()
                    });
                MediaWithInsights { item, insights }
            })
            .buffered(self.settings.fan_out_concurrency.max(1))
            .collect()
            .await;

        self.repo.upsert_media(&account.id, &media).await?;
        info!(owner_id, count = media.len(), "Aggregated media");
        Ok(MediaResponse::new(media))
    }

    async fn load_stories(&self, owner_id: &str) -> Result<StoriesResponse> {
        let account = self.account(owner_id).await?;
        let token = account.access_token.as_str();
        let stories = self
            .step("stories", self.client.fetch_stories(token))
            .await?;

        let stories: Vec<StoryWithInsights> = stream::iter(stories)
            .map(|story| async move {
                let insights = self
                    .step(
                        "story insights",
                        self.client.fetch_story_insights(token, &story.id),
                    )
                    .await
                    .unwrap_or_else(|err| {
                        warn!(story_id = %story.id, error = %err, "Story insights unavailable, using zero defaults");
                        StoryInsights::default()
                    });
                StoryWithInsights { story, insights }
            })
            .buffered(self.settings.fan_out_concurrency.max(1))
            .collect()
            .await;

        self.repo.upsert_stories(&account.id, &stories).await?;
        info!(owner_id, count = stories.len(), "Aggregated stories");
        Ok(StoriesResponse::new(stories))
    }

    async fn load_audience(&self, owner_id: &str) -> Result<AudienceResponse> {
        let account = self.account(owner_id).await?;
        let rows = self
            .step("audience", self.client.fetch_audience(&account.access_token))
            .await?;
        self.repo.upsert_demographics(&account.id, &rows).await?;
        Ok(AudienceResponse::new(rows))
    }

    // == Helpers ==

    async fn cached<T, F, Fut>(&self, resource: Resource, owner_id: &str, load: F) -> Result<Value>
    where
        T: serde::Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        require_owner(owner_id)?;
        let key = CacheKey::for_owner(resource, owner_id);
        cache_through(&self.cache, key, self.settings.resource_ttl, load).await
    }

    async fn account(&self, owner_id: &str) -> Result<Account> {
        self.repo
            .account_for_owner(owner_id)
            .await?
            .ok_or_else(|| AppError::NotLinked(owner_id.to_string()))
    }

    /// Runs one upstream call under the per-step timeout.
    async fn step<T>(
        &self,
        step: &'static str,
        call: impl Future<Output = UpstreamResult<T>>,
    ) -> UpstreamResult<T> {
        let after = self.settings.step_timeout;
        match tokio::time::timeout(after, call).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::Timeout { step, after }),
        }
    }
}
