//! API Handlers
//!
//! HTTP request handlers for each backend endpoint. Handlers stay thin:
//! identity and body extraction here, everything else in the services.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use serde_json::Value;
use tracing::{info, warn};

use super::extract::OwnerId;
use crate::cache::{self, CacheStore, SharedCache};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::imaging::{ImageGenerator, OpenAiImages, PlaceholderImages};
use crate::instagram::{GraphApiClient, InstagramClient, MockInstagramClient};
use crate::models::{
    CacheStatsResponse, GenerateWrappedRequest, HealthResponse, InvalidateResponse,
    ReportResponse, SyncInsightsRequest, SyncResponse, TtlResponse,
};
use crate::services::{AggregatorSettings, InstagramService, WrappedService};
use crate::storage::{Account, MemoryRepository, Repository};

/// Token stored for the seeded account in mock mode.
pub const MOCK_ACCESS_TOKEN: &str = "mock-access-token";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache, also handed to the sweep task
    pub cache: SharedCache,
    pub instagram: Arc<InstagramService>,
    pub wrapped: Arc<WrappedService>,
}

impl AppState {
    pub fn new(
        cache: SharedCache,
        client: Arc<dyn InstagramClient>,
        repo: Arc<dyn Repository>,
        images: Arc<dyn ImageGenerator>,
        settings: AggregatorSettings,
    ) -> Self {
        let wrapped =
            WrappedService::new(cache.clone(), repo.clone(), images, settings.resource_ttl);
        let instagram = InstagramService::new(cache.clone(), client, repo, settings);
        Self {
            cache,
            instagram: Arc::new(instagram),
            wrapped: Arc::new(wrapped),
        }
    }

    /// Mock-mode state with an in-memory repository and placeholder images.
    /// Nothing is linked.
    pub fn mock(settings: AggregatorSettings) -> Self {
        let cache = cache::shared(CacheStore::new(settings.resource_ttl));
        Self::new(
            cache,
            Arc::new(MockInstagramClient::new()),
            Arc::new(MemoryRepository::new()),
            Arc::new(PlaceholderImages),
            settings,
        )
    }

    /// Builds the state from configuration and links the seed owner's
    /// account.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let settings = AggregatorSettings::from_config(config);
        let cache = cache::shared(CacheStore::new(config.cache_ttl()));
        let repo: Arc<dyn Repository> = Arc::new(MemoryRepository::new());

        let (client, token): (Arc<dyn InstagramClient>, Option<String>) = if config.mock_mode {
            info!("Mock mode enabled, serving the fixed Instagram dataset");
            (
                Arc::new(MockInstagramClient::new()),
                Some(MOCK_ACCESS_TOKEN.to_string()),
            )
        } else {
            let client = GraphApiClient::new(
                config.graph_api_base.as_str(),
                config.upstream_timeout(),
                config.media_limit,
            )?;
            (Arc::new(client), config.ig_access_token.clone())
        };

        let images: Arc<dyn ImageGenerator> = match &config.openai_api_key {
            Some(key) => Arc::new(OpenAiImages::new(
                key.as_str(),
                config.openai_image_model.as_str(),
                image_timeout(config),
            )?),
            None => Arc::new(PlaceholderImages),
        };

        match token {
            Some(token) => {
                seed_account(client.as_ref(), repo.as_ref(), &config.seed_owner_id, token).await
            }
            None => {
                warn!(owner_id = %config.seed_owner_id, "IG_ACCESS_TOKEN not set, no account linked")
            }
        }

        Ok(Self::new(cache, client, repo, images, settings))
    }
}

// Image generation is much slower than a Graph API call.
fn image_timeout(config: &Config) -> Duration {
    config.upstream_timeout().max(Duration::from_secs(60))
}

async fn seed_account(
    client: &dyn InstagramClient,
    repo: &dyn Repository,
    owner_id: &str,
    token: String,
) {
    let profile = match client.fetch_profile(&token).await {
        Ok(profile) => profile,
        Err(err) => {
            warn!(owner_id, error = %err, "Could not fetch seed profile, no account linked");
            return;
        }
    };

    let mut account = Account::new(
        owner_id,
        profile.id.as_str(),
        profile.username.as_str(),
        token,
    );
    account.followers_count = profile.followers_count;
    match repo.link_account(account).await {
        Ok(account) => info!(owner_id, username = %account.username, "Linked seed account"),
        Err(err) => warn!(owner_id, error = %err, "Failed to link seed account"),
    }
}

// == Instagram ==

/// Handler for GET /api/instagram/profile
pub async fn profile_handler(
    State(state): State<AppState>,
    OwnerId(owner): OwnerId,
) -> Result<Json<Value>> {
    Ok(Json(state.instagram.profile(&owner).await?))
}

/// Handler for GET /api/instagram/media
pub async fn media_handler(
    State(state): State<AppState>,
    OwnerId(owner): OwnerId,
) -> Result<Json<Value>> {
    Ok(Json(state.instagram.media(&owner).await?))
}

/// Handler for GET /api/instagram/stories
pub async fn stories_handler(
    State(state): State<AppState>,
    OwnerId(owner): OwnerId,
) -> Result<Json<Value>> {
    Ok(Json(state.instagram.stories(&owner).await?))
}

/// Handler for GET /api/instagram/audience
pub async fn audience_handler(
    State(state): State<AppState>,
    OwnerId(owner): OwnerId,
) -> Result<Json<Value>> {
    Ok(Json(state.instagram.audience(&owner).await?))
}

/// Handler for POST /api/instagram/insights/sync
///
/// An empty body syncs the default window. A body that does not parse is
/// rejected before any upstream work.
pub async fn sync_insights_handler(
    State(state): State<AppState>,
    OwnerId(owner): OwnerId,
    body: Bytes,
) -> Result<Json<SyncResponse>> {
    let request = SyncInsightsRequest::from_body(&body)
        .map_err(|err| AppError::Validation(format!("malformed body: {}", err)))?;
    Ok(Json(state.instagram.sync_insights(&owner, &request).await?))
}

/// Handler for POST /api/instagram/cache/invalidate
pub async fn invalidate_handler(
    State(state): State<AppState>,
    OwnerId(owner): OwnerId,
) -> Result<Json<InvalidateResponse>> {
    let removed = state.instagram.invalidate(&owner).await?;
    Ok(Json(InvalidateResponse { ok: true, removed }))
}

// == Cache ==

/// Handler for GET /api/cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    let stats = state.cache.read().await.stats();
    Json(stats.into())
}

/// Handler for GET /api/cache/ttl/:key
pub async fn cache_ttl_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<TtlResponse>> {
    let remaining = state
        .cache
        .read()
        .await
        .remaining_ttl(&key)
        .ok_or_else(|| AppError::NotFound(format!("key '{}' is absent or expired", key)))?;

    // Round to the nearest second
    let ttl_seconds = (remaining.as_millis() as u64 + 500) / 1000;
    Ok(Json(TtlResponse { key, ttl_seconds }))
}

// == Wrapped ==

/// Handler for GET /api/wrapped/data/:year
pub async fn wrapped_data_handler(
    State(state): State<AppState>,
    OwnerId(owner): OwnerId,
    year: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<Value>> {
    let Path(year) = year?;
    Ok(Json(state.wrapped.summary(&owner, year).await?))
}

/// Handler for POST /api/wrapped/generate
pub async fn generate_wrapped_handler(
    State(state): State<AppState>,
    OwnerId(owner): OwnerId,
    body: std::result::Result<Json<GenerateWrappedRequest>, JsonRejection>,
) -> Result<Json<ReportResponse>> {
    let Json(req) = body?;
    let report = state.wrapped.generate(&owner, &req).await?;
    Ok(Json(ReportResponse { report }))
}

/// Handler for GET /api/wrapped/reports/:year
pub async fn wrapped_report_handler(
    State(state): State<AppState>,
    OwnerId(owner): OwnerId,
    year: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<ReportResponse>> {
    let Path(year) = year?;
    let report = state.wrapped.report(&owner, year).await?;
    Ok(Json(ReportResponse { report }))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded_state() -> AppState {
        AppState::from_config(&Config::default()).await.unwrap()
    }

    #[tokio::test]
    async fn test_from_config_links_seed_owner_in_mock_mode() {
        let state = seeded_state().await;

        let Json(value) = profile_handler(State(state), OwnerId("demo-user".into()))
            .await
            .unwrap();
        assert_eq!(value["account"]["owner_id"], "demo-user");
        assert_eq!(value["profile"]["username"], "mock.creator");
        assert!(value["account"].get("access_token").is_none());
    }

    #[tokio::test]
    async fn test_mock_state_has_no_linked_owner() {
        let state = AppState::mock(AggregatorSettings::default());

        let result = media_handler(State(state), OwnerId("demo-user".into())).await;
        assert!(matches!(result, Err(AppError::NotLinked(_))));
    }

    #[tokio::test]
    async fn test_ttl_handler_rounds_and_reports_absent() {
        let state = AppState::mock(AggregatorSettings::default());
        state
            .cache
            .write()
            .await
            .set("profile:u1", serde_json::json!({}), Some(Duration::from_secs(90)));

        let Json(ttl) = cache_ttl_handler(State(state.clone()), Path("profile:u1".into()))
            .await
            .unwrap();
        assert!(ttl.ttl_seconds == 90 || ttl.ttl_seconds == 89);

        let missing = cache_ttl_handler(State(state), Path("profile:u2".into())).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_sync_without_body_uses_default_window() {
        let state = seeded_state().await;

        let Json(resp) = sync_insights_handler(State(state), OwnerId("demo-user".into()), Bytes::new())
            .await
            .unwrap();
        assert_eq!(resp.days, 30);
        assert_eq!(resp.synced, 30);
    }

    #[tokio::test]
    async fn test_invalidate_handler_counts_removed() {
        let state = seeded_state().await;
        let owner = || OwnerId("demo-user".into());

        profile_handler(State(state.clone()), owner()).await.unwrap();
        audience_handler(State(state.clone()), owner()).await.unwrap();

        let Json(resp) = invalidate_handler(State(state.clone()), owner()).await.unwrap();
        assert!(resp.ok);
        assert_eq!(resp.removed, 2);

        let Json(stats) = cache_stats_handler(State(state)).await;
        assert_eq!(stats.size, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
