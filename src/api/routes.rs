//! API Routes
//!
//! Configures the Axum router with all backend endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    audience_handler, cache_stats_handler, cache_ttl_handler, generate_wrapped_handler,
    health_handler, invalidate_handler, media_handler, profile_handler, stories_handler,
    sync_insights_handler, wrapped_data_handler, wrapped_report_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let instagram = Router::new()
        .route("/profile", get(profile_handler))
        .route("/media", get(media_handler))
        .route("/stories", get(stories_handler))
        .route("/audience", get(audience_handler))
        .route("/insights/sync", post(sync_insights_handler))
        .route("/cache/invalidate", post(invalidate_handler));

    let cache = Router::new()
        .route("/stats", get(cache_stats_handler))
        .route("/ttl/:key", get(cache_ttl_handler));

    let wrapped = Router::new()
        .route("/data/:year", get(wrapped_data_handler))
        .route("/generate", post(generate_wrapped_handler))
        .route("/reports/:year", get(wrapped_report_handler));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/instagram", instagram)
        .nest("/api/cache", cache)
        .nest("/api/wrapped", wrapped)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
