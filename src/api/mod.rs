//! API Module
//!
//! HTTP handlers and routing for the backend REST API.
//!
//! # Endpoints
//! - `GET /health` - Health check
//! - `GET /api/instagram/{profile,media,stories,audience}` - Cached aggregates
//! - `POST /api/instagram/insights/sync` - Sync daily account insights
//! - `POST /api/instagram/cache/invalidate` - Drop the caller's cached aggregates
//! - `GET /api/cache/stats` - Cache statistics
//! - `GET /api/cache/ttl/:key` - Remaining TTL of one key
//! - `GET /api/wrapped/data/:year` - Year summary
//! - `POST /api/wrapped/generate` - Build and store a Wrapped report
//! - `GET /api/wrapped/reports/:year` - Fetch a stored report

pub mod extract;
pub mod handlers;
pub mod routes;

pub use extract::{OwnerId, OWNER_HEADER};
pub use handlers::*;
pub use routes::create_router;
