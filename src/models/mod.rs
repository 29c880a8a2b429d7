//! Request and Response models for the backend API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{validate_year, GenerateWrappedRequest, SyncInsightsRequest};
pub use responses::{
    AudienceResponse, CacheStatsResponse, ErrorResponse, HealthResponse, InvalidateResponse,
    MediaResponse, ProfileResponse, ReportResponse, StoriesResponse, SyncResponse, TopPost,
    TtlResponse, WrappedSummary,
};
