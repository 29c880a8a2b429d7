//! Request extractors.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

/// Header carrying the caller's identity, set by the upstream auth layer.
pub const OWNER_HEADER: &str = "x-user-id";

/// Authenticated owner identity from the `x-user-id` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerId(pub String);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for OwnerId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(OWNER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| OwnerId(v.to_string()))
            .ok_or(AppError::Unauthorized)
    }
}
