//! Error types for the backend
//!
//! Provides unified error handling using thiserror. Every variant maps to a
//! status code and a machine-readable category in the response body.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::instagram::UpstreamError;
use crate::models::ErrorResponse;
use crate::storage::StorageError;

// == App Error Enum ==
/// Unified error type for request handling.
#[derive(Error, Debug)]
pub enum AppError {
    /// No owner identity on the request
    #[error("Unauthorized: x-user-id header missing")]
    Unauthorized,

    /// The owner has no linked Instagram account
    #[error("No Instagram account linked for user '{0}'. Complete OAuth first.")]
    NotLinked(String),

    /// Malformed or out-of-range input
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A required upstream call failed
    #[error("Upstream failure: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Storage failure: {0}")]
    Storage(#[from] StorageError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable category string for clients.
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "unauthorized",
            AppError::NotLinked(_) => "not_linked",
            AppError::Validation(_) => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::Upstream(_) => "upstream_failure",
            AppError::Storage(_) => "storage_failure",
            AppError::Internal(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotLinked(_) | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

// Extractor rejections surface as validation errors with the usual body.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(category = self.category(), "{}", self);
        }

        let body = Json(ErrorResponse::new(self.category(), self.to_string()));
        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for request handling.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NotLinked("u1".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Validation("year".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Upstream(UpstreamError::api(500, "boom")).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[tokio::test]
    async fn test_error_body_has_category_and_message() {
        let response = AppError::NotLinked("u1".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "not_linked");
        assert!(json["message"].as_str().unwrap().contains("u1"));
    }
}
