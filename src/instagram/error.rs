//! Upstream error types.

use std::time::Duration;

use thiserror::Error;

/// Failure of a call to the Instagram Graph API (or its stand-in).
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Transport-level failure: DNS, connect, TLS, body read
    #[error("request to Instagram failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response carrying the Graph API error envelope
    #[error("Instagram API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("unexpected Instagram response: {0}")]
    Decode(String),

    #[error("{step} timed out after {}s", .after.as_secs_f64())]
    Timeout { step: &'static str, after: Duration },
}

impl UpstreamError {
    /// Convenience for test doubles and mocks.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}

pub type UpstreamResult<T> = std::result::Result<T, UpstreamError>;
