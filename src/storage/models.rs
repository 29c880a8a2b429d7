//! Records held by the system of record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A linked Instagram account and the credential used to query it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Internal account ID
    pub id: String,
    /// Application user that linked the account
    pub owner_id: String,
    pub instagram_user_id: String,
    pub username: String,
    /// Never serialized back to clients
    #[serde(skip_serializing, default)]
    pub access_token: String,
    #[serde(default)]
    pub followers_count: u64,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        owner_id: impl Into<String>,
        instagram_user_id: impl Into<String>,
        username: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        let instagram_user_id = instagram_user_id.into();
        Self {
            id: format!("acct-{}", instagram_user_id),
            owner_id: owner_id.into(),
            instagram_user_id,
            username: username.into(),
            access_token: access_token.into(),
            followers_count: 0,
            created_at: Utc::now(),
        }
    }
}

/// One recap slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub title: String,
    pub text: String,
}

/// A generated yearly recap, unique per (owner, year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrappedReport {
    pub owner_id: String,
    pub year: i32,
    pub title: String,
    pub summary: String,
    pub slides: Vec<Slide>,
    pub image_ref: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
