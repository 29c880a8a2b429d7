//! Storage Module
//!
//! System of record for linked accounts, synced Instagram data and generated
//! reports. Every write is an idempotent upsert keyed by the resource's
//! natural identifier.

mod memory;
mod models;

use async_trait::async_trait;
use thiserror::Error;

use crate::instagram::{DailyInsight, DemographicRow, MediaWithInsights, Profile, StoryWithInsights};

pub use memory::MemoryRepository;
pub use models::{Account, Slide, WrappedReport};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("unknown account: {0}")]
    UnknownAccount(String),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Persistence operations used by the services.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Earliest-linked account for an owner, if any.
    async fn account_for_owner(&self, owner_id: &str) -> StorageResult<Option<Account>>;

    /// Links an account, keyed by Instagram user ID. Relinking keeps the
    /// original creation time and replaces the credential.
    async fn link_account(&self, account: Account) -> StorageResult<Account>;

    /// Refreshes the account's profile snapshot.
    async fn record_profile(&self, account_id: &str, profile: &Profile) -> StorageResult<()>;

    /// Upserts keyed by media ID. Returns the number of rows written.
    async fn upsert_media(&self, account_id: &str, media: &[MediaWithInsights])
        -> StorageResult<usize>;

    /// Upserts keyed by story ID.
    async fn upsert_stories(&self, account_id: &str, stories: &[StoryWithInsights])
        -> StorageResult<usize>;

    /// Upserts keyed by (account, date).
    async fn upsert_daily_insights(&self, account_id: &str, rows: &[DailyInsight])
        -> StorageResult<usize>;

    /// Upserts keyed by (account, dimension, key).
    async fn upsert_demographics(&self, account_id: &str, rows: &[DemographicRow])
        -> StorageResult<usize>;

    async fn media_for_account(&self, account_id: &str) -> StorageResult<Vec<MediaWithInsights>>;

    async fn daily_insights_for_account(&self, account_id: &str)
        -> StorageResult<Vec<DailyInsight>>;

    /// Upserts keyed by (owner, year).
    async fn upsert_report(&self, report: WrappedReport) -> StorageResult<WrappedReport>;

    async fn report_for(&self, owner_id: &str, year: i32) -> StorageResult<Option<WrappedReport>>;
}
