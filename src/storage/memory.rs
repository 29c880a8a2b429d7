//! In-memory repository.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;

use super::{Account, Repository, StorageError, StorageResult, WrappedReport};
use crate::instagram::{DailyInsight, DemographicRow, MediaWithInsights, Profile, StoryWithInsights};

#[derive(Debug, Default)]
struct Tables {
    /// Keyed by Instagram user ID
    accounts: HashMap<String, Account>,
    /// Keyed by media ID
    media: HashMap<String, (String, MediaWithInsights)>,
    /// Keyed by story ID
    stories: HashMap<String, (String, StoryWithInsights)>,
    daily_insights: HashMap<(String, NaiveDate), DailyInsight>,
    demographics: HashMap<(String, String, String), u64>,
    reports: HashMap<(String, i32), WrappedReport>,
}

impl Tables {
    fn require_account(&self, account_id: &str) -> StorageResult<()> {
        if self.accounts.values().any(|a| a.id == account_id) {
            Ok(())
        } else {
            Err(StorageError::UnknownAccount(account_id.to_string()))
        }
    }
}

/// Repository backed by process memory. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn stories_for_account(&self, account_id: &str) -> Vec<StoryWithInsights> {
        let tables = self.tables.read().await;
        let mut stories: Vec<_> = tables
            .stories
            .values()
            .filter(|(owner, _)| owner == account_id)
            .map(|(_, s)| s.clone())
            .collect();
        stories.sort_by(|a, b| a.story.id.cmp(&b.story.id));
        stories
    }

    pub async fn demographics_for_account(&self, account_id: &str) -> Vec<DemographicRow> {
        let tables = self.tables.read().await;
        let mut rows: Vec<_> = tables
            .demographics
            .iter()
            .filter(|((acct, _, _), _)| acct == account_id)
            .map(|((_, dimension, key), value)| DemographicRow {
                dimension: dimension.clone(),
                key: key.clone(),
                value: *value,
            })
            .collect();
        rows.sort_by(|a, b| (&a.dimension, &a.key).cmp(&(&b.dimension, &b.key)));
        rows
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn account_for_owner(&self, owner_id: &str) -> StorageResult<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .filter(|a| a.owner_id == owner_id)
            .min_by_key(|a| a.created_at)
            .cloned())
    }

    async fn link_account(&self, account: Account) -> StorageResult<Account> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .accounts
            .entry(account.instagram_user_id.clone())
            .and_modify(|existing| {
                existing.owner_id = account.owner_id.clone();
                existing.username = account.username.clone();
                existing.access_token = account.access_token.clone();
            })
            .or_insert(account);
        Ok(stored.clone())
    }

    async fn record_profile(&self, account_id: &str, profile: &Profile) -> StorageResult<()> {
        let mut tables = self.tables.write().await;
        let account = tables
            .accounts
            .values_mut()
            .find(|a| a.id == account_id)
            .ok_or_else(|| StorageError::UnknownAccount(account_id.to_string()))?;
        account.username = profile.username.clone();
        account.followers_count = profile.followers_count;
        Ok(())
    }

    async fn upsert_media(
        &self,
        account_id: &str,
        media: &[MediaWithInsights],
    ) -> StorageResult<usize> {
        let mut tables = self.tables.write().await;
        tables.require_account(account_id)?;
        for item in media {
            tables.media.insert(
                item.item.id.clone(),
                (account_id.to_string(), item.clone()),
            );
        }
        Ok(media.len())
    }

    async fn upsert_stories(
        &self,
        account_id: &str,
        stories: &[StoryWithInsights],
    ) -> StorageResult<usize> {
        let mut tables = self.tables.write().await;
        tables.require_account(account_id)?;
        for story in stories {
            tables.stories.insert(
                story.story.id.clone(),
                (account_id.to_string(), story.clone()),
            );
        }
        Ok(stories.len())
    }

    async fn upsert_daily_insights(
        &self,
        account_id: &str,
        rows: &[DailyInsight],
    ) -> StorageResult<usize> {
        let mut tables = self.tables.write().await;
        tables.require_account(account_id)?;
        for row in rows {
            tables
                .daily_insights
                .insert((account_id.to_string(), row.date), row.clone());
        }
        Ok(rows.len())
    }

    async fn upsert_demographics(
        &self,
        account_id: &str,
        rows: &[DemographicRow],
    ) -> StorageResult<usize> {
        let mut tables = self.tables.write().await;
        tables.require_account(account_id)?;
        for row in rows {
            tables.demographics.insert(
                (account_id.to_string(), row.dimension.clone(), row.key.clone()),
                row.value,
            );
        }
        Ok(rows.len())
    }

    async fn media_for_account(&self, account_id: &str) -> StorageResult<Vec<MediaWithInsights>> {
        let tables = self.tables.read().await;
        let mut media: Vec<_> = tables
            .media
            .values()
            .filter(|(owner, _)| owner == account_id)
            .map(|(_, m)| m.clone())
            .collect();
        media.sort_by(|a, b| a.item.id.cmp(&b.item.id));
        Ok(media)
    }

    async fn daily_insights_for_account(
        &self,
        account_id: &str,
    ) -> StorageResult<Vec<DailyInsight>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<_> = tables
            .daily_insights
            .iter()
            .filter(|((acct, _), _)| acct == account_id)
            .map(|(_, row)| row.clone())
            .collect();
        rows.sort_by_key(|r| r.date);
        Ok(rows)
    }

    async fn upsert_report(&self, mut report: WrappedReport) -> StorageResult<WrappedReport> {
        let mut tables = self.tables.write().await;
        let key = (report.owner_id.clone(), report.year);
        if let Some(existing) = tables.reports.get(&key) {
            report.created_at = existing.created_at;
        }
        report.updated_at = Utc::now();
        tables.reports.insert(key, report.clone());
        Ok(report)
    }

    async fn report_for(&self, owner_id: &str, year: i32) -> StorageResult<Option<WrappedReport>> {
        let tables = self.tables.read().await;
        Ok(tables.reports.get(&(owner_id.to_string(), year)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instagram::{MediaInsights, MediaItem};
    use chrono::Duration;

    fn media(id: &str, likes: u64) -> MediaWithInsights {
        MediaWithInsights {
            item: MediaItem {
                id: id.to_string(),
                caption: None,
                media_type: "IMAGE".to_string(),
                media_url: None,
                permalink: None,
                timestamp: "2025-06-01T12:00:00+0000".to_string(),
                like_count: likes,
                comments_count: 0,
            },
            insights: MediaInsights::default(),
        }
    }

    #[tokio::test]
    async fn test_account_for_owner_picks_earliest() {
        let repo = MemoryRepository::new();
        let mut older = Account::new("u1", "ig-1", "first", "t1");
        older.created_at = Utc::now() - Duration::days(3);
        repo.link_account(Account::new("u1", "ig-2", "second", "t2")).await.unwrap();
        repo.link_account(older).await.unwrap();

        let account = repo.account_for_owner("u1").await.unwrap().unwrap();
        assert_eq!(account.username, "first");
        assert!(repo.account_for_owner("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_relink_replaces_token() {
        let repo = MemoryRepository::new();
        let first = repo.link_account(Account::new("u1", "ig-1", "a", "old")).await.unwrap();
        let second = repo.link_account(Account::new("u1", "ig-1", "a", "new")).await.unwrap();

        assert_eq!(second.access_token, "new");
        assert_eq!(second.created_at, first.created_at);
    }

    #[tokio::test]
    async fn test_upsert_media_is_idempotent() {
        let repo = MemoryRepository::new();
        let account = repo.link_account(Account::new("u1", "ig-1", "a", "t")).await.unwrap();

        repo.upsert_media(&account.id, &[media("m1", 1), media("m2", 2)]).await.unwrap();
        repo.upsert_media(&account.id, &[media("m1", 10)]).await.unwrap();

        let stored = repo.media_for_account(&account.id).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].item.like_count, 10);
    }

    #[tokio::test]
    async fn test_upsert_for_unknown_account_fails() {
        let repo = MemoryRepository::new();
        let result = repo.upsert_media("acct-missing", &[media("m1", 1)]).await;
        assert!(matches!(result, Err(StorageError::UnknownAccount(_))));
    }

    #[tokio::test]
    async fn test_demographics_keyed_by_dimension_and_key() {
        let repo = MemoryRepository::new();
        let account = repo.link_account(Account::new("u1", "ig-1", "a", "t")).await.unwrap();
        let row = |key: &str, value| DemographicRow {
            dimension: "country".to_string(),
            key: key.to_string(),
            value,
        };

        repo.upsert_demographics(&account.id, &[row("US", 1), row("BR", 2)]).await.unwrap();
        repo.upsert_demographics(&account.id, &[row("US", 5)]).await.unwrap();

        let rows = repo.demographics_for_account(&account.id).await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].key, "US");
        assert_eq!(rows[1].value, 5);
    }
}
