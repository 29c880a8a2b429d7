//! Yearly recap: summary computation, poster generation and report storage.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Utc};
use serde_json::Value;
use tracing::{info, warn};

use super::{cache_through, require_owner};
use crate::cache::{CacheKey, SharedCache};
use crate::error::{AppError, Result};
use crate::imaging::{ImageGenerator, PlaceholderImages};
use crate::instagram::{DailyInsight, MediaWithInsights};
use crate::models::{validate_year, GenerateWrappedRequest, TopPost, WrappedSummary};
use crate::storage::{Repository, Slide, WrappedReport};

pub struct WrappedService {
    cache: SharedCache,
    repo: Arc<dyn Repository>,
    images: Arc<dyn ImageGenerator>,
    ttl: Duration,
}

impl WrappedService {
    pub fn new(
        cache: SharedCache,
        repo: Arc<dyn Repository>,
        images: Arc<dyn ImageGenerator>,
        ttl: Duration,
    ) -> Self {
        Self {
            cache,
            repo,
            images,
            ttl,
        }
    }

    /// Year summary computed from stored media and daily insights, cached
    /// under `wrapped:<owner>:<year>`.
    pub async fn summary(&self, owner_id: &str, year: i32) -> Result<Value> {
        require_owner(owner_id)?;
        if let Some(message) = validate_year(year) {
            return Err(AppError::Validation(message));
        }

        let key = CacheKey::wrapped(owner_id, year);
        cache_through(&self.cache, key, self.ttl, || self.build_summary(owner_id, year)).await
    }

    /// Builds and stores the report for `request.year` from a freshly
    /// computed summary. Image generation failures fall back to placeholder
    /// artwork.
    pub async fn generate(
        &self,
        owner_id: &str,
        request: &GenerateWrappedRequest,
    ) -> Result<WrappedReport> {
        require_owner(owner_id)?;
        if let Some(message) = request.validate() {
            return Err(AppError::Validation(message));
        }
        let year = request.year;

        let summary = self.build_summary(owner_id, year).await?;

        let prompt = format!(
            "Instagram wrapped poster for @{} in {}, neon gradients, confetti, social media analytics vibe",
            summary.username, year
        );
        let image_ref = match self.images.generate(&prompt).await {
            Ok(image_ref) => image_ref,
            Err(err) => {
                warn!(owner_id, year, error = %err, "Image generation failed, using placeholder");
                PlaceholderImages::url_for(&prompt)
            }
        };

        let now = Utc::now();
        let report = WrappedReport {
            owner_id: owner_id.to_string(),
            year,
            title: format!("{}'s {} Wrapped", summary.username, year),
            summary: format!(
                "Total likes {}, comments {}, avg reach {}",
                summary.total_likes, summary.total_comments, summary.avg_reach
            ),
            slides: summary.slides,
            image_ref,
            created_at: now,
            updated_at: now,
        };

        let report = self.repo.upsert_report(report).await?;
        info!(owner_id, year, "Generated wrapped report");
        Ok(report)
    }

    pub async fn report(&self, owner_id: &str, year: i32) -> Result<WrappedReport> {
        require_owner(owner_id)?;
        if let Some(message) = validate_year(year) {
            return Err(AppError::Validation(message));
        }

        self.repo
            .report_for(owner_id, year)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no wrapped report for {}", year)))
    }

    async fn build_summary(&self, owner_id: &str, year: i32) -> Result<WrappedSummary> {
        let account = self
            .repo
            .account_for_owner(owner_id)
            .await?
            .ok_or_else(|| AppError::NotLinked(owner_id.to_string()))?;

        let media: Vec<MediaWithInsights> = self
            .repo
            .media_for_account(&account.id)
            .await?
            .into_iter()
            .filter(|m| m.item.published_at().map(|at| at.year()) == Some(year))
            .collect();
        let insights: Vec<DailyInsight> = self
            .repo
            .daily_insights_for_account(&account.id)
            .await?
            .into_iter()
            .filter(|row| row.date.year() == year)
            .collect();

        Ok(summarize(&account.username, year, &media, &insights))
    }
}

/// Computes the recap for one year's media and daily insights.
///
/// The top post is the first item with the highest like count.
pub fn summarize(
    username: &str,
    year: i32,
    media: &[MediaWithInsights],
    insights: &[DailyInsight],
) -> WrappedSummary {
    let total_likes: u64 = media.iter().map(|m| m.item.like_count).sum();
    let total_comments: u64 = media.iter().map(|m| m.item.comments_count).sum();

    let avg_reach = if insights.is_empty() {
        0
    } else {
        let total: u64 = insights.iter().map(|row| row.reach).sum();
        (total as f64 / insights.len() as f64).round() as u64
    };

    let top = media.iter().fold(None::<&MediaWithInsights>, |best, m| match best {
        Some(b) if b.item.like_count >= m.item.like_count => Some(b),
        _ => Some(m),
    });
    let top_post = top.map(|m| TopPost {
        id: m.item.id.clone(),
        caption: m.item.caption.clone(),
        like_count: m.item.like_count,
        permalink: m.item.permalink.clone(),
    });

    let top_text = match &top_post {
        Some(post) => format!(
            "{} ({} likes)",
            post.caption.as_deref().filter(|c| !c.is_empty()).unwrap_or("Untitled"),
            post.like_count
        ),
        None => "No posts found.".to_string(),
    };

    let slides = vec![
        Slide {
            title: format!("{} Wrapped", year),
            text: format!("@{}, you posted {} pieces of content.", username, media.len()),
        },
        Slide {
            title: "Engagement".to_string(),
            text: format!(
                "You got {} likes and {} comments in total.",
                total_likes, total_comments
            ),
        },
        Slide {
            title: "Reach".to_string(),
            text: format!("Average daily reach: {}. Keep creating!", avg_reach),
        },
        Slide {
            title: "Top Post".to_string(),
            text: top_text,
        },
    ];

    WrappedSummary {
        year,
        username: username.to_string(),
        post_count: media.len(),
        total_likes,
        total_comments,
        avg_reach,
        top_post,
        slides,
    }
}
