//! Graph API client over reqwest.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::{
    parse_graph_timestamp, DailyInsight, DemographicRow, InstagramClient, MediaInsights,
    MediaItem, Profile, Story, StoryInsights, UpstreamError, UpstreamResult,
};

pub const DEFAULT_GRAPH_API_BASE: &str = "https://graph.facebook.com/v21.0";

const PROFILE_FIELDS: &str = "id,username,account_type,media_count,followers_count,follows_count";
const MEDIA_FIELDS: &str =
    "id,caption,media_type,media_url,permalink,timestamp,like_count,comments_count";
const STORY_FIELDS: &str = "id,media_type,media_url,permalink,timestamp";
const MEDIA_METRICS: &str = "reach,impressions,saved,shares";
const STORY_METRICS: &str = "reach,impressions,replies";
const ACCOUNT_METRICS: &str = "impressions,reach,profile_views,follower_count";
const AUDIENCE_BREAKDOWNS: [&str; 3] = ["country", "age", "gender"];

// == Wire Shapes ==
#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct Metric {
    name: String,
    #[serde(default)]
    values: Vec<MetricValue>,
    #[serde(default)]
    total_value: Option<TotalValue>,
}

#[derive(Debug, Deserialize)]
struct MetricValue {
    #[serde(default)]
    value: serde_json::Value,
    #[serde(default)]
    end_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TotalValue {
    #[serde(default)]
    value: Option<u64>,
    #[serde(default)]
    breakdowns: Vec<Breakdown>,
}

#[derive(Debug, Deserialize)]
struct Breakdown {
    #[serde(default)]
    results: Vec<BreakdownResult>,
}

#[derive(Debug, Deserialize)]
struct BreakdownResult {
    #[serde(default)]
    dimension_values: Vec<String>,
    #[serde(default)]
    value: u64,
}

impl Metric {
    fn total(&self) -> u64 {
        self.total_value
            .as_ref()
            .and_then(|t| t.value)
            .or_else(|| self.values.first().and_then(|v| v.value.as_u64()))
            .unwrap_or(0)
    }
}

fn metric_total(metrics: &[Metric], name: &str) -> u64 {
    metrics
        .iter()
        .find(|m| m.name == name)
        .map(Metric::total)
        .unwrap_or(0)
}

// == Client ==
/// Live Instagram Graph API client.
#[derive(Debug, Clone)]
pub struct GraphApiClient {
    http: reqwest::Client,
    base_url: String,
    media_limit: u32,
}

impl GraphApiClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        media_limit: u32,
    ) -> UpstreamResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            media_limit,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        query: &[(&str, String)],
    ) -> UpstreamResult<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "Graph API request");

        let response = self
            .http
            .get(&url)
            .query(query)
            .query(&[("access_token", token)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let envelope: ErrorEnvelope = response.json().await.unwrap_or_default();
            let message = envelope
                .error
                .map(|e| e.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
            return Err(UpstreamError::api(status.as_u16(), message));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))
    }

    async fn metrics(
        &self,
        path: &str,
        token: &str,
        query: &[(&str, String)],
    ) -> UpstreamResult<Vec<Metric>> {
        let page: Page<Metric> = self.get_json(path, token, query).await?;
        Ok(page.data)
    }
}

#[async_trait]
impl InstagramClient for GraphApiClient {
    async fn fetch_profile(&self, token: &str) -> UpstreamResult<Profile> {
        self.get_json("me", token, &[("fields", PROFILE_FIELDS.to_string())])
            .await
    }

    async fn fetch_media(&self, token: &str) -> UpstreamResult<Vec<MediaItem>> {
        let page: Page<MediaItem> = self
            .get_json(
                "me/media",
                token,
                &[
                    ("fields", MEDIA_FIELDS.to_string()),
                    ("limit", self.media_limit.to_string()),
                ],
            )
            .await?;
        Ok(page.data)
    }

    async fn fetch_media_insights(
        &self,
        token: &str,
        media_id: &str,
    ) -> UpstreamResult<MediaInsights> {
        let metrics = self
            .metrics(
                &format!("{}/insights", media_id),
                token,
                &[("metric", MEDIA_METRICS.to_string())],
            )
            .await?;
        Ok(MediaInsights {
            reach: metric_total(&metrics, "reach"),
            impressions: metric_total(&metrics, "impressions"),
            saved: metric_total(&metrics, "saved"),
            shares: metric_total(&metrics, "shares"),
        })
    }

    async fn fetch_stories(&self, token: &str) -> UpstreamResult<Vec<Story>> {
        let page: Page<Story> = self
            .get_json("me/stories", token, &[("fields", STORY_FIELDS.to_string())])
            .await?;
        Ok(page.data)
    }

    async fn fetch_story_insights(
        &self,
        token: &str,
        story_id: &str,
    ) -> UpstreamResult<StoryInsights> {
        let metrics = self
            .metrics(
                &format!("{}/insights", story_id),
                token,
                &[("metric", STORY_METRICS.to_string())],
            )
            .await?;
        Ok(StoryInsights {
            reach: metric_total(&metrics, "reach"),
            impressions: metric_total(&metrics, "impressions"),
            replies: metric_total(&metrics, "replies"),
        })
    }

    async fn fetch_audience(&self, token: &str) -> UpstreamResult<Vec<DemographicRow>> {
        let mut rows = Vec::new();
        for dimension in AUDIENCE_BREAKDOWNS {
            let metrics = self
                .metrics(
                    "me/insights",
                    token,
                    &[
                        ("metric", "follower_demographics".to_string()),
                        ("period", "lifetime".to_string()),
                        ("metric_type", "total_value".to_string()),
                        ("breakdown", dimension.to_string()),
                    ],
                )
                .await?;
            rows.extend(
                metrics
                    .iter()
                    .filter_map(|m| m.total_value.as_ref())
                    .flat_map(|t| t.breakdowns.iter())
                    .flat_map(|b| b.results.iter())
                    .filter_map(|r| {
                        r.dimension_values.first().map(|key| DemographicRow {
                            dimension: dimension.to_string(),
                            key: key.clone(),
                            value: r.value,
                        })
                    }),
            );
        }
        Ok(rows)
    }

    async fn fetch_account_insights(
        &self,
        token: &str,
        days: u32,
    ) -> UpstreamResult<Vec<DailyInsight>> {
        let until = Utc::now();
        let since = until - chrono::Duration::days(i64::from(days));
        let metrics = self
            .metrics(
                "me/insights",
                token,
                &[
                    ("metric", ACCOUNT_METRICS.to_string()),
                    ("period", "day".to_string()),
                    ("since", since.timestamp().to_string()),
                    ("until", until.timestamp().to_string()),
                ],
            )
            .await?;
        Ok(merge_daily(&metrics))
    }
}

/// Pivots per-metric day series into one row per day.
fn merge_daily(metrics: &[Metric]) -> Vec<DailyInsight> {
    let mut days: BTreeMap<NaiveDate, DailyInsight> = BTreeMap::new();
    for metric in metrics {
        for point in &metric.values {
            let Some(date) = point
                .end_time
                .as_deref()
                .and_then(parse_graph_timestamp)
                .map(|dt| dt.date_naive())
            else {
                continue;
            };
            let value = point.value.as_u64().unwrap_or(0);
            let row = days.entry(date).or_insert_with(|| DailyInsight {
                date,
                impressions: 0,
                reach: 0,
                profile_views: 0,
                follower_count: 0,
            });
            match metric.name.as_str() {
                "impressions" => row.impressions = value,
                "reach" => row.reach = value,
                "profile_views" => row.profile_views = value,
                "follower_count" => row.follower_count = value,
                _ => {}
            }
        }
    }
    days.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_total_prefers_total_value() {
        let json = r#"{"data":[
            {"name":"reach","values":[{"value":120}]},
            {"name":"saved","total_value":{"value":7}}
        ]}"#;
        let page: Page<Metric> = serde_json::from_str(json).unwrap();
        assert_eq!(metric_total(&page.data, "reach"), 120);
        assert_eq!(metric_total(&page.data, "saved"), 7);
        assert_eq!(metric_total(&page.data, "shares"), 0);
    }

    #[test]
    fn test_merge_daily_pivots_by_date() {
        let json = r#"{"data":[
            {"name":"reach","values":[
                {"value":700,"end_time":"2025-01-01T08:00:00+0000"},
                {"value":710,"end_time":"2025-01-02T08:00:00+0000"}
            ]},
            {"name":"impressions","values":[
                {"value":1000,"end_time":"2025-01-01T08:00:00+0000"}
            ]}
        ]}"#;
        let page: Page<Metric> = serde_json::from_str(json).unwrap();
        let rows = merge_daily(&page.data);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(rows[0].reach, 700);
        assert_eq!(rows[0].impressions, 1000);
        assert_eq!(rows[1].impressions, 0);
    }

    #[test]
    fn test_error_envelope_decodes() {
        let json = r#"{"error":{"message":"Invalid OAuth access token","code":190}}"#;
        let envelope: ErrorEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.error.unwrap().message, "Invalid OAuth access token");
    }

    #[test]
    fn test_client_trims_base_url() {
        let client =
            GraphApiClient::new("https://graph.example.test/v21.0/", Duration::from_secs(1), 25)
                .unwrap();
        assert_eq!(client.base_url, "https://graph.example.test/v21.0");
    }
}
