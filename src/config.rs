//! Configuration Module
//!
//! Handles loading and managing server configuration from environment
//! variables. Missing or unparsable values fall back to defaults.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::instagram::DEFAULT_GRAPH_API_BASE;

/// Server configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// TTL in seconds for cached aggregates
    pub default_ttl: u64,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
    /// Serve the fixed mock dataset instead of calling Instagram
    pub mock_mode: bool,
    pub graph_api_base: String,
    /// Per-step timeout for upstream calls, in seconds
    pub upstream_timeout: u64,
    /// Max in-flight per-item insights calls during fan-out
    pub insights_concurrency: usize,
    /// Page size for the media list
    pub media_limit: u32,
    /// Owner linked at startup
    pub seed_owner_id: String,
    /// Access token for the seeded account in live mode
    pub ig_access_token: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_image_model: String,
}

fn var_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 4000)
    /// - `CACHE_TTL_SECS` - Cached aggregate TTL (default: 1200)
    /// - `CACHE_SWEEP_INTERVAL_SECS` - Sweep frequency (default: 300)
    /// - `MOCK_MODE` - Use the mock Instagram client (default: true)
    /// - `GRAPH_API_BASE` - Graph API root URL
    /// - `UPSTREAM_TIMEOUT_SECS` - Per-call upstream timeout (default: 15)
    /// - `INSIGHTS_CONCURRENCY` - Fan-out width (default: 4)
    /// - `MEDIA_LIMIT` - Media page size (default: 50)
    /// - `SEED_OWNER_ID` - Owner linked at startup (default: demo-user)
    /// - `IG_ACCESS_TOKEN` - Token for the seeded account in live mode
    /// - `OPENAI_API_KEY` / `OPENAI_IMAGE_MODEL` - Poster image generation
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: var_or("PORT", defaults.server_port),
            default_ttl: var_or("CACHE_TTL_SECS", defaults.default_ttl),
            sweep_interval: var_or("CACHE_SWEEP_INTERVAL_SECS", defaults.sweep_interval),
            mock_mode: var_or("MOCK_MODE", defaults.mock_mode),
            graph_api_base: optional_var("GRAPH_API_BASE").unwrap_or(defaults.graph_api_base),
            upstream_timeout: var_or("UPSTREAM_TIMEOUT_SECS", defaults.upstream_timeout),
            insights_concurrency: var_or("INSIGHTS_CONCURRENCY", defaults.insights_concurrency)
                .max(1),
            media_limit: var_or("MEDIA_LIMIT", defaults.media_limit),
            seed_owner_id: optional_var("SEED_OWNER_ID").unwrap_or(defaults.seed_owner_id),
            ig_access_token: optional_var("IG_ACCESS_TOKEN"),
            openai_api_key: optional_var("OPENAI_API_KEY"),
            openai_image_model: optional_var("OPENAI_IMAGE_MODEL")
                .unwrap_or(defaults.openai_image_model),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval.max(1))
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 4000,
            default_ttl: 20 * 60,
            sweep_interval: 5 * 60,
            mock_mode: true,
            graph_api_base: DEFAULT_GRAPH_API_BASE.to_string(),
            upstream_timeout: 15,
            insights_concurrency: 4,
            media_limit: 50,
            seed_owner_id: "demo-user".to_string(),
            ig_access_token: None,
            openai_api_key: None,
            openai_image_model: "dall-e-3".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 4000);
        assert_eq!(config.cache_ttl(), Duration::from_secs(1200));
        assert_eq!(config.sweep_interval(), Duration::from_secs(300));
        assert!(config.mock_mode);
        assert_eq!(config.insights_concurrency, 4);
    }

    #[test]
    fn test_config_from_env() {
        // Single test touches the environment to avoid racing other tests
        for name in [
            "PORT",
            "CACHE_TTL_SECS",
            "CACHE_SWEEP_INTERVAL_SECS",
            "MOCK_MODE",
            "INSIGHTS_CONCURRENCY",
            "OPENAI_API_KEY",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.server_port, 4000);
        assert_eq!(config.default_ttl, 1200);
        assert!(config.mock_mode);
        assert!(config.openai_api_key.is_none());

        env::set_var("CACHE_TTL_SECS", "60");
        env::set_var("MOCK_MODE", "false");
        env::set_var("INSIGHTS_CONCURRENCY", "0");
        env::set_var("PORT", "not-a-port");

        let config = Config::from_env();
        assert_eq!(config.default_ttl, 60);
        assert!(!config.mock_mode);
        assert_eq!(config.insights_concurrency, 1);
        assert_eq!(config.server_port, 4000);

        for name in ["CACHE_TTL_SECS", "MOCK_MODE", "INSIGHTS_CONCURRENCY", "PORT"] {
            env::remove_var(name);
        }
    }
}
