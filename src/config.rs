// =============================================================================
// Application Configuration
// =============================================================================
//
// Loaded once at startup from an optional JSON file, with env-var overrides
// applied in main. Every field carries `#[serde(default)]` so a partial (or
// absent) config file never breaks startup. The retry parameters live here
// rather than as constants so deployments can tune them.
// =============================================================================

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::market::RetryPolicy;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_tickers_path() -> String {
    "datasets/tickers.csv".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_secs() -> u64 {
    5
}

fn default_reddit_post_limit() -> u32 {
    25
}

// =============================================================================
// AppConfig
// =============================================================================

/// Startup configuration for the StockPulse backend.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Address the API server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Path to the ticker symbol table (CSV with Symbol/Name columns).
    #[serde(default = "default_tickers_path")]
    pub tickers_path: String,

    /// Maximum fetch attempts per market-data request.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Constant delay between fetch attempts, in seconds.
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,

    /// How many posts the sentiment search requests.
    #[serde(default = "default_reddit_post_limit")]
    pub reddit_post_limit: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            tickers_path: default_tickers_path(),
            max_retries: default_max_retries(),
            retry_delay_secs: default_retry_delay_secs(),
            reddit_post_limit: default_reddit_post_limit(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            max_retries = config.max_retries,
            "config loaded"
        );

        Ok(config)
    }

    /// The retry parameters as a [`RetryPolicy`] for the market client.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            retry_delay: Duration::from_secs(self.retry_delay_secs),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.bind_addr, "0.0.0.0:3001");
        assert_eq!(cfg.tickers_path, "datasets/tickers.csv");
        assert_eq!(cfg.max_retries, 3);
        assert_eq!(cfg.retry_delay_secs, 5);
        assert_eq!(cfg.reddit_post_limit, 25);
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.max_retries, 3);
        assert_eq!(cfg.retry_delay_secs, 5);
        assert_eq!(cfg.bind_addr, "0.0.0.0:3001");
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "max_retries": 5, "bind_addr": "127.0.0.1:8080" }"#;
        let cfg: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.max_retries, 5);
        assert_eq!(cfg.bind_addr, "127.0.0.1:8080");
        assert_eq!(cfg.retry_delay_secs, 5);
    }

    #[test]
    fn retry_policy_reflects_config() {
        let json = r#"{ "max_retries": 2, "retry_delay_secs": 1 }"#;
        let cfg: AppConfig = serde_json::from_str(json).unwrap();
        let policy = cfg.retry_policy();
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.retry_delay, Duration::from_secs(1));
    }

    #[test]
    fn load_missing_file_is_an_error() {
        assert!(AppConfig::load("does/not/exist.json").is_err());
    }
}
