//! Provider configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

/// Default REST API root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.twitter.com/1.1/";

/// Default batch window: 2 seconds.
pub const DEFAULT_BATCH_WINDOW_MS: u64 = 2_000;

/// Settings consumed by [`crate::Provider`].
///
/// Credentials are not part of this: the HTTP client handed to the provider arrives already
/// signing its requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ProviderConfig {
    /// Root URL the relative endpoint paths are joined onto
    #[cfg_attr(
        feature = "config",
        arg(long = "api-base-url", env = "TWITTER_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)
    )]
    #[serde(default = "default_api_base_url")]
    pub api_base_url: Url,

    /// How long lookups are collected before one listing fetch serves them, in milliseconds.
    /// Zero falls back to the 2000ms default
    #[cfg_attr(
        feature = "config",
        arg(long = "batch-window-ms", env = "TWITTER_BATCH_WINDOW_MS", default_value = "2000")
    )]
    #[serde(default = "default_batch_window_ms")]
    pub batch_window_ms: u64,
}

fn default_api_base_url() -> Url {
    Url::parse(DEFAULT_API_BASE_URL).expect("default API base URL is valid")
}

fn default_batch_window_ms() -> u64 {
    DEFAULT_BATCH_WINDOW_MS
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self { api_base_url: default_api_base_url(), batch_window_ms: default_batch_window_ms() }
    }
}

impl ProviderConfig {
    pub fn with_api_base_url(mut self, url: Url) -> Self {
        self.api_base_url = url;
        self
    }

    pub fn with_batch_window(mut self, window: Duration) -> Self {
        self.batch_window_ms = window.as_millis() as u64;
        self
    }

    /// The batch window, falling back to the default when configured as zero.
    pub fn batch_window(&self) -> Duration {
        if self.batch_window_ms == 0 {
            tracing::warn!(
                default_ms = DEFAULT_BATCH_WINDOW_MS,
                "batch window configured as zero, using the default"
            );
            Duration::from_millis(DEFAULT_BATCH_WINDOW_MS)
        } else {
            Duration::from_millis(self.batch_window_ms)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ProviderConfig::default();
        assert_eq!(config.api_base_url.as_str(), DEFAULT_API_BASE_URL);
        assert_eq!(config.batch_window(), Duration::from_secs(2));
    }

    #[test]
    fn deserializes_partial_config() {
        let config: ProviderConfig = serde_json::from_str(r#"{"batch_window_ms":250}"#).unwrap();
        assert_eq!(config.batch_window(), Duration::from_millis(250));
        assert_eq!(config.api_base_url.as_str(), DEFAULT_API_BASE_URL);
    }

    #[test]
    fn zero_window_falls_back_to_default() {
        let config = ProviderConfig::default().with_batch_window(Duration::ZERO);
        assert_eq!(config.batch_window(), Duration::from_millis(DEFAULT_BATCH_WINDOW_MS));

        let config: ProviderConfig = serde_json::from_str(r#"{"batch_window_ms":0}"#).unwrap();
        assert_eq!(config.batch_window_ms, 0);
        assert_eq!(config.batch_window(), Duration::from_millis(DEFAULT_BATCH_WINDOW_MS));
    }
}
