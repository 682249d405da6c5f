//! Configuration for the retrieval and generation services the chatbot calls.

use serde::Deserialize;
use std::time::Duration;

/// Upstream service configuration loaded from environment variables.
///
/// Environment variables are prefixed with `MEDIBUDDY_UPSTREAM_`:
/// - `MEDIBUDDY_UPSTREAM_RETRIEVAL_URL`: Snippet retrieval endpoint
/// - `MEDIBUDDY_UPSTREAM_GENERATION_URL`: Answer generation endpoint
/// - `MEDIBUDDY_UPSTREAM_REQUEST_TIMEOUT_SECS`: Deadline per attempt (default: 30)
/// - `MEDIBUDDY_UPSTREAM_MAX_RETRIES`: Retries after the first attempt (default: 2)
/// - `MEDIBUDDY_UPSTREAM_INITIAL_BACKOFF_MS`: First retry delay (default: 250)
/// - `MEDIBUDDY_UPSTREAM_MAX_BACKOFF_MS`: Retry delay cap (default: 4000)
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Retrieval service URL
    #[serde(default = "default_retrieval_url")]
    pub retrieval_url: String,

    /// Generation service URL
    #[serde(default = "default_generation_url")]
    pub generation_url: String,

    /// Per-attempt deadline in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Backoff cap in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

fn default_retrieval_url() -> String {
    "http://localhost:5000/query".to_string()
}

fn default_generation_url() -> String {
    "http://localhost:5001/generate".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    2
}

fn default_initial_backoff_ms() -> u64 {
    250
}

fn default_max_backoff_ms() -> u64 {
    4000
}

impl UpstreamConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `MEDIBUDDY_UPSTREAM_`.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("MEDIBUDDY_UPSTREAM_").from_env::<UpstreamConfig>()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            retrieval_url: default_retrieval_url(),
            generation_url: default_generation_url(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = UpstreamConfig::default();
        assert_eq!(config.retrieval_url, "http://localhost:5000/query");
        assert_eq!(config.generation_url, "http://localhost:5001/generate");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn test_backoff_durations() {
        let config = UpstreamConfig::default();
        assert_eq!(config.initial_backoff(), Duration::from_millis(250));
        assert_eq!(config.max_backoff(), Duration::from_millis(4000));
    }
}
