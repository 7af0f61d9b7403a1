//! Harness configuration
//!
//! The base URL and request timeout are explicit settings rather than
//! whatever the HTTP client would default to. CLI flags take precedence
//! over the `BANKCHECK_*` environment variables.

use std::time::Duration;

/// Configuration for the HTTP adapter and runner
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Base URL of the API under test
    pub base_url: String,

    /// Timeout applied to every request
    pub request_timeout: Duration,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl HarnessConfig {
    /// Build a config from defaults plus environment overrides
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("BANKCHECK_API_URL") {
            config.base_url = url;
        }
        if let Ok(secs) = std::env::var("BANKCHECK_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                config.request_timeout = Duration::from_secs(secs);
            }
        }

        config
    }
}
