use std::env;
use std::time::Duration;

use super::{DEFAULT_MAX_ATTEMPTS, RetryPolicy};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4.1-nano";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Provider and retry settings, read from `PANTRY_AI_*` variables.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: None,
            model: DEFAULT_MODEL.into(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        }
    }
}

impl GenerationConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("PANTRY_AI_BASE_URL").unwrap_or(defaults.base_url),
            api_key: env::var("PANTRY_AI_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            model: env::var("PANTRY_AI_MODEL").unwrap_or(defaults.model),
            request_timeout: Duration::from_secs(parse_or(
                "PANTRY_AI_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )),
            retry: RetryPolicy {
                max_attempts: parse_or("PANTRY_AI_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS),
                ..defaults.retry
            },
        }
    }

    /// Generation is only attempted when an API key is present.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
