//! Text-generation client with minute-aligned retry.
//!
//! The provider enforces per-minute rate limits, so a failed attempt waits
//! for the next wall-clock minute (plus jitter) instead of backing off by
//! attempt count. Every typed helper in [`tasks`] turns exhausted retries or
//! unparseable output into an empty/fallback value.

pub mod backoff;
pub mod config;
pub mod openai;
pub mod parse;
pub mod prompts;
pub mod tasks;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, error, info, warn};

pub use config::GenerationConfig;
pub use openai::OpenAiProvider;

/// Default attempt cap for one logical generation request.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Failure reported by a single provider call. Opaque to the retry loop.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("rate limited by provider")]
    RateLimited,
    #[error("provider request failed: {0}")]
    Request(String),
    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("provider returned an empty completion")]
    Empty,
    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("generation failed after {attempts} attempt(s): {last_error}")]
    Exhausted {
        attempts: u32,
        last_error: ProviderError,
    },
    #[error("generation timed out after {0:?}")]
    TimedOut(Duration),
    #[error("malformed generation output: {0}")]
    Malformed(String),
}

/// A text-generation backend: one prompt in, one completion out.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Jitter is drawn uniformly from `[jitter_min, jitter_max)`.
    pub jitter_min: Duration,
    pub jitter_max: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            jitter_min: Duration::from_secs(1),
            jitter_max: Duration::from_secs(11),
        }
    }
}

/// Shared handle; cheap to clone.
#[derive(Clone)]
pub struct GenerationClient {
    provider: Arc<dyn CompletionProvider>,
    policy: RetryPolicy,
}

impl GenerationClient {
    pub fn new(provider: Arc<dyn CompletionProvider>, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.generate_with_attempts(prompt, self.policy.max_attempts)
            .await
    }

    /// Call the provider up to `max_attempts` times (at least once).
    ///
    /// Between failed attempts the task sleeps until the next minute boundary
    /// plus jitter. No sleep follows the final attempt. Dropping the returned
    /// future abandons the loop; nothing is persisted before a result exists.
    pub async fn generate_with_attempts(
        &self,
        prompt: &str,
        max_attempts: u32,
    ) -> Result<String, GenerationError> {
        let max_attempts = max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.provider.complete(prompt).await {
                Ok(text) => {
                    debug!(
                        provider = self.provider.name(),
                        attempt, "Generation succeeded ({} chars)", text.len()
                    );
                    return Ok(text);
                }
                Err(e) => {
                    warn!(
                        provider = self.provider.name(),
                        "Generation attempt {}/{} failed: {}", attempt, max_attempts, e
                    );
                    if attempt >= max_attempts {
                        error!("Generation failed after {} attempts, giving up", attempt);
                        return Err(GenerationError::Exhausted {
                            attempts: attempt,
                            last_error: e,
                        });
                    }

                    let delay = backoff::retry_delay(Utc::now(), &self.policy, &mut rand::rng());
                    info!("Retrying generation in {:.1}s", delay.as_secs_f64());
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Like [`generate`](Self::generate) but abandons the whole retry loop
    /// once `deadline` elapses.
    pub async fn generate_within(
        &self,
        prompt: &str,
        deadline: Duration,
    ) -> Result<String, GenerationError> {
        tokio::time::timeout(deadline, self.generate(prompt))
            .await
            .map_err(|_| GenerationError::TimedOut(deadline))?
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{ScriptedProvider, client_for};
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn retries_until_provider_recovers() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(ProviderError::RateLimited),
            Err(ProviderError::Request("connection reset".into())),
            Ok("third time lucky".into()),
        ]));
        let client = client_for(provider.clone());

        let start = tokio::time::Instant::now();
        let text = client.generate_with_attempts("prompt", 3).await.unwrap();
        let waited = start.elapsed();

        assert_eq!(text, "third time lucky");
        assert_eq!(provider.calls(), 3);
        // Two backoff sleeps, each at least the minimum jitter and at most a
        // full minute plus the maximum jitter.
        assert!(waited >= Duration::from_secs(2), "waited {:?}", waited);
        assert!(waited <= Duration::from_secs(2 * 71), "waited {:?}", waited);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_return_failure_value() {
        let provider = Arc::new(ScriptedProvider::always(Err(ProviderError::RateLimited)));
        let client = client_for(provider.clone());

        let err = client.generate("prompt").await.unwrap_err();

        assert_eq!(
            err,
            GenerationError::Exhausted {
                attempts: 3,
                last_error: ProviderError::RateLimited,
            }
        );
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn first_success_does_not_sleep() {
        let provider = Arc::new(ScriptedProvider::ok("hello"));
        let client = client_for(provider.clone());

        let start = tokio::time::Instant::now();
        assert_eq!(client.generate("prompt").await.unwrap(), "hello");
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_still_tries_once() {
        let provider = Arc::new(ScriptedProvider::always(Err(ProviderError::Empty)));
        let client = client_for(provider.clone());

        let err = client.generate_with_attempts("prompt", 0).await.unwrap_err();

        assert!(matches!(err, GenerationError::Exhausted { attempts: 1, .. }));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_abandons_retry_loop() {
        let provider = Arc::new(ScriptedProvider::always(Err(ProviderError::RateLimited)));
        let client = client_for(provider.clone());

        // The first backoff is at least one second, so the deadline hits mid-sleep.
        let deadline = Duration::from_millis(500);
        let err = client.generate_within("prompt", deadline).await.unwrap_err();

        assert_eq!(err, GenerationError::TimedOut(deadline));
        assert_eq!(provider.calls(), 1);
    }
}
