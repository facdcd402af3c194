//! Generation client: backend trait, failure classification, and bounded
//! retry for transient overload.
//!
//! The backend surfaces failures as human-readable messages only; the
//! client pattern-matches message substrings to classify them. Classified
//! failures become [`GenerationOutcome::Failure`] values, never errors,
//! so callers cannot accidentally abort a sweep on one bad combination.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{FailureKind, GenerationOutcome, GenerationReply, ParameterCombination};
use crate::metrics::METRICS;
use crate::obs;

/// Error surfaced by a generation backend.
///
/// Carries only the provider's human-readable message; no structured
/// error code is assumed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Trait for generation service backends.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Issue exactly one generation request for one prompt and one
    /// concrete parameter combination.
    async fn generate(
        &self,
        prompt: &str,
        params: &ParameterCombination,
    ) -> std::result::Result<GenerationReply, BackendError>;
}

/// Classification of one failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Worth retrying after a backoff delay.
    Transient,
    /// Retrying will not help.
    Fatal(FailureKind),
}

/// Classify a backend failure from its message.
///
/// Precedence is fixed: transient overload first, then rate limit, quota,
/// credentials, and finally unknown. A message matching several rules
/// gets the earliest class.
pub fn classify_failure(message: &str) -> FailureClass {
    let msg = message.to_lowercase();

    if msg.contains("503")
        || msg.contains("service unavailable")
        || msg.contains("try again later")
        || msg.contains("overloaded")
    {
        return FailureClass::Transient;
    }
    if msg.contains("429") || msg.contains("rate limit") {
        return FailureClass::Fatal(FailureKind::RateLimited);
    }
    if msg.contains("quota") || msg.contains("resource_exhausted") || msg.contains("resource exhausted")
    {
        return FailureClass::Fatal(FailureKind::QuotaExceeded);
    }
    if msg.contains("api key") || msg.contains("401") || msg.contains("unauthorized") {
        return FailureClass::Fatal(FailureKind::Unauthorized);
    }

    FailureClass::Fatal(FailureKind::Unknown)
}

/// Bounded exponential backoff for transient overload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt + 1`: `base * 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.pow(attempt)
    }
}

/// Drives a backend with classification and retry.
#[derive(Clone)]
pub struct GenerationClient {
    backend: Arc<dyn GenerationBackend>,
    policy: RetryPolicy,
}

impl GenerationClient {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self::with_policy(backend, RetryPolicy::default())
    }

    pub fn with_policy(backend: Arc<dyn GenerationBackend>, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    /// Generate once, retrying transient overload with backoff.
    ///
    /// Retries are synchronous: the caller suspends through every backoff
    /// delay. After `max_retries` transient failures the outcome is
    /// `Failure { kind: Overloaded }`; fatal classifications return
    /// immediately with their kind.
    pub async fn generate(
        &self,
        prompt: &str,
        params: &ParameterCombination,
    ) -> GenerationOutcome {
        let mut attempt = 0u32;

        loop {
            match self.backend.generate(prompt, params).await {
                Ok(reply) => return GenerationOutcome::Success { reply },
                Err(err) => match classify_failure(&err.message) {
                    FailureClass::Transient if attempt < self.policy.max_retries => {
                        let delay = self.policy.delay_for(attempt);
                        obs::emit_generation_retry(
                            attempt + 1,
                            self.policy.max_retries,
                            delay.as_millis() as u64,
                        );
                        METRICS.inc_retries_performed();
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    FailureClass::Transient => {
                        obs::emit_generation_failed(FailureKind::Overloaded, &err.message);
                        return GenerationOutcome::Failure {
                            kind: FailureKind::Overloaded,
                            message: err.message,
                        };
                    }
                    FailureClass::Fatal(kind) => {
                        obs::emit_generation_failed(kind, &err.message);
                        return GenerationOutcome::Failure {
                            kind,
                            message: err.message,
                        };
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_transient_overload() {
        assert_eq!(classify_failure("503 Service Unavailable"), FailureClass::Transient);
        assert_eq!(
            classify_failure("The model is overloaded, try again later"),
            FailureClass::Transient
        );
    }

    #[test]
    fn test_classify_fatal_kinds() {
        assert_eq!(
            classify_failure("429 Too Many Requests: rate limit"),
            FailureClass::Fatal(FailureKind::RateLimited)
        );
        assert_eq!(
            classify_failure("RESOURCE_EXHAUSTED: quota exceeded for project"),
            FailureClass::Fatal(FailureKind::QuotaExceeded)
        );
        assert_eq!(
            classify_failure("401 API key not valid"),
            FailureClass::Fatal(FailureKind::Unauthorized)
        );
        assert_eq!(
            classify_failure("connection reset by peer"),
            FailureClass::Fatal(FailureKind::Unknown)
        );
    }

    #[test]
    fn test_classification_precedence() {
        // Transient wins over rate limit when both phrasings appear.
        assert_eq!(
            classify_failure("503 service unavailable due to rate limit"),
            FailureClass::Transient
        );
        // Rate limit wins over quota.
        assert_eq!(
            classify_failure("rate limit hit, quota nearly exhausted"),
            FailureClass::Fatal(FailureKind::RateLimited)
        );
    }

    #[test]
    fn test_retry_policy_delays_double() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(1), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(4000));
    }
}
