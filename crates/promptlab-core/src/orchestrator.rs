//! Sequential sweep execution.
//!
//! The runner drives one generation call at a time, in combination order,
//! with a pacing delay between successive calls. Sequential execution is
//! a correctness requirement here, not a missing optimization: the
//! external service rate-limits per caller, and parallel fan-out would
//! raise the failure rate for every combination in the sweep.

use std::time::Duration;

use tracing::warn;

use crate::client::GenerationClient;
use crate::domain::{GenerationOutcome, ParameterCombination};
use crate::metrics::METRICS;
use crate::obs;

/// Pacing between successive generation calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacingPolicy {
    /// Sweeps larger than this use the larger delay.
    pub large_sweep_threshold: usize,
    pub large_delay: Duration,
    pub small_delay: Duration,
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self {
            large_sweep_threshold: 10,
            large_delay: Duration::from_millis(500),
            small_delay: Duration::from_millis(300),
        }
    }
}

impl PacingPolicy {
    /// Inter-call delay for a sweep of `total` combinations.
    pub fn delay_for(&self, total: usize) -> Duration {
        if total > self.large_sweep_threshold {
            self.large_delay
        } else {
            self.small_delay
        }
    }
}

/// One combination paired with its generation outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepStep {
    pub combination: ParameterCombination,
    pub outcome: GenerationOutcome,
}

impl SweepStep {
    /// Whether this step may enter the scored/stored set.
    ///
    /// Failures are excluded, as are replies whose finish reason is
    /// `ERROR` or whose content is a known failure phrasing that leaked
    /// into the text. Excluded steps remain in the raw outcome log.
    pub fn is_storable(&self) -> bool {
        match &self.outcome {
            GenerationOutcome::Success { reply } => {
                reply.finish_reason != "ERROR" && !is_error_signature(&reply.content)
            }
            GenerationOutcome::Failure { .. } => false,
        }
    }
}

/// Failure phrasings that identify a reply body as an error placeholder.
fn is_error_signature(content: &str) -> bool {
    if content.trim_start().starts_with("Error:") {
        return true;
    }
    let lowered = content.to_lowercase();
    lowered.contains("rate limit exceeded")
        || lowered.contains("quota exceeded")
        || lowered.contains("invalid api key")
}

/// Drives a full sweep, one combination at a time.
#[derive(Clone)]
pub struct SweepRunner {
    client: GenerationClient,
    pacing: PacingPolicy,
}

impl SweepRunner {
    pub fn new(client: GenerationClient) -> Self {
        Self::with_pacing(client, PacingPolicy::default())
    }

    pub fn with_pacing(client: GenerationClient, pacing: PacingPolicy) -> Self {
        Self { client, pacing }
    }

    /// Execute every combination strictly in order.
    ///
    /// A fatal failure on one combination is recorded as its outcome and
    /// the loop proceeds; the returned sequence always has one step per
    /// input combination, in input order. The pacing delay runs between
    /// successive calls, never after the last.
    pub async fn run(
        &self,
        prompt: &str,
        combinations: Vec<ParameterCombination>,
    ) -> Vec<SweepStep> {
        let total = combinations.len();
        let delay = self.pacing.delay_for(total);
        let mut steps = Vec::with_capacity(total);

        for (index, combination) in combinations.into_iter().enumerate() {
            METRICS.inc_generations_attempted();
            let outcome = self.client.generate(prompt, &combination).await;

            match &outcome {
                GenerationOutcome::Success { .. } => {
                    obs::emit_combination_completed(index, true);
                }
                GenerationOutcome::Failure { kind, message } => {
                    METRICS.inc_generations_failed();
                    obs::emit_combination_completed(index, false);
                    warn!(
                        index,
                        kind = ?kind,
                        %message,
                        "generation failed for combination; continuing sweep"
                    );
                }
            }

            steps.push(SweepStep {
                combination,
                outcome,
            });

            if index + 1 < total {
                tokio::time::sleep(delay).await;
            }
        }

        steps
    }
}
