//! Experiment service: the composition root that ties sweep expansion,
//! generation, scoring, and persistence together.
//!
//! The service is what a caller (CLI, daemon) drives. It owns no state
//! beyond its injected collaborators, and every sweep reports attempted
//! vs. generated counts so partial failure is always visible even though
//! individual combination failures are swallowed into the outcome log.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{warn, Instrument};
use uuid::Uuid;

use crate::client::GenerationClient;
use crate::domain::{
    validate_prompt, ExperimentRecord, GenerationOutcome, NewResponse, ParameterCombination,
    ParameterRanges, ResponseRecord, Result,
};
use crate::metrics::METRICS;
use crate::obs;
use crate::orchestrator::{PacingPolicy, SweepRunner, SweepStep};
use crate::store::{ExperimentPage, ExperimentStore, ResponseSort, SortOrder};
use crate::sweep::expand_combinations;

/// Summary of one stored response in a sweep report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResponseSummary {
    pub response_id: Uuid,
    pub parameters: ParameterCombination,
    pub content: String,
    pub overall_score: f64,
}

/// Result of a complete sweep execution.
///
/// `total_combinations` counts every attempted combination;
/// `generated_count` counts the responses that were generated, scored,
/// and stored. The gap between the two is the caller's partial-failure
/// signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub experiment_id: Uuid,
    pub total_combinations: usize,
    pub generated_count: usize,
    /// Stored responses in generation order.
    pub responses: Vec<StoredResponseSummary>,
}

/// Drives experiments end to end against injected collaborators.
pub struct ExperimentService {
    store: Arc<dyn ExperimentStore>,
    runner: SweepRunner,
}

impl ExperimentService {
    pub fn new(store: Arc<dyn ExperimentStore>, client: GenerationClient) -> Self {
        Self::with_pacing(store, client, PacingPolicy::default())
    }

    pub fn with_pacing(
        store: Arc<dyn ExperimentStore>,
        client: GenerationClient,
        pacing: PacingPolicy,
    ) -> Self {
        Self {
            store,
            runner: SweepRunner::with_pacing(client, pacing),
        }
    }

    /// Create an experiment after validating its prompt.
    pub async fn create_experiment(&self, prompt: &str) -> Result<ExperimentRecord> {
        validate_prompt(prompt)?;
        Ok(self.store.create_experiment(prompt).await?)
    }

    /// Load one experiment.
    pub async fn get_experiment(&self, id: Uuid) -> Result<ExperimentRecord> {
        Ok(self.store.get_experiment(id).await?)
    }

    /// List experiments, newest-updated first.
    pub async fn list_experiments(&self, limit: usize, offset: usize) -> Result<ExperimentPage> {
        Ok(self.store.list_experiments(limit, offset).await?)
    }

    /// List an experiment's stored responses.
    pub async fn list_responses(
        &self,
        experiment_id: Uuid,
        sort: ResponseSort,
        order: SortOrder,
    ) -> Result<Vec<ResponseRecord>> {
        Ok(self.store.list_responses(experiment_id, sort, order).await?)
    }

    /// Run a full parameter sweep for an experiment.
    ///
    /// Validation failures reject the sweep before any generation call.
    /// After that nothing aborts it: failed combinations are recorded and
    /// skipped, error-signature replies are excluded from storage, and a
    /// store failure on one response only drops that response.
    pub async fn run_sweep(
        &self,
        experiment_id: Uuid,
        ranges: &ParameterRanges,
    ) -> Result<SweepReport> {
        let experiment = self.store.get_experiment(experiment_id).await?;
        let combinations = expand_combinations(ranges)?;
        let total_combinations = combinations.len();

        async {
            obs::emit_sweep_started(experiment_id, total_combinations);
            let started = Instant::now();

            let steps = self.runner.run(&experiment.prompt, combinations).await;

            let mut responses = Vec::new();
            for step in steps {
                if let Some(summary) = self.store_step(&experiment, step).await {
                    responses.push(summary);
                }
            }

            obs::emit_sweep_finished(
                experiment_id,
                total_combinations,
                responses.len(),
                started.elapsed().as_millis() as u64,
            );
            METRICS.flush();

            Ok(SweepReport {
                experiment_id,
                total_combinations,
                generated_count: responses.len(),
                responses,
            })
        }
        .instrument(obs::sweep_span(experiment_id))
        .await
    }

    /// Score and persist one storable step; returns `None` when the step
    /// is excluded or storage fails.
    async fn store_step(
        &self,
        experiment: &ExperimentRecord,
        step: SweepStep,
    ) -> Option<StoredResponseSummary> {
        let storable = step.is_storable();
        let SweepStep {
            combination,
            outcome,
        } = step;

        let reply = match outcome {
            GenerationOutcome::Success { reply } if storable => reply,
            GenerationOutcome::Success { reply } => {
                warn!(
                    finish_reason = %reply.finish_reason,
                    "excluding error-signature reply from storage"
                );
                return None;
            }
            // Already logged by the runner; nothing to store.
            GenerationOutcome::Failure { .. } => return None,
        };

        let metrics = promptlab_metrics::score(&reply.content, Some(&experiment.prompt));
        let overall_score = metrics.overall_score;

        let new_response = NewResponse {
            parameters: combination.clone(),
            content: reply.content,
            finish_reason: reply.finish_reason,
            raw_metadata: reply.raw_metadata,
            metrics,
        };

        match self.store.append_response(experiment.id, new_response).await {
            Ok(record) => {
                METRICS.inc_responses_stored();
                obs::emit_response_stored(experiment.id, record.id, overall_score);
                Some(StoredResponseSummary {
                    response_id: record.id,
                    parameters: combination,
                    content: record.content,
                    overall_score,
                })
            }
            Err(err) => {
                obs::emit_store_error(experiment.id, &err);
                None
            }
        }
    }
}
