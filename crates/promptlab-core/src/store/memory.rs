//! In-memory experiment store (testing only).
//!
//! Satisfies the [`ExperimentStore`] contract with mutex-protected maps
//! and no external dependencies.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{ExperimentRecord, ExperimentSummary, NewResponse, ResponseRecord};

use super::{
    sort_responses, ExperimentPage, ExperimentStore, ResponseSort, SortOrder, StoreError,
    StoreResult,
};

#[derive(Debug)]
struct ExperimentState {
    record: ExperimentRecord,
    responses: Vec<ResponseRecord>,
}

/// In-memory experiment store backed by a `HashMap<Uuid, ExperimentState>`.
#[derive(Debug, Default)]
pub struct MemoryExperimentStore {
    experiments: Mutex<HashMap<Uuid, ExperimentState>>,
}

impl MemoryExperimentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExperimentStore for MemoryExperimentStore {
    async fn create_experiment(&self, prompt: &str) -> StoreResult<ExperimentRecord> {
        let record = ExperimentRecord::new(prompt);
        let mut experiments = self.experiments.lock().unwrap();
        experiments.insert(
            record.id,
            ExperimentState {
                record: record.clone(),
                responses: Vec::new(),
            },
        );
        Ok(record)
    }

    async fn get_experiment(&self, id: Uuid) -> StoreResult<ExperimentRecord> {
        let experiments = self.experiments.lock().unwrap();
        experiments
            .get(&id)
            .map(|state| state.record.clone())
            .ok_or(StoreError::ExperimentNotFound { id })
    }

    async fn list_experiments(&self, limit: usize, offset: usize) -> StoreResult<ExperimentPage> {
        let experiments = self.experiments.lock().unwrap();
        let mut summaries: Vec<ExperimentSummary> = experiments
            .values()
            .map(|state| ExperimentSummary {
                id: state.record.id,
                prompt: state.record.prompt.clone(),
                response_count: state.responses.len(),
                created_at: state.record.created_at,
                updated_at: state.record.updated_at,
            })
            .collect();

        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        let total = summaries.len();
        let page = summaries.into_iter().skip(offset).take(limit).collect();

        Ok(ExperimentPage {
            experiments: page,
            total,
        })
    }

    async fn append_response(
        &self,
        experiment_id: Uuid,
        response: NewResponse,
    ) -> StoreResult<ResponseRecord> {
        let mut experiments = self.experiments.lock().unwrap();
        let state = experiments
            .get_mut(&experiment_id)
            .ok_or(StoreError::ExperimentNotFound { id: experiment_id })?;

        let record = ResponseRecord::from_new(response);
        state.responses.push(record.clone());
        state.record.updated_at = Utc::now();
        Ok(record)
    }

    async fn list_responses(
        &self,
        experiment_id: Uuid,
        sort: ResponseSort,
        order: SortOrder,
    ) -> StoreResult<Vec<ResponseRecord>> {
        let experiments = self.experiments.lock().unwrap();
        let state = experiments
            .get(&experiment_id)
            .ok_or(StoreError::ExperimentNotFound { id: experiment_id })?;

        let mut responses = state.responses.clone();
        sort_responses(&mut responses, sort, order);
        Ok(responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParameterCombination;

    fn response_with_score(content: &str, temperature: f64) -> NewResponse {
        NewResponse {
            parameters: ParameterCombination {
                temperature,
                ..ParameterCombination::default()
            },
            content: content.to_string(),
            finish_reason: "STOP".to_string(),
            raw_metadata: serde_json::Value::Null,
            metrics: promptlab_metrics::score(content, None),
        }
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryExperimentStore::new();
        let experiment = store.create_experiment("prompt").await.expect("create");

        store
            .append_response(experiment.id, response_with_score("Some reply text.", 0.2))
            .await
            .expect("append");

        let responses = store
            .list_responses(experiment.id, ResponseSort::CreatedAt, SortOrder::Asc)
            .await
            .expect("list");
        assert_eq!(responses.len(), 1);

        let page = store.list_experiments(10, 0).await.expect("list");
        assert_eq!(page.total, 1);
        assert_eq!(page.experiments[0].response_count, 1);
    }

    #[tokio::test]
    async fn test_sort_by_temperature() {
        let store = MemoryExperimentStore::new();
        let experiment = store.create_experiment("prompt").await.expect("create");

        for temperature in [0.9, 0.1, 0.5] {
            store
                .append_response(
                    experiment.id,
                    response_with_score("Reply body text.", temperature),
                )
                .await
                .expect("append");
        }

        let responses = store
            .list_responses(experiment.id, ResponseSort::Temperature, SortOrder::Asc)
            .await
            .expect("list");
        let temps: Vec<f64> = responses.iter().map(|r| r.parameters.temperature).collect();
        assert_eq!(temps, vec![0.1, 0.5, 0.9]);
    }

    #[tokio::test]
    async fn test_unknown_experiment_errors() {
        let store = MemoryExperimentStore::new();
        let err = store
            .append_response(
                Uuid::new_v4(),
                response_with_score("text", 0.7),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ExperimentNotFound { .. }));
    }
}
