//! Experiment persistence: backend-agnostic trait plus the filesystem
//! artifact store and an in-memory fake for tests.
//!
//! Response artifacts carry a SHA-256 digest that is verified on read, so
//! silent corruption surfaces as an explicit error instead of skewed
//! scores downstream.

pub mod fs;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{ExperimentRecord, ExperimentSummary, NewResponse, ResponseRecord};

pub use fs::FsExperimentStore;
pub use memory::MemoryExperimentStore;

/// Errors from experiment persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("experiment not found: {id}")]
    ExperimentNotFound { id: Uuid },

    #[error("artifact digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Content digest (SHA-256 hex string) of a persisted artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Compute the SHA-256 digest of the given bytes.
    pub fn from_bytes(data: &[u8]) -> Self {
        use sha2::Digest;
        let mut hasher = sha2::Sha256::new();
        hasher.update(data);
        ContentDigest(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sort key for response listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSort {
    #[default]
    OverallScore,
    Temperature,
    CreatedAt,
}

/// Sort direction for response listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// One page of an experiment listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentPage {
    pub experiments: Vec<ExperimentSummary>,
    pub total: usize,
}

/// Backend-agnostic experiment persistence.
///
/// Implementations must tolerate concurrent readers; the sweep pipeline
/// itself writes strictly sequentially.
#[async_trait]
pub trait ExperimentStore: Send + Sync {
    /// Persist a new experiment for the given prompt.
    async fn create_experiment(&self, prompt: &str) -> StoreResult<ExperimentRecord>;

    /// Load one experiment. `ExperimentNotFound` if absent.
    async fn get_experiment(&self, id: Uuid) -> StoreResult<ExperimentRecord>;

    /// List experiments ordered by `updated_at` descending, with the
    /// total count before pagination.
    async fn list_experiments(&self, limit: usize, offset: usize) -> StoreResult<ExperimentPage>;

    /// Append a scored response to an experiment, touching its
    /// `updated_at`.
    async fn append_response(
        &self,
        experiment_id: Uuid,
        response: NewResponse,
    ) -> StoreResult<ResponseRecord>;

    /// List an experiment's responses in the requested order.
    async fn list_responses(
        &self,
        experiment_id: Uuid,
        sort: ResponseSort,
        order: SortOrder,
    ) -> StoreResult<Vec<ResponseRecord>>;
}

/// Shared ordering for response listings.
pub(crate) fn sort_responses(responses: &mut [ResponseRecord], sort: ResponseSort, order: SortOrder) {
    responses.sort_by(|a, b| {
        let ordering = match sort {
            ResponseSort::OverallScore => a
                .metrics
                .overall_score
                .partial_cmp(&b.metrics.overall_score)
                .unwrap_or(std::cmp::Ordering::Equal),
            ResponseSort::Temperature => a
                .parameters
                .temperature
                .partial_cmp(&b.parameters.temperature)
                .unwrap_or(std::cmp::Ordering::Equal),
            ResponseSort::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}
