//! Experiment and response records.

use chrono::{DateTime, Utc};
use promptlab_metrics::QualityMetrics;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValidationError;
use super::params::ParameterCombination;

/// Upper bound on prompt length, in characters.
pub const MAX_PROMPT_CHARS: usize = 10_000;

/// A stored experiment: one prompt swept any number of times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRecord {
    pub id: Uuid,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExperimentRecord {
    /// Create a fresh record with a new id and current timestamps.
    pub fn new(prompt: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            prompt: prompt.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Experiment listing entry with its response count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSummary {
    pub id: Uuid,
    pub prompt: String,
    pub response_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A scored response ready for storage (id and timestamp assigned by the
/// store on append).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewResponse {
    pub parameters: ParameterCombination,
    pub content: String,
    pub finish_reason: String,
    pub raw_metadata: serde_json::Value,
    pub metrics: QualityMetrics,
}

/// A stored response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub id: Uuid,
    pub parameters: ParameterCombination,
    pub content: String,
    pub finish_reason: String,
    pub raw_metadata: serde_json::Value,
    pub metrics: QualityMetrics,
    pub created_at: DateTime<Utc>,
}

impl ResponseRecord {
    /// Materialize a stored record from a pending response.
    pub fn from_new(new: NewResponse) -> Self {
        Self {
            id: Uuid::new_v4(),
            parameters: new.parameters,
            content: new.content,
            finish_reason: new.finish_reason,
            raw_metadata: new.raw_metadata,
            metrics: new.metrics,
            created_at: Utc::now(),
        }
    }
}

/// Validate a sweep prompt: non-empty after trimming, bounded length.
pub fn validate_prompt(prompt: &str) -> Result<(), ValidationError> {
    if prompt.trim().is_empty() {
        return Err(ValidationError::EmptyPrompt);
    }
    let len = prompt.chars().count();
    if len > MAX_PROMPT_CHARS {
        return Err(ValidationError::PromptTooLong {
            len,
            max: MAX_PROMPT_CHARS,
        });
    }
    Ok(())
}
