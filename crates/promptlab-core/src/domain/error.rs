//! Domain-level error taxonomy for Promptlab.

use crate::store::StoreError;

/// Errors that reject a sweep request before any generation call is made.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("prompt must not be empty")]
    EmptyPrompt,

    #[error("prompt too long: {len} chars (max {max})")]
    PromptTooLong { len: usize, max: usize },

    #[error("parameter range {field} is required")]
    MissingRange { field: &'static str },

    #[error("parameter range {field} must not be empty")]
    EmptyRange { field: &'static str },

    #[error("parameter {field} value {value} is outside its domain")]
    OutOfDomain { field: &'static str, value: String },
}

/// Promptlab domain errors.
#[derive(Debug, thiserror::Error)]
pub enum LabError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Promptlab domain operations.
pub type Result<T> = std::result::Result<T, LabError>;
