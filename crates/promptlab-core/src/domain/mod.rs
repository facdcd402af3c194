//! Promptlab domain model: parameters, outcomes, records, and errors.

pub mod error;
pub mod experiment;
pub mod outcome;
pub mod params;

pub use error::{LabError, Result, ValidationError};
pub use experiment::{
    validate_prompt, ExperimentRecord, ExperimentSummary, NewResponse, ResponseRecord,
    MAX_PROMPT_CHARS,
};
pub use outcome::{FailureKind, GenerationOutcome, GenerationReply};
pub use params::{
    ParameterCombination, ParameterRanges, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE,
    DEFAULT_TOP_K, DEFAULT_TOP_P, TEMPERATURE_BOUNDS, TOP_P_BOUNDS,
};
