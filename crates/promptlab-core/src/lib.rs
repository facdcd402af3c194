//! Promptlab Core Library
//!
//! Domain model and orchestration for parameter sweeps: range expansion,
//! the generation client with classification and bounded retry, the
//! sequential sweep runner, experiment persistence, and export.

pub mod client;
pub mod domain;
pub mod export;
pub mod metrics;
pub mod obs;
pub mod orchestrator;
pub mod service;
pub mod store;
pub mod sweep;
pub mod telemetry;

pub use domain::{
    validate_prompt, ExperimentRecord, ExperimentSummary, FailureKind, GenerationOutcome,
    GenerationReply, LabError, NewResponse, ParameterCombination, ParameterRanges, ResponseRecord,
    Result, ValidationError, MAX_PROMPT_CHARS,
};

pub use client::{
    classify_failure, BackendError, FailureClass, GenerationBackend, GenerationClient, RetryPolicy,
};

pub use orchestrator::{PacingPolicy, SweepRunner, SweepStep};

pub use service::{ExperimentService, StoredResponseSummary, SweepReport};

pub use store::{
    ContentDigest, ExperimentPage, ExperimentStore, FsExperimentStore, MemoryExperimentStore,
    ResponseSort, SortOrder, StoreError, StoreResult,
};

pub use export::{render_experiment_csv, render_experiment_document, ExperimentDocument};

pub use sweep::expand_combinations;

pub use metrics::METRICS;
pub use obs::{
    emit_combination_completed, emit_generation_failed, emit_generation_retry,
    emit_response_stored, emit_store_error, emit_sweep_finished, emit_sweep_started, sweep_span,
};
pub use telemetry::init_tracing;

/// Promptlab version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
