//! Structured observability hooks for sweep lifecycle events.
//!
//! This module provides:
//! - Sweep-scoped tracing spans via [`sweep_span`]
//! - Emission functions for key lifecycle events: sweep start/finish,
//!   retries, failures, stored responses
//!
//! Events are emitted through `tracing`; configure output via
//! [`crate::telemetry::init_tracing`].

use tracing::{info, warn, Span};
use uuid::Uuid;

use crate::domain::FailureKind;

/// Build a span tagged with the experiment id for one sweep.
///
/// Attach it with `tracing::Instrument` so every event inside the sweep
/// future carries the experiment id:
///
/// ```ignore
/// async { /* run the sweep */ }
///     .instrument(sweep_span(experiment_id))
///     .await
/// ```
pub fn sweep_span(experiment_id: Uuid) -> Span {
    tracing::info_span!("promptlab.sweep", experiment_id = %experiment_id)
}

/// Emit event: sweep started with its combination count.
pub fn emit_sweep_started(experiment_id: Uuid, combinations: usize) {
    info!(
        event = "sweep.started",
        experiment_id = %experiment_id,
        combinations = combinations,
    );
}

/// Emit event: transient overload, backing off before the next attempt.
pub fn emit_generation_retry(attempt: u32, max_retries: u32, delay_ms: u64) {
    info!(
        event = "generation.retry",
        attempt = attempt,
        max_retries = max_retries,
        delay_ms = delay_ms,
    );
}

/// Emit event: generation failed with its classified kind (warning level).
pub fn emit_generation_failed(kind: FailureKind, message: &str) {
    warn!(event = "generation.failed", kind = ?kind, message = %message);
}

/// Emit event: one combination finished, successfully or not.
pub fn emit_combination_completed(index: usize, success: bool) {
    info!(event = "combination.completed", index = index, success = success);
}

/// Emit event: a scored response was persisted.
pub fn emit_response_stored(experiment_id: Uuid, response_id: Uuid, overall_score: f64) {
    info!(
        event = "response.stored",
        experiment_id = %experiment_id,
        response_id = %response_id,
        overall_score = overall_score,
    );
}

/// Emit event: persisting one response failed; the sweep continues
/// (warning level).
pub fn emit_store_error(experiment_id: Uuid, error: &dyn std::fmt::Display) {
    warn!(event = "store.error", experiment_id = %experiment_id, error = %error);
}

/// Emit event: sweep finished with attempted/generated counts.
pub fn emit_sweep_finished(
    experiment_id: Uuid,
    attempted: usize,
    generated: usize,
    duration_ms: u64,
) {
    info!(
        event = "sweep.finished",
        experiment_id = %experiment_id,
        attempted = attempted,
        generated = generated,
        duration_ms = duration_ms,
    );
}
