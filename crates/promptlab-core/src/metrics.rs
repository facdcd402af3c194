//! Global atomic counters for Promptlab observability.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. at the end of a sweep).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters — no allocations, no locking.
pub struct Metrics {
    generations_attempted: AtomicU64,
    generations_failed: AtomicU64,
    retries_performed: AtomicU64,
    responses_stored: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            generations_attempted: AtomicU64::new(0),
            generations_failed: AtomicU64::new(0),
            retries_performed: AtomicU64::new(0),
            responses_stored: AtomicU64::new(0),
        }
    }

    /// Increment the generations-attempted counter by one.
    pub fn inc_generations_attempted(&self) {
        self.generations_attempted.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "generations_attempted", "counter incremented");
    }

    /// Increment the generations-failed counter by one.
    pub fn inc_generations_failed(&self) {
        self.generations_failed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "generations_failed", "counter incremented");
    }

    /// Increment the retries-performed counter by one.
    pub fn inc_retries_performed(&self) {
        self.retries_performed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "retries_performed", "counter incremented");
    }

    /// Increment the responses-stored counter by one.
    pub fn inc_responses_stored(&self) {
        self.responses_stored.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "responses_stored", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    ///
    /// Call this at natural boundaries (end of a sweep) rather than on
    /// every increment.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            generations_attempted = self.generations_attempted(),
            generations_failed = self.generations_failed(),
            retries_performed = self.retries_performed(),
            responses_stored = self.responses_stored(),
        );
    }

    /// Read the current generations-attempted count.
    pub fn generations_attempted(&self) -> u64 {
        self.generations_attempted.load(Ordering::Relaxed)
    }

    /// Read the current generations-failed count.
    pub fn generations_failed(&self) -> u64 {
        self.generations_failed.load(Ordering::Relaxed)
    }

    /// Read the current retries-performed count.
    pub fn retries_performed(&self) -> u64 {
        self.retries_performed.load(Ordering::Relaxed)
    }

    /// Read the current responses-stored count.
    pub fn responses_stored(&self) -> u64 {
        self.responses_stored.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.generations_attempted.store(0, Ordering::Relaxed);
        self.generations_failed.store(0, Ordering::Relaxed);
        self.retries_performed.store(0, Ordering::Relaxed);
        self.responses_stored.store(0, Ordering::Relaxed);
    }
}
