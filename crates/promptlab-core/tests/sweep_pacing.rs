//! Sequential ordering and pacing contract for the sweep runner.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use promptlab_core::{
    BackendError, FailureKind, GenerationBackend, GenerationClient, GenerationOutcome,
    GenerationReply, ParameterCombination, ParameterRanges, SweepRunner, expand_combinations,
};

/// Backend that echoes the combination's temperature and records call
/// instants; optionally fails specific call indices.
struct EchoBackend {
    calls: Mutex<Vec<tokio::time::Instant>>,
    failures: Mutex<VecDeque<(usize, BackendError)>>,
}

impl EchoBackend {
    fn new() -> Arc<Self> {
        Self::failing_at(Vec::new())
    }

    fn failing_at(failures: Vec<(usize, BackendError)>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(failures.into()),
        })
    }

    fn call_gaps(&self) -> Vec<Duration> {
        let calls = self.calls.lock().unwrap();
        calls.windows(2).map(|w| w[1] - w[0]).collect()
    }
}

#[async_trait]
impl GenerationBackend for EchoBackend {
    async fn generate(
        &self,
        _prompt: &str,
        params: &ParameterCombination,
    ) -> std::result::Result<GenerationReply, BackendError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(tokio::time::Instant::now());
            calls.len() - 1
        };

        let mut failures = self.failures.lock().unwrap();
        if failures.front().map_or(false, |(i, _)| *i == index) {
            let (_, err) = failures.pop_front().expect("front checked");
            return Err(err);
        }

        Ok(GenerationReply {
            content: format!("reply for temperature {}", params.temperature),
            finish_reason: "STOP".to_string(),
            raw_metadata: serde_json::Value::Null,
        })
    }
}

fn temperature_sweep(values: &[f64]) -> Vec<ParameterCombination> {
    let ranges = ParameterRanges {
        temperature: Some(values.to_vec()),
        top_p: Some(vec![0.95]),
        top_k: Some(vec![40]),
        max_output_tokens: Some(vec![2048]),
    };
    expand_combinations(&ranges).expect("expand")
}

#[tokio::test(start_paused = true)]
async fn small_sweep_paces_300ms_and_preserves_order() {
    let backend = EchoBackend::new();
    let runner = SweepRunner::new(GenerationClient::new(backend.clone()));

    let steps = runner
        .run("prompt", temperature_sweep(&[0.1, 0.5, 0.9]))
        .await;

    assert_eq!(steps.len(), 3);
    let temps: Vec<f64> = steps.iter().map(|s| s.combination.temperature).collect();
    assert_eq!(temps, vec![0.1, 0.5, 0.9]);

    // Two gaps for three calls: pacing runs between calls, not after the
    // last one.
    assert_eq!(
        backend.call_gaps(),
        vec![Duration::from_millis(300), Duration::from_millis(300)]
    );
}

#[tokio::test(start_paused = true)]
async fn large_sweep_paces_500ms() {
    let backend = EchoBackend::new();
    let runner = SweepRunner::new(GenerationClient::new(backend.clone()));

    let values: Vec<f64> = (0..11).map(|i| i as f64 / 10.0).collect();
    let steps = runner.run("prompt", temperature_sweep(&values)).await;

    assert_eq!(steps.len(), 11);
    let gaps = backend.call_gaps();
    assert_eq!(gaps.len(), 10);
    assert!(gaps.iter().all(|gap| *gap == Duration::from_millis(500)));
}

#[tokio::test(start_paused = true)]
async fn error_signature_reply_is_recorded_but_not_storable() {
    struct ErrorContentBackend;

    #[async_trait]
    impl GenerationBackend for ErrorContentBackend {
        async fn generate(
            &self,
            _prompt: &str,
            _params: &ParameterCombination,
        ) -> std::result::Result<GenerationReply, BackendError> {
            Ok(GenerationReply {
                content: "Error: boom".to_string(),
                finish_reason: "STOP".to_string(),
                raw_metadata: serde_json::Value::Null,
            })
        }
    }

    let runner = SweepRunner::new(GenerationClient::new(Arc::new(ErrorContentBackend)));
    let steps = runner.run("prompt", temperature_sweep(&[0.7])).await;

    // The step stays in the raw outcome log but is excluded from the
    // scored/stored set.
    assert_eq!(steps.len(), 1);
    assert!(steps[0].outcome.is_success());
    assert!(!steps[0].is_storable());
}

#[tokio::test(start_paused = true)]
async fn fatal_failure_does_not_abort_the_sweep() {
    let backend = EchoBackend::failing_at(vec![(1, BackendError::new("429 rate limit"))]);
    let runner = SweepRunner::new(GenerationClient::new(backend.clone()));

    let steps = runner
        .run("prompt", temperature_sweep(&[0.1, 0.5, 0.9]))
        .await;

    assert_eq!(steps.len(), 3);
    assert!(steps[0].outcome.is_success());
    assert!(matches!(
        steps[1].outcome,
        GenerationOutcome::Failure {
            kind: FailureKind::RateLimited,
            ..
        }
    ));
    assert!(steps[2].outcome.is_success());
}
