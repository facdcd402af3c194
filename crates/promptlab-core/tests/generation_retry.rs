//! Retry/backoff contract for the generation client, driven under
//! paused tokio time so the 1s/2s/4s schedule is asserted exactly.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use promptlab_core::{
    BackendError, FailureKind, GenerationBackend, GenerationClient, GenerationOutcome,
    GenerationReply, ParameterCombination,
};

type Scripted = std::result::Result<GenerationReply, BackendError>;

/// Backend that replays a fixed script and records call instants.
struct ScriptedBackend {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<tokio::time::Instant>>,
}

impl ScriptedBackend {
    fn new(script: Vec<Scripted>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn call_gaps(&self) -> Vec<Duration> {
        let calls = self.calls.lock().unwrap();
        calls.windows(2).map(|w| w[1] - w[0]).collect()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(
        &self,
        _prompt: &str,
        _params: &ParameterCombination,
    ) -> std::result::Result<GenerationReply, BackendError> {
        self.calls.lock().unwrap().push(tokio::time::Instant::now());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::new("script exhausted")))
    }
}

fn reply(content: &str) -> GenerationReply {
    GenerationReply {
        content: content.to_string(),
        finish_reason: "STOP".to_string(),
        raw_metadata: serde_json::Value::Null,
    }
}

fn overload() -> Scripted {
    Err(BackendError::new("503 service unavailable, try again later"))
}

#[tokio::test(start_paused = true)]
async fn transient_overload_backs_off_1s_2s_4s_then_gives_up() {
    let backend = ScriptedBackend::new(vec![overload(), overload(), overload(), overload()]);
    let client = GenerationClient::new(backend.clone());

    let outcome = client
        .generate("prompt", &ParameterCombination::default())
        .await;

    match outcome {
        GenerationOutcome::Failure { kind, .. } => assert_eq!(kind, FailureKind::Overloaded),
        other => panic!("expected overloaded failure, got {other:?}"),
    }

    // Initial call plus three retries, spaced exactly by the schedule.
    assert_eq!(
        backend.call_gaps(),
        vec![
            Duration::from_millis(1000),
            Duration::from_millis(2000),
            Duration::from_millis(4000),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn transient_overload_recovers_mid_schedule() {
    let backend = ScriptedBackend::new(vec![overload(), overload(), Ok(reply("recovered"))]);
    let client = GenerationClient::new(backend.clone());

    let outcome = client
        .generate("prompt", &ParameterCombination::default())
        .await;

    assert!(outcome.is_success());
    assert_eq!(outcome.reply().map(|r| r.content.as_str()), Some("recovered"));
    assert_eq!(
        backend.call_gaps(),
        vec![Duration::from_millis(1000), Duration::from_millis(2000)]
    );
}

#[tokio::test(start_paused = true)]
async fn fatal_failures_do_not_retry() {
    let cases = [
        ("429 rate limit exceeded", FailureKind::RateLimited),
        ("quota exhausted for project", FailureKind::QuotaExceeded),
        ("API key not valid", FailureKind::Unauthorized),
        ("something inexplicable", FailureKind::Unknown),
    ];

    for (message, expected) in cases {
        let backend = ScriptedBackend::new(vec![Err(BackendError::new(message))]);
        let client = GenerationClient::new(backend.clone());

        let outcome = client
            .generate("prompt", &ParameterCombination::default())
            .await;

        match outcome {
            GenerationOutcome::Failure { kind, message: m } => {
                assert_eq!(kind, expected, "message: {m}");
            }
            other => panic!("expected failure, got {other:?}"),
        }
        // Exactly one backend call: no retry for fatal classifications.
        assert!(backend.call_gaps().is_empty());
    }
}
