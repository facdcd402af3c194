//! Per-combination generation outcome.

use serde::{Deserialize, Serialize};

/// Classified reason a generation call failed for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Transient overload persisted through every retry.
    Overloaded,
    RateLimited,
    QuotaExceeded,
    Unauthorized,
    Unknown,
}

/// Successful reply from the generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReply {
    pub content: String,

    /// Provider tag describing why output stopped.
    pub finish_reason: String,

    /// Opaque provider metadata. Kept for audit, never parsed.
    pub raw_metadata: serde_json::Value,
}

/// Outcome of one generation attempt chain for one combination.
///
/// Classified failures are values, not errors: a failing combination is
/// recorded and the sweep moves on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationOutcome {
    Success { reply: GenerationReply },
    Failure { kind: FailureKind, message: String },
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Success { .. })
    }

    /// The reply, if this outcome carries one.
    pub fn reply(&self) -> Option<&GenerationReply> {
        match self {
            GenerationOutcome::Success { reply } => Some(reply),
            GenerationOutcome::Failure { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        let ok = GenerationOutcome::Success {
            reply: GenerationReply {
                content: "text".to_string(),
                finish_reason: "STOP".to_string(),
                raw_metadata: serde_json::Value::Null,
            },
        };
        assert!(ok.is_success());
        assert_eq!(ok.reply().map(|r| r.content.as_str()), Some("text"));

        let failed = GenerationOutcome::Failure {
            kind: FailureKind::RateLimited,
            message: "rate limit".to_string(),
        };
        assert!(!failed.is_success());
        assert!(failed.reply().is_none());
    }

    #[test]
    fn test_outcome_serde_tagging() {
        let failed = GenerationOutcome::Failure {
            kind: FailureKind::QuotaExceeded,
            message: "quota".to_string(),
        };
        let json = serde_json::to_string(&failed).expect("serialize");
        assert!(json.contains(r#""status":"failure""#));
        assert!(json.contains(r#""kind":"quota_exceeded""#));

        let back: GenerationOutcome = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(failed, back);
    }
}
