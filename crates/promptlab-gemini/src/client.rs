//! Reqwest-backed Gemini `generateContent` client.
//!
//! Implements [`GenerationBackend`] for the core sweep pipeline. HTTP
//! failures are folded into the error message (status code plus response
//! body) so the core's substring classification sees the provider's own
//! phrasing; no structured error codes cross this boundary.

use async_trait::async_trait;
use promptlab_core::{BackendError, GenerationBackend, GenerationReply, ParameterCombination};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::GeminiConfig;

/// Gemini client for one configured model.
pub struct GeminiClient {
    config: GeminiConfig,
    http: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_p: f64,
    top_k: u32,
    max_output_tokens: u32,
}

impl GeminiClient {
    /// Create a client from an explicit configuration.
    pub fn new(config: GeminiConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("promptlab-gemini/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("reqwest client construction cannot fail with static options");

        Self { config, http }
    }

    fn request_body<'a>(
        prompt: &'a str,
        params: &ParameterCombination,
    ) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: params.temperature,
                top_p: params.top_p,
                top_k: params.top_k_or_default(),
                max_output_tokens: params.max_output_tokens_or_default(),
            },
        }
    }
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        params: &ParameterCombination,
    ) -> Result<GenerationReply, BackendError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.api_base, self.config.model
        );
        debug!(model = %self.config.model, temperature = params.temperature, "issuing generateContent request");

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&Self::request_body(prompt, params))
            .send()
            .await
            .map_err(|err| BackendError::new(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::new(format!("{status} {body}")));
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|err| BackendError::new(format!("invalid response body: {err}")))?;

        Ok(reply_from_response(raw))
    }
}

/// Extract content and finish reason from a `generateContent` response,
/// keeping candidates and prompt feedback as opaque audit metadata.
fn reply_from_response(raw: Value) -> GenerationReply {
    let first_candidate = raw
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first());

    let content = first_candidate
        .and_then(|c| c.pointer("/content/parts"))
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default();

    let finish_reason = first_candidate
        .and_then(|c| c.get("finishReason"))
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();

    let raw_metadata = json!({
        "candidates": raw.get("candidates").cloned().unwrap_or(Value::Null),
        "promptFeedback": raw.get("promptFeedback").cloned().unwrap_or(Value::Null),
    });

    GenerationReply {
        content,
        finish_reason,
        raw_metadata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_uses_camel_case_and_defaults() {
        let params = ParameterCombination {
            temperature: 0.4,
            top_p: 0.9,
            top_k: None,
            max_output_tokens: None,
        };
        let body = GeminiClient::request_body("hello", &params);
        let value = serde_json::to_value(&body).expect("serialize");

        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(value["generationConfig"]["temperature"], 0.4);
        assert_eq!(value["generationConfig"]["topP"], 0.9);
        assert_eq!(value["generationConfig"]["topK"], 40);
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 2048);
    }

    #[test]
    fn test_reply_extraction_joins_parts() {
        let raw = json!({
            "candidates": [{
                "content": {"parts": [{"text": "Hello "}, {"text": "world."}]},
                "finishReason": "STOP"
            }],
            "promptFeedback": {"safetyRatings": []}
        });

        let reply = reply_from_response(raw);
        assert_eq!(reply.content, "Hello world.");
        assert_eq!(reply.finish_reason, "STOP");
        assert_eq!(
            reply.raw_metadata["promptFeedback"]["safetyRatings"],
            json!([])
        );
    }

    #[test]
    fn test_reply_extraction_tolerates_missing_fields() {
        let reply = reply_from_response(json!({}));
        assert_eq!(reply.content, "");
        assert_eq!(reply.finish_reason, "unknown");
        assert_eq!(reply.raw_metadata["candidates"], Value::Null);
    }
}
