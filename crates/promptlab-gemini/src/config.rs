//! Gemini backend configuration.
//!
//! Configuration is an explicit value handed to the client constructor;
//! `from_env` exists as a convenience for binaries, not as a hidden
//! global.

use serde::{Deserialize, Serialize};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";

/// Base URL of the Gemini REST API.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Errors constructing a configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum GeminiConfigError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,
}

/// Gemini client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key sent with every request.
    pub api_key: String,
    /// Model identifier, e.g. `gemini-2.0-flash-lite`.
    pub model: String,
    /// API base URL (overridable for proxies and tests).
    pub api_base: String,
}

impl GeminiConfig {
    /// Create a config for the default model and endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Read `GEMINI_API_KEY` (required) and `GEMINI_MODEL` (optional)
    /// from the environment.
    pub fn from_env() -> Result<Self, GeminiConfigError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(GeminiConfigError::MissingApiKey)?;

        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            if !model.is_empty() {
                config.model = model;
            }
        }
        Ok(config)
    }

    /// Override the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = GeminiConfig::new("secret");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_config_builders() {
        let config = GeminiConfig::new("secret")
            .with_model("gemini-pro")
            .with_api_base("http://localhost:8080/v1beta");
        assert_eq!(config.model, "gemini-pro");
        assert_eq!(config.api_base, "http://localhost:8080/v1beta");
    }
}
