//! Promptlab Gemini backend
//!
//! Concrete [`promptlab_core::GenerationBackend`] implementation over the
//! Gemini `generateContent` REST endpoint.

pub mod client;
pub mod config;

pub use client::GeminiClient;
pub use config::{GeminiConfig, GeminiConfigError, DEFAULT_API_BASE, DEFAULT_MODEL};
