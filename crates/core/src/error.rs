//! Error types for websage.
//!
//! This module defines a unified error enum covering configuration, I/O,
//! search, model and prompt failures. Every failure is terminal for the
//! current pipeline run: nothing in the workspace retries on its own.

use thiserror::Error;

/// Unified error type for websage.
///
/// All functions in the workspace return `Result<T, AppError>`.
/// We never panic; errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The search service could not be reached, timed out, or answered
    /// with a non-success status
    #[error("Search unavailable: {0}")]
    SearchUnavailable(String),

    /// The search response envelope lacks `data.webPages.value`
    #[error("Invalid search response: {0}")]
    SearchResponseInvalid(String),

    /// The model service rejected our credentials
    #[error("Model authentication failed: {0}")]
    ModelAuth(String),

    /// The model service throttled the request
    #[error("Model rate limited: {0}")]
    ModelRateLimited(String),

    /// The model payload lacks the fields required by the requested variant
    #[error("Invalid model response: {0}")]
    ModelResponseInvalid(String),

    /// Other LLM provider errors (transport, unexpected status)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Whether an external resilience layer may retry the failed call.
    ///
    /// Only transient search outages and model throttling qualify.
    /// Credential rejection and malformed payloads never succeed on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::SearchUnavailable(_) | AppError::ModelRateLimited(_)
        )
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
