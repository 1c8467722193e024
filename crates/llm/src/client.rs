//! Model gateway abstraction and request/response types.

use crate::types::ModelVariant;
use serde::{Deserialize, Serialize};
use websage_core::AppResult;

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message author role ("user", "system", "assistant")
    pub role: String,

    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat-completion request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier (e.g., "deepseek-chat")
    pub model: String,

    /// Conversation; websage always sends a single user turn
    pub messages: Vec<ChatMessage>,

    /// Always false: the full output is produced before the call returns
    pub stream: bool,
}

impl ChatRequest {
    /// Create a single-turn, non-streaming request.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(prompt)],
            stream: false,
        }
    }
}

/// Token usage statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LlmUsage {
    /// Tokens in the prompt
    #[serde(default)]
    pub prompt_tokens: u32,

    /// Tokens in the completion
    #[serde(default)]
    pub completion_tokens: u32,

    /// Total tokens used
    #[serde(default)]
    pub total_tokens: u32,
}

impl LlmUsage {
    /// Create usage stats from prompt and completion token counts.
    ///
    /// The total saturates at `u32::MAX`.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }
}

/// The first choice of a chat completion, before variant-specific reshaping.
///
/// Both text fields stay optional here; whether their absence is an error
/// depends on the variant and is decided by [`crate::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawModelPayload {
    /// Model that produced the completion
    pub model: String,

    /// Final answer text (`choices[0].message.content`)
    pub content: Option<String>,

    /// Reasoning trace (`choices[0].message.reasoning_content`)
    pub reasoning_content: Option<String>,

    /// Usage statistics, zeroed when the service omits them
    pub usage: LlmUsage,
}

/// Trait for model services.
///
/// Implementations own their connection and credentials for their whole
/// lifetime and hold no mutable state, so one instance can serve
/// concurrent pipeline runs.
#[async_trait::async_trait]
pub trait ModelGateway: Send + Sync {
    /// Get the provider name (e.g., "deepseek").
    fn provider_name(&self) -> &str;

    /// Remote model name used for a variant.
    fn model_for(&self, variant: ModelVariant) -> &str;

    /// Send the prompt to the model selected by `variant`.
    ///
    /// Performs exactly one outbound call. No retries, no caching.
    async fn generate(&self, prompt: &str, variant: ModelVariant) -> AppResult<RawModelPayload>;
}
