//! OpenAI-compatible chat-completion provider.
//!
//! Talks to any service exposing `POST {base}/chat/completions`
//! (DeepSeek by default). Reasoning models return an extra
//! `reasoning_content` field next to `content`.

use crate::client::{ChatRequest, LlmUsage, ModelGateway, RawModelPayload};
use crate::types::ModelVariant;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use websage_core::{AppError, AppResult, ModelSettings};

/// Chat-completion response format.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    reasoning_content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: Option<u32>,
    #[serde(default)]
    completion_tokens: Option<u32>,
    #[serde(default)]
    total_tokens: Option<u32>,
}

impl From<ChatUsage> for LlmUsage {
    fn from(usage: ChatUsage) -> Self {
        let mut converted = LlmUsage::new(
            usage.prompt_tokens.unwrap_or_default(),
            usage.completion_tokens.unwrap_or_default(),
        );
        if let Some(total) = usage.total_tokens {
            converted.total_tokens = total;
        }
        converted
    }
}

/// Client for OpenAI-compatible chat-completion APIs.
pub struct ChatCompletionsClient {
    /// Base URL (without the `/chat/completions` suffix)
    base_url: String,

    /// Bearer token
    api_key: String,

    /// Model used for [`ModelVariant::Standard`]
    standard_model: String,

    /// Model used for [`ModelVariant::Reasoning`]
    reasoning_model: String,

    /// HTTP client
    client: reqwest::Client,
}

impl ChatCompletionsClient {
    /// Create a client from model settings and a resolved API key.
    pub fn from_settings(settings: &ModelSettings, api_key: impl Into<String>) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = settings.timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build model HTTP client: {}", e)))?;

        Ok(Self {
            base_url: settings.endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            standard_model: settings.standard_model.clone(),
            reasoning_model: settings.reasoning_model.clone(),
            client,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Take the first choice of a completion body.
    fn convert_response(&self, body: &str, requested_model: &str) -> AppResult<RawModelPayload> {
        let response: ChatCompletionResponse = serde_json::from_str(body).map_err(|e| {
            AppError::ModelResponseInvalid(format!("Failed to parse completion: {}", e))
        })?;

        let message = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .ok_or_else(|| {
                AppError::ModelResponseInvalid("Completion has no choices[0].message".to_string())
            })?;

        let usage = response.usage.map(LlmUsage::from).unwrap_or_default();

        Ok(RawModelPayload {
            model: response
                .model
                .unwrap_or_else(|| requested_model.to_string()),
            content: message.content,
            reasoning_content: message.reasoning_content,
            usage,
        })
    }
}

/// Map a non-success status onto the error taxonomy.
fn status_error(status: StatusCode, body: String) -> AppError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            AppError::ModelAuth(format!("Model API rejected credentials ({}): {}", status, body))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            AppError::ModelRateLimited(format!("Model API throttled request ({}): {}", status, body))
        }
        _ => AppError::Llm(format!("Model API error ({}): {}", status, body)),
    }
}

#[async_trait::async_trait]
impl ModelGateway for ChatCompletionsClient {
    fn provider_name(&self) -> &str {
        "openai-compatible"
    }

    fn model_for(&self, variant: ModelVariant) -> &str {
        match variant {
            ModelVariant::Standard => &self.standard_model,
            ModelVariant::Reasoning => &self.reasoning_model,
        }
    }

    async fn generate(&self, prompt: &str, variant: ModelVariant) -> AppResult<RawModelPayload> {
        let model = self.model_for(variant);
        let request = ChatRequest::new(model, prompt);

        tracing::info!("Sending {} completion request to model '{}'", variant, model);
        tracing::debug!("Prompt length: {} bytes", prompt.len());

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Llm(format!("Model request timed out: {}", e))
                } else {
                    AppError::Llm(format!("Failed to send request to model API: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(status_error(status, error_text));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to read model response: {}", e)))?;

        let payload = self.convert_response(&body, model)?;

        tracing::info!(
            "Received completion from '{}' ({} tokens)",
            payload.model,
            payload.usage.total_tokens
        );

        Ok(payload)
    }
}
