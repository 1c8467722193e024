//! LLM integration crate for websage.
//!
//! This crate dispatches a rendered prompt to one of two model variants
//! over an OpenAI-compatible chat-completion API and reshapes the raw
//! payload into a single tagged result.
//!
//! # Example
//! ```no_run
//! use websage_core::ModelSettings;
//! use websage_llm::{normalize, ChatCompletionsClient, ModelGateway, ModelVariant};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ChatCompletionsClient::from_settings(&ModelSettings::default(), "sk-...")?;
//! let payload = client.generate("Hello, world!", ModelVariant::Reasoning).await?;
//! let response = normalize(payload, ModelVariant::Reasoning)?;
//! println!("{}", response.answer());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod normalize;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{ChatMessage, ChatRequest, LlmUsage, ModelGateway, RawModelPayload};
pub use normalize::normalize;
pub use providers::ChatCompletionsClient;
pub use types::{ModelResponse, ModelVariant};
