//! Websage Core Library
//!
//! This crate provides the foundational utilities shared by every websage crate:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management (endpoints, credentials, model names)

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, ModelSettings, PromptLanguage, SearchSettings};
pub use error::{AppError, AppResult};
