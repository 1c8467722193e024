//! Prompt system for websage.
//!
//! Renders the user query, the citation-indexed search context and the
//! current date into one fixed answer template. Rendering is a pure
//! function: no clock reads, no network calls.

pub mod builder;
pub mod template;
pub mod types;

// Re-export main types
pub use builder::{build_prompt, format_date};
pub use types::{BuiltPrompt, BuiltPromptMetadata};
