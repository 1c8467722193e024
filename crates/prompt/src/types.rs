//! Prompt types for websage.

use serde::{Deserialize, Serialize};
use websage_core::PromptLanguage;

/// A fully built prompt ready for model dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// User message sent as the single chat turn
    pub user: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Template language used
    pub language: PromptLanguage,

    /// Date substituted into the template (`YYYYMMDD`)
    #[serde(rename = "currentDate")]
    pub current_date: String,

    /// Size of the context block in bytes
    #[serde(rename = "contextBytes")]
    pub context_bytes: usize,
}

impl BuiltPrompt {
    /// Create a new built prompt.
    pub fn new(
        user: String,
        language: PromptLanguage,
        current_date: String,
        context_bytes: usize,
    ) -> Self {
        Self {
            user,
            metadata: BuiltPromptMetadata {
                language,
                current_date,
                context_bytes,
            },
        }
    }
}
