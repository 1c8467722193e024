//! RAG response types.

use crate::types::WebPage;
use serde::{Deserialize, Serialize};
use websage_llm::{LlmUsage, ModelResponse, ModelVariant};
use websage_prompt::BuiltPrompt;

/// The page behind a citation index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Citation index as used in `[citation:X]`
    pub index: usize,

    /// Page title, if the search service reported one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Page URL, if the search service reported one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SourceRef {
    /// Number pages 1..N in search order.
    pub fn from_pages(pages: &[WebPage]) -> Vec<Self> {
        pages
            .iter()
            .enumerate()
            .map(|(i, page)| Self {
                index: i + 1,
                title: page.name.clone(),
                url: page.url.clone(),
            })
            .collect()
    }
}

/// Output of the retrieval stages: the hits and their formatted context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retrieval {
    pub pages: Vec<WebPage>,
    pub context: String,
}

/// Output of the first three stages, before any model call.
#[derive(Debug, Clone)]
pub struct PreparedPrompt {
    pub retrieval: Retrieval,
    pub prompt: BuiltPrompt,
}

/// A citation-annotated answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagAnswer {
    /// The query as asked
    pub query: String,

    /// Normalized model output
    pub response: ModelResponse,

    /// Pages in citation order
    pub sources: Vec<SourceRef>,

    /// Variant that was requested
    pub variant: ModelVariant,

    /// Model that produced the answer
    pub model: String,

    /// Token usage reported by the model service
    pub usage: LlmUsage,
}
