//! Web search and citation-annotated answering.
//!
//! This crate runs the retrieval half of websage (search call and context
//! formatting) and the orchestration that feeds it through the prompt
//! builder and the model gateway.

pub mod client;
pub mod format;
pub mod rag;
pub mod types;

// Re-export commonly used types
pub use client::{HttpSearchClient, SearchClient, SEARCH_PAGE, SEARCH_PAGE_SIZE};
pub use format::format_webpages;
pub use rag::{prepare, retrieve, AnswerPipeline, PreparedPrompt, RagAnswer, Retrieval, SourceRef};
pub use types::{SearchRequest, WebPage};
