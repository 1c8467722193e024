//! RAG (Retrieval-Augmented Generation) answering.
//!
//! Chains search, context formatting, prompt rendering, model dispatch and
//! response normalization into one linear run.

pub mod pipeline;
pub mod types;

pub use pipeline::{prepare, retrieve, AnswerPipeline};
pub use types::{PreparedPrompt, RagAnswer, Retrieval, SourceRef};
