//! Model provider implementations.

pub mod openai;

pub use openai::ChatCompletionsClient;
