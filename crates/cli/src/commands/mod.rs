//! Command handlers for the websage CLI.

pub mod ask;
pub mod prompt;
pub mod search;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use prompt::PromptCommand;
pub use search::SearchCommand;
