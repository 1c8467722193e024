//! Prompt command handler.
//!
//! Runs search, formatting and prompt rendering, then prints the prompt
//! without contacting the model service.

use clap::Args;
use websage_core::{config::AppConfig, AppError, AppResult};
use websage_search::rag::pipeline::today;
use websage_search::{prepare, HttpSearchClient};

/// Print the exact prompt that would be sent to the model
#[derive(Args, Debug)]
pub struct PromptCommand {
    /// The question to render
    pub query: String,

    /// Date to stamp into the prompt (YYYYMMDD, default: today)
    #[arg(long)]
    pub date: Option<String>,

    /// Output the prompt with its metadata as JSON
    #[arg(long)]
    pub json: bool,
}

impl PromptCommand {
    /// Execute the prompt command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing prompt command");

        config.validate_search()?;
        let client = HttpSearchClient::from_settings(&config.search, config.resolve_search_key()?)?;

        let date = self.date.clone().unwrap_or_else(today);
        let prepared = prepare(&client, &self.query, &date, config.prompt_language).await?;

        if self.json {
            let json = serde_json::to_string_pretty(&prepared.prompt)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
        } else {
            print!("{}", prepared.prompt.user);
        }

        Ok(())
    }
}
