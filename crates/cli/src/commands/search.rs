//! Search command handler.
//!
//! Runs only the search stage and prints the citation context block.

use clap::Args;
use websage_core::{config::AppConfig, AppError, AppResult};
use websage_search::{retrieve, HttpSearchClient};

/// Run only the web search and print the citation context
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// The search query
    pub query: String,

    /// Print the raw hits as JSON instead of the context block
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    /// Execute the search command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing search command");

        config.validate_search()?;
        let client = HttpSearchClient::from_settings(&config.search, config.resolve_search_key()?)?;
        let retrieval = retrieve(&client, &self.query).await?;

        if self.json {
            let json = serde_json::to_string_pretty(&retrieval.pages)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
        } else {
            println!("{}", retrieval.context);
        }

        Ok(())
    }
}
