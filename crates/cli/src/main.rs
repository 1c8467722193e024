//! websage CLI
//!
//! Main entry point for the websage command-line tool.
//! Answers questions from fresh web search results, with citations.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, PromptCommand, SearchCommand};
use std::path::PathBuf;
use websage_core::{config::AppConfig, logging, AppResult, PromptLanguage};

/// websage - search-grounded answers with citations
#[derive(Parser, Debug)]
#[command(name = "websage")]
#[command(about = "Search-grounded answers with citations", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "WEBSAGE_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "WEBSAGE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Prompt template language (zh, en)
    #[arg(short, long, global = true, value_parser = parse_language)]
    language: Option<PromptLanguage>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a question from web search results
    Ask(AskCommand),

    /// Run only the web search and print the citation context
    Search(SearchCommand),

    /// Print the exact prompt that would be sent to the model
    Prompt(PromptCommand),
}

fn parse_language(s: &str) -> Result<PromptLanguage, String> {
    PromptLanguage::parse(s).ok_or_else(|| format!("Unknown language: {}. Supported: zh, en", s))
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_with(cli.workspace, cli.config)?.with_overrides(
        cli.language,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("websage starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Search endpoint: {}", config.search.endpoint);
    tracing::debug!("Model endpoint: {}", config.model.endpoint);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Search(_) => "search",
        Commands::Prompt(_) => "prompt",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Search(cmd) => cmd.execute(&config).await,
        Commands::Prompt(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
