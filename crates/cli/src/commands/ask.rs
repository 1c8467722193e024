//! Ask command handler.
//!
//! Runs the full search-and-answer pipeline for one query.

use clap::Args;
use websage_core::{config::AppConfig, AppError, AppResult};
use websage_llm::{ModelResponse, ModelVariant};
use websage_search::{AnswerPipeline, RagAnswer};

/// Width of the section banners in text output.
const BANNER_WIDTH: usize = 40;

/// Answer a question from web search results
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub query: String,

    /// Model variant (chat, reasoner)
    #[arg(long, default_value = "reasoner")]
    pub variant: ModelVariant,

    /// Date to stamp into the prompt (YYYYMMDD, default: today)
    #[arg(long)]
    pub date: Option<String>,

    /// Do not print the reasoning trace
    #[arg(long)]
    pub hide_reasoning: bool,

    /// List the pages behind each citation index
    #[arg(long)]
    pub sources: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        config.validate()?;
        let pipeline = AnswerPipeline::from_config(config)?;

        let answer = match self.date {
            Some(ref date) => pipeline.answer(&self.query, self.variant, date).await?,
            None => pipeline.answer_today(&self.query, self.variant).await?,
        };

        if self.json {
            let json = serde_json::to_string_pretty(&answer)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
        } else {
            print!("{}", self.render_text(&answer));
        }

        tracing::debug!(
            "Token usage - Prompt: {}, Completion: {}, Total: {}",
            answer.usage.prompt_tokens,
            answer.usage.completion_tokens,
            answer.usage.total_tokens
        );

        Ok(())
    }

    /// Render the banner-separated text output.
    ///
    /// The reasoning section appears only for a non-empty trace that is
    /// not hidden. Sources are listed only when requested.
    fn render_text(&self, answer: &RagAnswer) -> String {
        let mut lines = vec![banner("Question"), answer.query.clone()];

        match answer.response {
            ModelResponse::Reasoned {
                ref reasoning,
                ref answer,
            } if !reasoning.is_empty() && !self.hide_reasoning => {
                lines.push(banner("Reasoning"));
                lines.push(reasoning.clone());
                lines.push(String::new());
                lines.push(banner("Answer"));
                lines.push(answer.clone());
            }
            ref response => {
                lines.push(banner("Answer"));
                lines.push(response.answer().to_string());
            }
        }

        if self.sources && !answer.sources.is_empty() {
            lines.push(banner("Sources"));
            for source in &answer.sources {
                lines.push(format!(
                    "[{}] {} {}",
                    source.index,
                    source.title.as_deref().unwrap_or("(untitled)"),
                    source.url.as_deref().unwrap_or("")
                ));
            }
        }

        lines.push("=".repeat(BANNER_WIDTH));

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}

/// Center a section title in a line of `=`.
fn banner(title: &str) -> String {
    format!("{:=^width$}", format!("[{}]", title), width = BANNER_WIDTH)
}
