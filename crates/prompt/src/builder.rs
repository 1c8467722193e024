//! Prompt builder for rendering the answer template.

use crate::template::{answer_template, VAR_CUR_DATE, VAR_QUESTION, VAR_SEARCH_RESULTS};
use crate::types::BuiltPrompt;
use chrono::NaiveDate;
use handlebars::Handlebars;
use std::collections::HashMap;
use websage_core::{AppError, AppResult, PromptLanguage};

/// Build the answer prompt from a query, a formatted context block and a date.
///
/// The query and context are inserted verbatim: no escaping, no truncation.
/// `date` must already be in `YYYYMMDD` form (see [`format_date`]).
///
/// # Example
/// ```
/// use websage_core::PromptLanguage;
/// use websage_prompt::build_prompt;
///
/// let built = build_prompt(
///     "What is Rust?",
///     "[webpage 1 begin]Rust is a language.[webpage 1 end]",
///     "20250101",
///     PromptLanguage::En,
/// )
/// .unwrap();
/// assert!(built.user.contains("Today is 20250101."));
/// ```
pub fn build_prompt(
    query: &str,
    context: &str,
    date: &str,
    language: PromptLanguage,
) -> AppResult<BuiltPrompt> {
    validate_date(date)?;

    tracing::debug!(
        "Building {} prompt ({} context bytes, date {})",
        language.as_str(),
        context.len(),
        date
    );

    let mut variables = HashMap::new();
    variables.insert(VAR_SEARCH_RESULTS, context);
    variables.insert(VAR_CUR_DATE, date);
    variables.insert(VAR_QUESTION, query);

    let rendered = render_template(answer_template(language), &variables)?;

    Ok(BuiltPrompt::new(
        rendered,
        language,
        date.to_string(),
        context.len(),
    ))
}

/// Format a calendar date as the 8-digit `YYYYMMDD` string the template expects.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

fn validate_date(date: &str) -> AppResult<()> {
    if date.len() == 8 && date.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(AppError::Prompt(format!(
            "Invalid date '{}': expected 8 digits (YYYYMMDD)",
            date
        )))
    }
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<&str, &str>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text, and a missing variable is a bug rather than an empty string
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);

    handlebars
        .register_template_string("answer", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("answer", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}
