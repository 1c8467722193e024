//! RAG answering orchestration.
//!
//! A run is strictly linear: search, format, build, generate, normalize.
//! The first failing stage ends the run and its error is returned as is;
//! later stages never start and no partial result is produced.

use crate::client::{HttpSearchClient, SearchClient};
use crate::format::format_webpages;
use crate::rag::types::{PreparedPrompt, RagAnswer, Retrieval, SourceRef};
use chrono::Local;
use std::sync::Arc;
use websage_core::{AppConfig, AppError, AppResult, PromptLanguage};
use websage_llm::{normalize, ChatCompletionsClient, ModelGateway, ModelVariant};
use websage_prompt::{build_prompt, format_date};

/// Search-grounded answering over a search client and a model gateway.
///
/// Both collaborators are shared read-only, so one pipeline may serve
/// concurrent runs.
#[derive(Clone)]
pub struct AnswerPipeline {
    search: Arc<dyn SearchClient>,
    gateway: Arc<dyn ModelGateway>,
    language: PromptLanguage,
}

impl AnswerPipeline {
    /// Create a pipeline from explicit collaborators.
    pub fn new(
        search: Arc<dyn SearchClient>,
        gateway: Arc<dyn ModelGateway>,
        language: PromptLanguage,
    ) -> Self {
        Self {
            search,
            gateway,
            language,
        }
    }

    /// Create the HTTP-backed pipeline described by `config`.
    ///
    /// API keys are resolved here, once, from the environment variables the
    /// configuration names.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let search = HttpSearchClient::from_settings(&config.search, config.resolve_search_key()?)?;
        let gateway =
            ChatCompletionsClient::from_settings(&config.model, config.resolve_model_key()?)?;

        tracing::debug!(
            "Pipeline ready (search: {}, model: {}, language: {})",
            config.search.endpoint,
            config.model.endpoint,
            config.prompt_language.as_str()
        );

        Ok(Self::new(
            Arc::new(search),
            Arc::new(gateway),
            config.prompt_language,
        ))
    }

    /// Template language used by this pipeline.
    pub fn language(&self) -> PromptLanguage {
        self.language
    }

    /// Run the search and format its hits.
    pub async fn retrieve(&self, query: &str) -> AppResult<Retrieval> {
        retrieve(self.search.as_ref(), query).await
    }

    /// Run every stage up to and including prompt rendering.
    pub async fn prepare(&self, query: &str, date: &str) -> AppResult<PreparedPrompt> {
        prepare(self.search.as_ref(), query, date, self.language).await
    }

    /// Answer `query` with the given variant, stamping the prompt with `date`.
    pub async fn answer(
        &self,
        query: &str,
        variant: ModelVariant,
        date: &str,
    ) -> AppResult<RagAnswer> {
        tracing::info!("Answering with {} model: {}", variant, query);

        let PreparedPrompt { retrieval, prompt } = self.prepare(query, date).await?;

        let payload = self.gateway.generate(&prompt.user, variant).await?;
        let model = payload.model.clone();
        let usage = payload.usage;
        let response = normalize(payload, variant)?;

        tracing::info!(
            "Answer ready ({} sources, {} tokens)",
            retrieval.pages.len(),
            usage.total_tokens
        );

        Ok(RagAnswer {
            query: query.to_string(),
            response,
            sources: SourceRef::from_pages(&retrieval.pages),
            variant,
            model,
            usage,
        })
    }

    /// Answer `query`, dated with the local calendar day.
    pub async fn answer_today(&self, query: &str, variant: ModelVariant) -> AppResult<RagAnswer> {
        self.answer(query, variant, &today()).await
    }
}

/// Search for `query` and format the hits into a citation context.
///
/// Needs no model gateway, so search-only callers can run it with just a
/// search client.
pub async fn retrieve(search: &dyn SearchClient, query: &str) -> AppResult<Retrieval> {
    validate_query(query)?;

    let pages = search.search(query).await?;
    let context = format_webpages(&pages);

    tracing::debug!(
        "Formatted {} pages into {} bytes of context",
        pages.len(),
        context.len()
    );

    Ok(Retrieval { pages, context })
}

/// [`retrieve`], then render the answer prompt.
pub async fn prepare(
    search: &dyn SearchClient,
    query: &str,
    date: &str,
    language: PromptLanguage,
) -> AppResult<PreparedPrompt> {
    let retrieval = retrieve(search, query).await?;
    let prompt = build_prompt(query, &retrieval.context, date, language)?;

    Ok(PreparedPrompt { retrieval, prompt })
}

/// Today's local date as `YYYYMMDD`.
pub fn today() -> String {
    format_date(Local::now().date_naive())
}

fn validate_query(query: &str) -> AppResult<()> {
    if query.trim().is_empty() {
        return Err(AppError::Other("Query must not be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WebPage;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use websage_core::SearchSettings;
    use websage_llm::{LlmUsage, ModelResponse, RawModelPayload};

    /// Search client returning canned pages, or failing.
    struct MockSearch {
        pages: Vec<WebPage>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl MockSearch {
        fn with_summaries(summaries: &[&str]) -> Self {
            Self {
                pages: summaries.iter().map(|s| WebPage::with_summary(*s)).collect(),
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                pages: Vec::new(),
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl SearchClient for MockSearch {
        fn provider_name(&self) -> &str {
            "mock"
        }

        async fn search(&self, _query: &str) -> AppResult<Vec<WebPage>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AppError::SearchUnavailable("mock outage".to_string()));
            }
            Ok(self.pages.clone())
        }
    }

    /// Model gateway returning a canned payload and recording prompts.
    struct MockGateway {
        content: Option<String>,
        reasoning: Option<String>,
        prompts: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl MockGateway {
        fn new(content: Option<&str>, reasoning: Option<&str>) -> Self {
            Self {
                content: content.map(str::to_string),
                reasoning: reasoning.map(str::to_string),
                prompts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl ModelGateway for MockGateway {
        fn provider_name(&self) -> &str {
            "mock"
        }

        fn model_for(&self, variant: ModelVariant) -> &str {
            match variant {
                ModelVariant::Standard => "mock-chat",
                ModelVariant::Reasoning => "mock-reasoner",
            }
        }

        async fn generate(
            &self,
            prompt: &str,
            variant: ModelVariant,
        ) -> AppResult<RawModelPayload> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(RawModelPayload {
                model: self.model_for(variant).to_string(),
                content: self.content.clone(),
                reasoning_content: self.reasoning.clone(),
                usage: LlmUsage::new(100, 20),
            })
        }
    }

    fn pipeline(search: Arc<MockSearch>, gateway: Arc<MockGateway>) -> AnswerPipeline {
        AnswerPipeline::new(search, gateway, PromptLanguage::En)
    }

    #[tokio::test]
    async fn test_standard_answer_end_to_end() {
        let search = Arc::new(MockSearch::with_summaries(&["A", "B"]));
        let gateway = Arc::new(MockGateway::new(Some("It is A [citation:1]"), None));
        let pipeline = pipeline(search.clone(), gateway.clone());

        let answer = pipeline
            .answer("test", ModelVariant::Standard, "20250101")
            .await
            .unwrap();

        assert_eq!(
            answer.response,
            ModelResponse::Simple {
                answer: "It is A [citation:1]".to_string()
            }
        );
        assert_eq!(answer.model, "mock-chat");
        assert_eq!(answer.usage.total_tokens, 120);
        assert_eq!(answer.sources.len(), 2);

        let prompts = gateway.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0]
            .contains("[webpage 1 begin]A[webpage 1 end]\n[webpage 2 begin]B[webpage 2 end]"));
        assert!(prompts[0].contains("Today is 20250101."));
        assert!(prompts[0].ends_with("test\n"));
    }

    #[tokio::test]
    async fn test_reasoning_answer_end_to_end() {
        let search = Arc::new(MockSearch::with_summaries(&["A"]));
        let gateway = Arc::new(MockGateway::new(Some("answer"), Some("thinking")));
        let pipeline = pipeline(search, gateway);

        let answer = pipeline
            .answer("test", ModelVariant::Reasoning, "20250101")
            .await
            .unwrap();

        assert_eq!(answer.response.reasoning(), Some("thinking"));
        assert_eq!(answer.response.answer(), "answer");
        assert_eq!(answer.variant, ModelVariant::Reasoning);
        assert_eq!(answer.model, "mock-reasoner");
    }

    #[tokio::test]
    async fn test_zero_hits_still_answers() {
        let search = Arc::new(MockSearch::with_summaries(&[]));
        let gateway = Arc::new(MockGateway::new(Some("no sources"), None));
        let pipeline = pipeline(search, gateway.clone());

        let answer = pipeline
            .answer("test", ModelVariant::Standard, "20250101")
            .await
            .unwrap();

        assert!(answer.sources.is_empty());
        let prompts = gateway.prompts.lock().unwrap();
        assert!(prompts[0].contains("user's message:\n\nIn the search results"));
        assert!(prompts[0].ends_with("test\n"));
    }

    #[tokio::test]
    async fn test_missing_reasoning_fails_invalid() {
        let search = Arc::new(MockSearch::with_summaries(&["A"]));
        let gateway = Arc::new(MockGateway::new(Some("answer"), None));
        let pipeline = pipeline(search, gateway);

        let result = pipeline
            .answer("test", ModelVariant::Reasoning, "20250101")
            .await;

        assert!(matches!(result, Err(AppError::ModelResponseInvalid(_))));
    }

    #[tokio::test]
    async fn test_search_failure_stops_before_model() {
        let search = Arc::new(MockSearch::failing());
        let gateway = Arc::new(MockGateway::new(Some("unused"), None));
        let pipeline = pipeline(search.clone(), gateway.clone());

        let result = pipeline
            .answer("test", ModelVariant::Standard, "20250101")
            .await;

        assert!(matches!(result, Err(AppError::SearchUnavailable(_))));
        assert_eq!(search.calls.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_search_timeout_stops_before_model() {
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": {"webPages": {"value": []}}}))
                    .set_delay(std::time::Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let settings = SearchSettings {
            endpoint: server.uri(),
            timeout: Some(1),
            ..SearchSettings::default()
        };
        let search = Arc::new(HttpSearchClient::from_settings(&settings, "k").unwrap());
        let gateway = Arc::new(MockGateway::new(Some("unused"), Some("unused")));
        let pipeline = AnswerPipeline::new(search, gateway.clone(), PromptLanguage::Zh);

        let result = pipeline
            .answer("test", ModelVariant::Reasoning, "20250101")
            .await;

        assert!(matches!(result, Err(AppError::SearchUnavailable(_))));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_date_stops_before_model() {
        let search = Arc::new(MockSearch::with_summaries(&["A"]));
        let gateway = Arc::new(MockGateway::new(Some("unused"), None));
        let pipeline = pipeline(search, gateway.clone());

        let result = pipeline
            .answer("test", ModelVariant::Standard, "2025-01-01")
            .await;

        assert!(matches!(result, Err(AppError::Prompt(_))));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_query_rejected_before_search() {
        let search = Arc::new(MockSearch::with_summaries(&["A"]));
        let gateway = Arc::new(MockGateway::new(Some("unused"), None));
        let pipeline = pipeline(search.clone(), gateway);

        let result = pipeline.retrieve("   ").await;

        assert!(result.is_err());
        assert_eq!(search.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_prepare_makes_no_model_call() {
        let search = Arc::new(MockSearch::with_summaries(&["A", "B"]));
        let gateway = Arc::new(MockGateway::new(Some("unused"), None));
        let pipeline = pipeline(search, gateway.clone());

        let prepared = pipeline.prepare("test", "20250101").await.unwrap();

        assert_eq!(prepared.retrieval.pages.len(), 2);
        assert_eq!(prepared.prompt.metadata.current_date, "20250101");
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_free_retrieve_rejects_blank_query() {
        let search = MockSearch::with_summaries(&["A"]);

        let result = retrieve(&search, " \t\n").await;

        assert!(matches!(result, Err(AppError::Other(_))));
        assert_eq!(search.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_free_prepare_without_gateway() {
        let search = MockSearch::with_summaries(&["A", "B"]);

        let prepared = prepare(&search, "test", "20250101", PromptLanguage::En)
            .await
            .unwrap();

        assert_eq!(
            prepared.retrieval.context,
            "[webpage 1 begin]A[webpage 1 end]\n[webpage 2 begin]B[webpage 2 end]"
        );
        assert!(prepared.prompt.user.ends_with("test\n"));
        assert_eq!(search.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_runs_share_pipeline() {
        let search = Arc::new(MockSearch::with_summaries(&["A"]));
        let gateway = Arc::new(MockGateway::new(Some("answer"), Some("")));
        let pipeline = pipeline(search.clone(), gateway.clone());

        let (first, second) = tokio::join!(
            pipeline.answer("one", ModelVariant::Reasoning, "20250101"),
            pipeline.answer("two", ModelVariant::Reasoning, "20250101"),
        );

        assert_eq!(first.unwrap().query, "one");
        assert_eq!(second.unwrap().response.reasoning(), Some(""));
        assert_eq!(search.calls.load(Ordering::SeqCst), 2);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_today_format() {
        let date = today();
        assert_eq!(date.len(), 8);
        assert!(date.bytes().all(|b| b.is_ascii_digit()));
    }
}
