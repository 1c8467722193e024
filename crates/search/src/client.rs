//! Web search client.
//!
//! The search service takes a JSON POST and answers with an envelope of
//! the form `{"code": .., "msg": .., "data": {"webPages": {"value": [..]}}}`.

use crate::types::{RawWebPage, SearchRequest, WebPage};
use serde_json::Value;
use std::time::Duration;
use websage_core::{AppError, AppResult, SearchSettings};

/// Hits requested per search.
pub const SEARCH_PAGE_SIZE: u32 = 10;

/// Result page requested per search.
pub const SEARCH_PAGE: u32 = 1;

/// Trait for web search services.
#[async_trait::async_trait]
pub trait SearchClient: Send + Sync {
    /// Get the provider name.
    fn provider_name(&self) -> &str;

    /// Run one search and return the hits in relevance order.
    ///
    /// An empty list is a valid result.
    async fn search(&self, query: &str) -> AppResult<Vec<WebPage>>;
}

/// HTTP search client with bearer-token auth.
pub struct HttpSearchClient {
    /// Full URL of the search endpoint
    endpoint: String,

    /// Bearer token
    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpSearchClient {
    /// Create a client from search settings and a resolved API key.
    pub fn from_settings(settings: &SearchSettings, api_key: impl Into<String>) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = settings.timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build search HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: settings.endpoint.clone(),
            api_key: api_key.into(),
            client,
        })
    }

    fn build_request(query: &str) -> SearchRequest {
        SearchRequest {
            query: query.to_string(),
            summary: true,
            count: SEARCH_PAGE_SIZE,
            page: SEARCH_PAGE,
        }
    }
}

#[async_trait::async_trait]
impl SearchClient for HttpSearchClient {
    fn provider_name(&self) -> &str {
        "http"
    }

    async fn search(&self, query: &str) -> AppResult<Vec<WebPage>> {
        tracing::info!("Searching the web for: {}", query);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&Self::build_request(query))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::SearchUnavailable(format!("Search request timed out: {}", e))
                } else {
                    AppError::SearchUnavailable(format!("Failed to reach search service: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::SearchUnavailable(format!(
                "Search API error ({}): {}",
                status, error_text
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::SearchUnavailable(format!("Failed to read search response: {}", e)))?;

        let pages = parse_search_response(&body)?;

        tracing::info!("Search returned {} pages", pages.len());

        Ok(pages)
    }
}

/// Extract `data.webPages.value` from a response body.
///
/// Individual hits may omit any field, and display fields of the wrong type
/// are dropped. The envelope itself may not be malformed: a missing level,
/// a `value` that is not an array, a hit that is not an object or a
/// non-string `summary` is rejected.
pub fn parse_search_response(body: &str) -> AppResult<Vec<WebPage>> {
    let envelope: Value = serde_json::from_str(body).map_err(|e| {
        AppError::SearchResponseInvalid(format!("Search response is not JSON: {}", e))
    })?;

    let hits = envelope
        .get("data")
        .and_then(|data| data.get("webPages"))
        .and_then(|web_pages| web_pages.get("value"))
        .ok_or_else(|| {
            let detail = envelope
                .get("msg")
                .and_then(Value::as_str)
                .map(|msg| format!(" (service said: {})", msg))
                .unwrap_or_default();
            AppError::SearchResponseInvalid(format!(
                "Search response lacks data.webPages.value{}",
                detail
            ))
        })?
        .as_array()
        .ok_or_else(|| {
            AppError::SearchResponseInvalid("data.webPages.value is not an array".to_string())
        })?;

    hits.iter()
        .enumerate()
        .map(|(i, hit)| {
            if !hit.is_object() {
                return Err(AppError::SearchResponseInvalid(format!(
                    "Search hit {} is not an object",
                    i
                )));
            }
            serde_json::from_value::<RawWebPage>(hit.clone())
                .map(WebPage::from)
                .map_err(|e| {
                    AppError::SearchResponseInvalid(format!("Malformed search hit {}: {}", i, e))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(endpoint: String, timeout: Option<u64>) -> SearchSettings {
        SearchSettings {
            endpoint,
            timeout,
            ..SearchSettings::default()
        }
    }

    fn envelope(summaries: &[&str]) -> Value {
        let hits: Vec<Value> = summaries
            .iter()
            .enumerate()
            .map(|(i, s)| {
                serde_json::json!({
                    "name": format!("Page {}", i + 1),
                    "url": format!("https://example.com/{}", i + 1),
                    "summary": s
                })
            })
            .collect();
        serde_json::json!({
            "code": 200,
            "msg": null,
            "data": {"_type": "SearchResponse", "webPages": {"value": hits}}
        })
    }

    #[test]
    fn test_parse_keeps_order() {
        let pages = parse_search_response(&envelope(&["A", "B"]).to_string()).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].summary, "A");
        assert_eq!(pages[1].summary, "B");
        assert_eq!(pages[1].url.as_deref(), Some("https://example.com/2"));
    }

    #[test]
    fn test_parse_empty_hits() {
        let pages = parse_search_response(&envelope(&[]).to_string()).unwrap();
        assert!(pages.is_empty());
    }

    #[test]
    fn test_parse_hit_without_summary() {
        let body = r#"{"data": {"webPages": {"value": [{"name": "only a title"}]}}}"#;
        let pages = parse_search_response(body).unwrap();
        assert_eq!(pages[0].summary, "");
    }

    #[test]
    fn test_parse_missing_envelope() {
        for body in [
            r#"{}"#,
            r#"{"data": null}"#,
            r#"{"data": {}}"#,
            r#"{"data": {"webPages": {}}}"#,
            r#"{"code": 401, "msg": "invalid key", "data": null}"#,
        ] {
            let result = parse_search_response(body);
            assert!(
                matches!(result, Err(AppError::SearchResponseInvalid(_))),
                "{}",
                body
            );
        }
    }

    #[test]
    fn test_parse_tolerates_odd_display_field() {
        let body = r#"{"data":{"webPages":{"value":[{"summary":"A","name":123},{"summary":"B"}]}}}"#;
        let pages = parse_search_response(body).unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].summary, "A");
        assert_eq!(pages[0].name, None);
        assert_eq!(pages[1].summary, "B");
    }

    #[test]
    fn test_parse_wrong_types() {
        for body in [
            r#"{"data": {"webPages": {"value": "nope"}}}"#,
            r#"{"data": {"webPages": {"value": {"summary": "x"}}}}"#,
            r#"{"data": {"webPages": {"value": ["x"]}}}"#,
            r#"{"data": {"webPages": {"value": [{"summary": 5}]}}}"#,
            "not json",
        ] {
            let result = parse_search_response(body);
            assert!(
                matches!(result, Err(AppError::SearchResponseInvalid(_))),
                "{}",
                body
            );
        }
    }

    #[tokio::test]
    async fn test_search_request_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/web-search"))
            .and(header("authorization", "Bearer search-key"))
            .and(body_json(serde_json::json!({
                "query": "test",
                "summary": true,
                "count": 10,
                "page": 1
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(&["A", "B"])))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpSearchClient::from_settings(
            &settings(format!("{}/v1/web-search", server.uri()), None),
            "search-key",
        )
        .unwrap();
        let pages = client.search("test").await.unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].name.as_deref(), Some("Page 1"));
    }

    #[tokio::test]
    async fn test_search_server_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client = HttpSearchClient::from_settings(&settings(server.uri(), None), "k").unwrap();
        let result = client.search("test").await;
        assert!(matches!(result, Err(AppError::SearchUnavailable(_))));
    }

    #[tokio::test]
    async fn test_search_timeout_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(envelope(&["late"]))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = HttpSearchClient::from_settings(&settings(server.uri(), Some(1)), "k").unwrap();
        let result = client.search("test").await;
        assert!(matches!(result, Err(AppError::SearchUnavailable(_))));
    }

    #[tokio::test]
    async fn test_search_connection_refused_is_unavailable() {
        let uri = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            format!("http://{}", listener.local_addr().unwrap())
        };

        let client = HttpSearchClient::from_settings(&settings(uri, None), "k").unwrap();
        let result = client.search("test").await;
        assert!(matches!(result, Err(AppError::SearchUnavailable(_))));
    }
}
