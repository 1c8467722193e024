//! Search data types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One search hit.
///
/// Only `summary` feeds the prompt. The remaining fields are kept so
/// callers can show which page a citation index points to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebPage {
    /// Page title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Page URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Short snippet from the search engine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,

    /// Long-form summary; empty when the service omits it
    pub summary: String,

    /// Site display name
    #[serde(rename = "siteName", skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,

    /// Publication date as reported by the service
    #[serde(rename = "datePublished", skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
}

impl WebPage {
    /// Create a page carrying only a summary.
    pub fn with_summary(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..Default::default()
        }
    }
}

/// A hit as it appears on the wire; every field may be absent or null.
///
/// `summary` must be a string when present. Display-only fields of any
/// other JSON type are dropped.
#[derive(Debug, Deserialize)]
pub(crate) struct RawWebPage {
    #[serde(default, deserialize_with = "string_or_none")]
    name: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    url: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    snippet: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default, rename = "siteName", deserialize_with = "string_or_none")]
    site_name: Option<String>,
    #[serde(default, rename = "datePublished", deserialize_with = "string_or_none")]
    date_published: Option<String>,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

impl From<RawWebPage> for WebPage {
    fn from(raw: RawWebPage) -> Self {
        Self {
            name: raw.name,
            url: raw.url,
            snippet: raw.snippet,
            summary: raw.summary.unwrap_or_default(),
            site_name: raw.site_name,
            date_published: raw.date_published,
        }
    }
}

/// Search request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub summary: bool,
    pub count: u32,
    pub page: u32,
}
