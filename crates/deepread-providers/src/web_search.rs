use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use deepread_core::config::SearchSettings;

use crate::ProviderError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

/// Google Custom Search client. Without credentials it answers with a fixed
/// pair of placeholder results instead of failing.
#[derive(Clone)]
pub struct WebSearch {
    credentials: Option<(String, String)>,
    base_url: String,
    client: Client,
}

impl WebSearch {
    pub fn from_settings(settings: &SearchSettings) -> Result<Self, ProviderError> {
        let key = settings.google_api_key.as_deref().map(str::trim).filter(|k| !k.is_empty());
        let cx = settings.google_cx.as_deref().map(str::trim).filter(|c| !c.is_empty());
        let credentials = key.zip(cx).map(|(k, c)| (k.to_string(), c.to_string()));
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .build()?;
        Ok(Self { credentials, base_url: settings.base_url.clone(), client })
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ProviderError> {
        let Some((key, cx)) = &self.credentials else {
            debug!("web search credentials missing, returning placeholder results");
            return Ok(placeholder_results());
        };

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("key", key.as_str()), ("cx", cx.as_str()), ("q", query)])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            // Error pages are not always JSON.
            let body = resp.json::<SearchResponse>().await.ok();
            let message = failure_message(body);
            warn!(status = status.as_u16(), %message, "web search failed");
            return Err(ProviderError::Upstream { provider: "google-search", status: status.as_u16(), message });
        }
        let body: SearchResponse = resp.json().await?;
        Ok(body.items)
    }
}

/// Upstream `error.message`, or `Search failed` when the body has none.
fn failure_message(body: Option<SearchResponse>) -> String {
    body.and_then(|b| b.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| "Search failed".to_string())
}

pub fn placeholder_results() -> Vec<SearchResult> {
    vec![
        SearchResult {
            title: "Mock Search Result 1".to_string(),
            link: "http://example.com".to_string(),
            snippet: "This is a mock search result because API keys are not configured.".to_string(),
        },
        SearchResult {
            title: "Mock Search Result 2".to_string(),
            link: "http://example.com".to_string(),
            snippet: "Configure GOOGLE_SEARCH_API_KEY and GOOGLE_SEARCH_CX to enable real search.".to_string(),
        },
    ]
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchResult>,
    #[serde(default)]
    error: Option<SearchFailure>,
}

#[derive(Debug, Deserialize)]
struct SearchFailure {
    #[serde(default)]
    message: Option<String>,
}
