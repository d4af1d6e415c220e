use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{upstream_error, ChatMessage, ChatProvider, ProviderError, Role, NO_RESPONSE};

const API_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: usize,
    client: Client,
}

impl AnthropicProvider {
    pub fn new(api_key: &str, base_url: &str, model: &str, max_tokens: usize, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            max_tokens,
            client,
        })
    }
}

#[async_trait]
impl ChatProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(self.api_key.trim()).map_err(|_| ProviderError::MissingApiKey("Anthropic"))?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let body = build_request(&self.model, self.max_tokens, messages);
        let resp = self
            .client
            .post(format!("{}/messages", self.base_url))
            .headers(headers)
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(upstream_error("anthropic", resp).await);
        }
        let parsed: MessagesResponse = resp.json().await?;
        Ok(extract_answer(&parsed))
    }
}

/// System messages move to the top-level `system` field; every other
/// non-user role is sent as `assistant`.
pub fn build_request<'a>(model: &'a str, max_tokens: usize, messages: &'a [ChatMessage]) -> MessagesRequest<'a> {
    let system = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    let messages = messages
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| AnthropicMessage {
            role: if m.role == Role::User { "user" } else { "assistant" },
            content: &m.content,
        })
        .collect();
    MessagesRequest { model, max_tokens, system, messages }
}

/// First content block's text, like the browser client expects.
pub fn extract_answer(resp: &MessagesResponse) -> String {
    resp.content
        .first()
        .and_then(|block| block.text.clone())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| NO_RESPONSE.to_string())
}

#[derive(Debug, Serialize)]
pub struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: usize,
    #[serde(skip_serializing_if = "String::is_empty")]
    system: String,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}
