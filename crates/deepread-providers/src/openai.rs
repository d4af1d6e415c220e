use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{upstream_error, ChatMessage, ChatProvider, ProviderError, NO_RESPONSE};

pub struct OpenAiProvider {
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: usize,
    client: Client,
}

impl OpenAiProvider {
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
impl ChatProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", self.api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth).map_err(|_| ProviderError::MissingApiKey("OpenAI"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let body = build_request(&self.model, self.max_tokens, messages);
        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .headers(headers)
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(upstream_error("openai", resp).await);
        }
        let parsed: ChatResponse = resp.json().await?;
        Ok(extract_answer(&parsed))
    }
}

/// Messages are forwarded as-is; OpenAI accepts the system role natively.
pub fn build_request<'a>(model: &'a str, max_tokens: usize, messages: &'a [ChatMessage]) -> ChatRequest<'a> {
    ChatRequest { model, max_tokens, messages }
}

pub fn extract_answer(resp: &ChatResponse) -> String {
    resp.choices
        .first()
        .and_then(|c| c.message.content.clone())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| NO_RESPONSE.to_string())
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: usize,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}
