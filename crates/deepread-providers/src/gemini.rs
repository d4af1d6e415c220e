use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{upstream_error, ChatMessage, ChatProvider, ProviderError, Role, NO_RESPONSE};

const IMAGE_MIME_TYPE: &str = "image/jpeg";

pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    model: String,
    client: Client,
}

impl GeminiProvider {
    pub fn new(api_key: &str, base_url: &str, model: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
        })
    }

    async fn generate(&self, body: &GenerateRequest) -> Result<String, ProviderError> {
        debug!(messages = body.contents.len(), "gemini request");
        let resp = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, self.model))
            .query(&[("key", self.api_key.trim())])
            .json(body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(upstream_error("gemini", resp).await);
        }
        let parsed: GenerateResponse = resp.json().await?;
        Ok(extract_answer(&parsed))
    }
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        self.generate(&build_request(messages)).await
    }

    async fn describe_image(&self, prompt: &str, image: Option<&str>) -> Result<String, ProviderError> {
        self.generate(&build_vision_request(prompt, image)).await
    }
}

/// Gemini has no system role: every system message is joined and prepended
/// to the first non-system message when that message comes from the user.
/// `assistant` becomes `model`.
pub fn build_request(messages: &[ChatMessage]) -> GenerateRequest {
    let system = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    let contents = messages
        .iter()
        .filter(|m| m.role != Role::System)
        .enumerate()
        .map(|(index, m)| {
            let text = if index == 0 && m.role == Role::User && !system.is_empty() {
                format!("{}\n\nUser question: {}", system, m.content)
            } else {
                m.content.clone()
            };
            Content {
                role: Some(if m.role == Role::Assistant { "model" } else { "user" }),
                parts: vec![RequestPart::Text { text }],
            }
        })
        .collect();
    GenerateRequest { contents }
}

/// One prompt, optionally followed by an inline image. Accepts either raw
/// base64 or a `data:<mime>;base64,<payload>` URL.
pub fn build_vision_request(prompt: &str, image: Option<&str>) -> GenerateRequest {
    let mut parts = vec![RequestPart::Text { text: prompt.to_string() }];
    if let Some(image) = image.filter(|i| !i.is_empty()) {
        parts.push(RequestPart::Image {
            inline_data: InlineData { mime_type: IMAGE_MIME_TYPE, data: strip_data_url(image).to_string() },
        });
    }
    GenerateRequest { contents: vec![Content { role: None, parts }] }
}

/// Drops everything up to and including `base64,`.
pub fn strip_data_url(image: &str) -> &str {
    image.split_once("base64,").map_or(image, |(_, data)| data)
}

pub fn extract_answer(resp: &GenerateResponse) -> String {
    resp.candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .and_then(|content| content.parts.first())
        .map(|part| part.text.clone())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| NO_RESPONSE.to_string())
}

#[derive(Debug, Serialize)]
pub struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text { text: String },
    Image { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: &'static str,
    data: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}
