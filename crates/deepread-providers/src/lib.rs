//! deepread-providers
//!
//! Upstream language-model adapters and web search. Each adapter converts
//! the shared [`ChatMessage`] list into its vendor's request format; requests
//! are bounded by the configured timeout and never retried.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use deepread_core::config::ProviderSettings;

pub mod anthropic;
pub mod gemini;
pub mod openai;
pub mod web_search;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use web_search::{SearchResult, WebSearch};

/// Returned when an upstream reply has no answer text.
pub const NO_RESPONSE: &str = "No response";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0} API key is not configured")]
    MissingApiKey(&'static str),

    #[error("{provider} request failed with status {status}: {message}")]
    Upstream { provider: &'static str, status: u16, message: String },

    #[error("{provider} does not support {feature}")]
    Unsupported { provider: &'static str, feature: &'static str },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }

    pub fn system(content: impl Into<String>) -> Self { Self::new(Role::System, content) }

    pub fn user(content: impl Into<String>) -> Self { Self::new(Role::User, content) }
}

/// Trait implemented by concrete LLM providers.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError>;

    /// Single prompt with an optional base64 image. Text-only providers
    /// answer plain prompts and refuse images.
    async fn describe_image(&self, prompt: &str, image: Option<&str>) -> Result<String, ProviderError> {
        if image.is_some() {
            return Err(ProviderError::Unsupported { provider: self.name(), feature: "image input" });
        }
        self.complete(&[ChatMessage::user(prompt)]).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Gemini,
}

impl ProviderKind {
    /// Unknown or absent names fall through to Gemini.
    pub fn from_model(model: Option<&str>) -> Self {
        match model.map(str::trim) {
            Some("openai") => Self::OpenAi,
            Some("anthropic") => Self::Anthropic,
            _ => Self::Gemini,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Gemini => "Gemini",
        }
    }
}

/// The configured providers, keyed by kind. A provider without an API key is
/// absent and requests for it fail with `MissingApiKey`.
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    openai: Option<Arc<dyn ChatProvider>>,
    anthropic: Option<Arc<dyn ChatProvider>>,
    gemini: Option<Arc<dyn ChatProvider>>,
}

impl ProviderRegistry {
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, ProviderError> {
        let timeout = Duration::from_secs(settings.timeout_secs.max(1));
        let mut registry = Self::default();
        if let Some(key) = configured(&settings.openai_api_key) {
            let p = OpenAiProvider::new(key, &settings.openai_base_url, &settings.openai_model, settings.max_tokens, timeout)?;
            registry = registry.with_provider(ProviderKind::OpenAi, Arc::new(p));
        }
        if let Some(key) = configured(&settings.anthropic_api_key) {
            let p = AnthropicProvider::new(key, &settings.anthropic_base_url, &settings.anthropic_model, settings.max_tokens, timeout)?;
            registry = registry.with_provider(ProviderKind::Anthropic, Arc::new(p));
        }
        if let Some(key) = configured(&settings.gemini_api_key) {
            let p = GeminiProvider::new(key, &settings.gemini_base_url, &settings.gemini_model, timeout)?;
            registry = registry.with_provider(ProviderKind::Gemini, Arc::new(p));
        }
        Ok(registry)
    }

    pub fn with_provider(mut self, kind: ProviderKind, provider: Arc<dyn ChatProvider>) -> Self {
        match kind {
            ProviderKind::OpenAi => self.openai = Some(provider),
            ProviderKind::Anthropic => self.anthropic = Some(provider),
            ProviderKind::Gemini => self.gemini = Some(provider),
        }
        self
    }

    pub fn resolve(&self, model: Option<&str>) -> Result<Arc<dyn ChatProvider>, ProviderError> {
        let kind = ProviderKind::from_model(model);
        let slot = match kind {
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Anthropic => &self.anthropic,
            ProviderKind::Gemini => &self.gemini,
        };
        slot.clone().ok_or(ProviderError::MissingApiKey(kind.label()))
    }

    /// `(label, configured)` for every known provider.
    pub fn status(&self) -> [(&'static str, bool); 3] {
        [
            (ProviderKind::Gemini.label(), self.gemini.is_some()),
            (ProviderKind::OpenAi.label(), self.openai.is_some()),
            (ProviderKind::Anthropic.label(), self.anthropic.is_some()),
        ]
    }
}

fn configured(key: &Option<String>) -> Option<&str> {
    key.as_deref().map(str::trim).filter(|k| !k.is_empty())
}

/// Reads a failed upstream response into a `ProviderError::Upstream`.
pub(crate) async fn upstream_error(provider: &'static str, resp: reqwest::Response) -> ProviderError {
    let status = resp.status().as_u16();
    let message = resp.text().await.unwrap_or_else(|_| "<body unavailable>".to_string());
    tracing::warn!(provider, status, "upstream request failed");
    ProviderError::Upstream { provider, status, message }
}
