use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use deepread_core::types::{IngestRequest, ScoredResult};
use deepread_core::Error;
use deepread_providers::{ChatMessage, Role, SearchResult};
use deepread_rag::{build_context, system_prompt};

use crate::error::ApiJson;
use crate::{ApiError, AppState};

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub status: &'static str,
    pub chunks: usize,
}

#[derive(Debug, Deserialize)]
pub struct QueryBody {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub results: Vec<ScoredResult>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatBody {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub use_documents: bool,
}

#[derive(Debug, Deserialize)]
pub struct VisionBody {
    #[serde(default)]
    pub prompt: Option<String>,
    /// Base64 payload, with or without a `data:` URL prefix.
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

pub async fn index_document(State(state): State<AppState>, ApiJson(request): ApiJson<IngestRequest>) -> ApiResult<IndexResponse> {
    let chunks = state.engine.ingest(request)?;
    Ok(Json(IndexResponse { status: "success", chunks }))
}

pub async fn query_documents(State(state): State<AppState>, ApiJson(body): ApiJson<QueryBody>) -> ApiResult<QueryResponse> {
    let query = required_query(body.query)?;
    let results = state.engine.query(&query)?;
    Ok(Json(QueryResponse { results }))
}

pub async fn clear_documents(State(state): State<AppState>) -> ApiResult<Value> {
    state.engine.clear()?;
    Ok(Json(json!({ "status": "cleared" })))
}

pub async fn web_search(State(state): State<AppState>, ApiJson(body): ApiJson<QueryBody>) -> ApiResult<SearchResponse> {
    let query = required_query(body.query)?;
    let results = state.web_search.search(&query).await?;
    Ok(Json(SearchResponse { results }))
}

pub async fn chat(State(state): State<AppState>, ApiJson(body): ApiJson<ChatBody>) -> ApiResult<ChatResponse> {
    if body.messages.is_empty() {
        return Err(Error::Validation("messages are required".into()).into());
    }
    let provider = state.providers.resolve(body.model.as_deref())?;

    let mut messages = body.messages;
    if body.use_documents {
        let question = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        let results = state.engine.query(&question)?;
        debug!(passages = results.len(), "retrieved chat context");
        let context = build_context(&results);
        messages.insert(0, ChatMessage::system(system_prompt(context.as_deref())));
    }

    info!(provider = provider.name(), messages = messages.len(), "chat request");
    let response = provider.complete(&messages).await?;
    Ok(Json(ChatResponse { response }))
}

/// Prompt plus optional image, always answered by the Gemini provider.
pub async fn vision(State(state): State<AppState>, ApiJson(body): ApiJson<VisionBody>) -> ApiResult<ChatResponse> {
    let prompt = body.prompt.ok_or_else(|| Error::Validation("prompt is required".into()))?;
    let provider = state.providers.resolve(Some("gemini"))?;
    info!(provider = provider.name(), image = body.image.is_some(), "vision request");
    let response = provider.describe_image(&prompt, body.image.as_deref()).await?;
    Ok(Json(ChatResponse { response }))
}

pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    let documents = state.engine.document_count()?;
    let providers: Map<String, Value> = state
        .providers
        .status()
        .into_iter()
        .map(|(label, configured)| (label.to_string(), Value::Bool(configured)))
        .collect();
    Ok(Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "documents": documents,
        "providers": providers,
        "webSearch": state.web_search.is_configured(),
    })))
}

fn required_query(query: Option<String>) -> Result<String, Error> {
    query.ok_or_else(|| Error::Validation("query is required".into()))
}
