//! deepread-server
//!
//! HTTP surface over the document index, the chat providers and web search.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use deepread_core::config::{ServerSettings, Settings};
use deepread_core::traits::SearchEngine;
use deepread_providers::{ProviderRegistry, WebSearch};
use deepread_rag::DocumentIndex;

pub mod error;
pub mod routes;

pub use error::{ApiError, ApiJson};

const DEFAULT_LOG_FILTER: &str = "deepread=info,tower_http=info";

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn SearchEngine>,
    pub providers: ProviderRegistry,
    pub web_search: WebSearch,
}

impl AppState {
    pub fn new(engine: Arc<dyn SearchEngine>, providers: ProviderRegistry, web_search: WebSearch) -> Self {
        Self { engine, providers, web_search }
    }

    /// In-memory index plus every provider that has an API key.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let engine = DocumentIndex::in_memory(&settings.retrieval).context("building document index")?;
        let providers = ProviderRegistry::from_settings(&settings.providers).context("building chat providers")?;
        let web_search = WebSearch::from_settings(&settings.search).context("building web search client")?;
        Ok(Self::new(Arc::new(engine), providers, web_search))
    }
}

pub fn build_router(state: AppState, server: &ServerSettings) -> Router {
    let api = Router::new()
        .route("/api/rag/index", post(routes::index_document))
        .route("/api/rag/query", post(routes::query_documents))
        .route("/api/rag/clear", post(routes::clear_documents))
        .route("/api/ai/chat", post(routes::chat))
        .route("/api/ai/gemini", post(routes::vision))
        .route("/api/search", post(routes::web_search))
        .route("/api/health", get(routes::health))
        .with_state(state);

    let app = match server.static_dir() {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };

    app.layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(server.body_limit_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Binds `addr` and serves until ctrl-c.
pub async fn serve(state: AppState, server: &ServerSettings, addr: SocketAddr) -> anyhow::Result<()> {
    for (label, configured) in state.providers.status() {
        info!(provider = label, configured, "chat provider");
    }
    let app = build_router(state, server);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "deepread server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}

/// `RUST_LOG` wins; otherwise the crate targets log at info.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
