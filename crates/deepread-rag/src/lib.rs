//! deepread-rag
//!
//! Ingestion and retrieval over a shared document store, plus the prompt
//! context builder used by the chat flow.

use std::sync::Arc;

use tracing::info;

use deepread_core::config::RetrievalSettings;
use deepread_core::error::Result;
use deepread_core::traits::{DocumentStore, Scorer, SearchEngine};
use deepread_core::types::{IngestRequest, ScoredResult};
use deepread_index::{MemoryStore, TermOverlapScorer};

pub mod context;
pub mod ingest;
pub mod retrieval;

pub use context::{build_context, system_prompt};
pub use ingest::IngestionPipeline;
pub use retrieval::RetrievalService;

/// Ingestion and retrieval wired to the same store instance.
pub struct DocumentIndex<St, Sc> {
    store: Arc<St>,
    ingestion: IngestionPipeline<St>,
    retrieval: RetrievalService<St, Sc>,
}

impl<St, Sc> DocumentIndex<St, Sc>
where
    St: DocumentStore,
    Sc: Scorer,
{
    pub fn new(store: Arc<St>, scorer: Sc, settings: &RetrievalSettings) -> Result<Self> {
        let ingestion = IngestionPipeline::new(Arc::clone(&store), settings.chunking())?;
        let retrieval = RetrievalService::new(Arc::clone(&store), scorer).with_top_k(settings.top_k)?;
        Ok(Self { store, ingestion, retrieval })
    }

    pub fn store(&self) -> &Arc<St> { &self.store }

    pub fn ingestion(&self) -> &IngestionPipeline<St> { &self.ingestion }

    pub fn retrieval(&self) -> &RetrievalService<St, Sc> { &self.retrieval }
}

impl DocumentIndex<MemoryStore, TermOverlapScorer> {
    /// In-memory store with the term-overlap scorer.
    pub fn in_memory(settings: &RetrievalSettings) -> Result<Self> {
        Self::new(MemoryStore::shared(), TermOverlapScorer::new(settings.min_term_chars), settings)
    }
}

impl<St, Sc> SearchEngine for DocumentIndex<St, Sc>
where
    St: DocumentStore,
    Sc: Scorer,
{
    fn ingest(&self, request: IngestRequest) -> Result<usize> { self.ingestion.ingest(request) }

    fn query(&self, query: &str) -> Result<Vec<ScoredResult>> { self.retrieval.query(query) }

    fn clear(&self) -> Result<()> {
        self.store.clear()?;
        info!("cleared document store");
        Ok(())
    }

    fn document_count(&self) -> Result<usize> { self.store.len() }
}
