use std::sync::Arc;

use tracing::info;

use deepread_core::chunker::{Chunker, ChunkingConfig};
use deepread_core::error::{Error, Result};
use deepread_core::traits::DocumentStore;
use deepread_core::types::{Document, IngestRequest};

/// Validates ingestion input, chunks the text and commits it to the store.
pub struct IngestionPipeline<St> {
    store: Arc<St>,
    chunker: Chunker,
}

impl<St: DocumentStore> IngestionPipeline<St> {
    pub fn new(store: Arc<St>, config: ChunkingConfig) -> Result<Self> {
        Ok(Self { store, chunker: Chunker::new(config)? })
    }

    pub fn chunking(&self) -> ChunkingConfig {
        self.chunker.config()
    }

    pub fn ingest(&self, request: IngestRequest) -> Result<usize> {
        self.ingest_with(request, &self.chunker)
    }

    /// Ingest with explicit chunking parameters. An invalid configuration is
    /// reported before anything is stored.
    pub fn ingest_with_config(&self, request: IngestRequest, config: ChunkingConfig) -> Result<usize> {
        let chunker = Chunker::new(config)?;
        self.ingest_with(request, &chunker)
    }

    fn ingest_with(&self, request: IngestRequest, chunker: &Chunker) -> Result<usize> {
        let IngestRequest { doc_id, filename, text } = request;
        let doc_id = doc_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| Error::Validation("docId is required".to_string()))?;
        let text = text.ok_or_else(|| Error::Validation("text is required".to_string()))?;
        let filename = filename.filter(|f| !f.trim().is_empty()).unwrap_or_else(|| doc_id.clone());

        let chunks = chunker.chunk(&text);
        let count = chunks.len();
        let label = format!("{} ({})", filename, doc_id);
        self.store.put(Document::new(doc_id, filename, chunks))?;
        info!(document = %label, chunks = count, "indexed document");
        Ok(count)
    }
}
