use std::sync::Arc;

use tracing::debug;

use deepread_core::error::{Error, Result};
use deepread_core::traits::{DocumentStore, Scorer};
use deepread_core::types::ScoredResult;

pub const DEFAULT_TOP_K: usize = 5;

/// Scores every stored chunk against a query and keeps the best `top_k`.
pub struct RetrievalService<St, Sc> {
    store: Arc<St>,
    scorer: Sc,
    top_k: usize,
}

impl<St, Sc> RetrievalService<St, Sc>
where
    St: DocumentStore,
    Sc: Scorer,
{
    pub fn new(store: Arc<St>, scorer: Sc) -> Self {
        Self { store, scorer, top_k: DEFAULT_TOP_K }
    }

    /// `InvalidConfig` for zero, matching settings validation.
    pub fn with_top_k(mut self, top_k: usize) -> Result<Self> {
        if top_k == 0 {
            return Err(Error::InvalidConfig("top_k must be greater than zero".to_string()));
        }
        self.top_k = top_k;
        Ok(self)
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Ranked passages, best first. Ties keep store order (document insertion
    /// order, then chunk order). An empty result means "no relevant context".
    pub fn query(&self, text: &str) -> Result<Vec<ScoredResult>> {
        let terms = self.scorer.parse(text);
        let docs: Vec<_> = self.store.all()?.collect();

        // (score, doc, chunk) triples; texts are only cloned for the survivors.
        let mut hits = Vec::new();
        for (d, doc) in docs.iter().enumerate() {
            for (c, chunk) in doc.chunks.iter().enumerate() {
                let score = self.scorer.score(&terms, chunk);
                if score > 0 {
                    hits.push((score, d, c));
                }
            }
        }
        let matched = hits.len();
        // Vec::sort_by is stable.
        hits.sort_by(|a, b| b.0.cmp(&a.0));
        hits.truncate(self.top_k);

        let results: Vec<ScoredResult> = hits
            .into_iter()
            .map(|(score, d, c)| {
                let doc = &docs[d];
                let chunk = &doc.chunks[c];
                ScoredResult {
                    doc_id: doc.id.clone(),
                    filename: doc.filename.clone(),
                    text: chunk.text.clone(),
                    score,
                    chunk_index: chunk.index,
                }
            })
            .collect();
        debug!(documents = docs.len(), matched, returned = results.len(), "retrieval query");
        Ok(results)
    }
}
