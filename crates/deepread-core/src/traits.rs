use std::sync::Arc;

use crate::error::Result;
use crate::types::{Chunk, Document, IngestRequest, ScoredResult};

/// Shared document index. Every call is atomic with respect to other callers;
/// implementations must not hold a lock across an await point.
pub trait DocumentStore: Send + Sync {
    /// Insert a document, replacing any previous record with the same id.
    fn put(&self, document: Document) -> Result<()>;
    /// Fetch a document by id, or `Error::NotFound`.
    fn get(&self, id: &str) -> Result<Arc<Document>>;
    /// Snapshot of every stored document in insertion order.
    fn all(&self) -> Result<Documents>;
    fn clear(&self) -> Result<()>;
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Relevance heuristic. `Query` is the parsed form of a query string so that
/// parsing happens once per request rather than once per chunk.
pub trait Scorer: Send + Sync {
    type Query;

    fn parse(&self, query: &str) -> Self::Query;
    fn score(&self, query: &Self::Query, chunk: &Chunk) -> u32;
}

/// Facade the HTTP and CLI layers talk to.
pub trait SearchEngine: Send + Sync {
    /// Chunk and store a document; returns the chunk count.
    fn ingest(&self, request: IngestRequest) -> Result<usize>;
    /// Ranked passages for `query`. Empty when nothing matches.
    fn query(&self, query: &str) -> Result<Vec<ScoredResult>>;
    fn clear(&self) -> Result<()>;
    fn document_count(&self) -> Result<usize>;
}

/// Lazy iterator over a store snapshot. Holds `Arc` handles, not the lock.
#[derive(Debug)]
pub struct Documents {
    inner: std::vec::IntoIter<Arc<Document>>,
}

impl From<Vec<Arc<Document>>> for Documents {
    fn from(docs: Vec<Arc<Document>>) -> Self {
        Self { inner: docs.into_iter() }
    }
}

impl Iterator for Documents {
    type Item = Arc<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Documents {}
