//! Domain types shared by the store, scorer and retrieval service.

use serde::{Deserialize, Serialize};

pub type DocId = String;

/// A window of a document's extracted text.
///
/// - `index`: position within the parent document
/// - `offset`: character offset of the first character in the source text
/// - `text`: the payload that is scored and returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub index: usize,
    pub offset: usize,
    pub text: String,
}

/// A stored document. Replaced wholesale on re-ingestion, never edited.
///
/// `chunks` is empty only when the source text was empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub filename: String,
    pub chunks: Vec<Chunk>,
}

impl Document {
    pub fn new(id: impl Into<DocId>, filename: impl Into<String>, chunks: Vec<Chunk>) -> Self {
        Self { id: id.into(), filename: filename.into(), chunks }
    }
}

/// A chunk paired with its originating document and relevance score.
///
/// Built per query and discarded once the response has been produced. Higher
/// scores are better; zero-score chunks never appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredResult {
    pub doc_id: DocId,
    pub filename: String,
    pub text: String,
    pub score: u32,
    #[serde(skip)]
    pub chunk_index: usize,
}

/// Raw ingestion input as it arrives from a caller.
///
/// Fields are optional so that an absent identifier or text can be reported
/// as a validation failure instead of a deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    #[serde(default)]
    pub doc_id: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl IngestRequest {
    pub fn new(doc_id: impl Into<String>, filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self { doc_id: Some(doc_id.into()), filename: Some(filename.into()), text: Some(text.into()) }
    }
}

/// A plain-text source read from disk, ready for ingestion.
#[derive(Debug, Clone)]
pub struct SourceText {
    pub doc_id: DocId,
    pub filename: String,
    pub text: String,
}
