#![deny(unused_variables)]
#![deny(unused_imports)]

//! deepread-core
//!
//! Shared types, traits, error taxonomy, configuration and the chunker used
//! by the index, retrieval and server crates.

pub mod chunker;
pub mod config;
pub mod data_processor;
pub mod error;
pub mod traits;
pub mod types;

pub use chunker::{chunk_text, Chunker, ChunkingConfig};
pub use error::{Error, Result};
pub use types::{Chunk, DocId, Document, IngestRequest, ScoredResult, SourceText};
