//! deepread-index
//!
//! In-memory document store and the term-overlap relevance scorer. Both are
//! synchronous; the retrieval crate composes them.

pub mod scorer;
pub mod store;

pub use scorer::{QueryTerms, TermOverlapScorer};
pub use store::MemoryStore;
