//! Fixed-size sliding-window chunking over character offsets.
//!
//! Windows are `chunk_size` characters long and each one starts
//! `chunk_size - overlap` characters after the previous one. Words are not
//! respected; a window boundary may fall in the middle of one. "Character"
//! means a Unicode scalar value, so boundaries never split a UTF-8 sequence.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Chunk;

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size: DEFAULT_CHUNK_SIZE, overlap: DEFAULT_CHUNK_OVERLAP }
    }
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        let config = Self { chunk_size, overlap };
        config.validate()?;
        Ok(config)
    }

    /// A non-positive step would never advance the window.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk_size must be greater than zero".to_string()));
        }
        if self.overlap >= self.chunk_size {
            return Err(Error::InvalidConfig(format!(
                "chunk overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    pub fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }
}

/// A validated chunker. Construction fails for parameters that would not
/// terminate, so `chunk` itself cannot fail.
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Default for Chunker {
    fn default() -> Self {
        Self { config: ChunkingConfig::default() }
    }
}

impl Chunker {
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> ChunkingConfig {
        self.config
    }

    /// Walks the text with a byte cursor; no per-character offset table is
    /// built, so peak memory stays close to the size of the output.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let size = self.config.chunk_size;
        let step = self.config.step();

        let mut chunks = Vec::with_capacity(text.chars().count().div_ceil(step));
        let mut start_byte = 0;
        let mut start_char = 0;
        while start_byte < text.len() {
            let rest = &text[start_byte..];
            let end_byte = rest.char_indices().nth(size).map_or(text.len(), |(i, _)| start_byte + i);
            chunks.push(Chunk {
                index: chunks.len(),
                offset: start_char,
                text: text[start_byte..end_byte].to_string(),
            });
            match rest.char_indices().nth(step) {
                Some((i, _)) => {
                    start_byte += i;
                    start_char += step;
                }
                None => break,
            }
        }
        chunks
    }
}

/// One-shot helper: validate `config` and chunk `text`.
pub fn chunk_text(text: &str, config: ChunkingConfig) -> Result<Vec<Chunk>> {
    Ok(Chunker::new(config)?.chunk(text))
}
