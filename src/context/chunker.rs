use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Default window size in words, sized for LLM input limits.
pub const DEFAULT_CHUNK_SIZE: usize = 3000;
/// Default overlap in words; adjacent windows share this many trailing
/// words so an answer near a boundary still appears intact in one chunk.
pub const DEFAULT_OVERLAP: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChunkConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

impl ChunkConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self { chunk_size, overlap }
    }

    /// A zero chunk size or an overlap >= chunk size would stop the window
    /// from advancing; both are config defects, not user input.
    pub fn validate(&self) -> AppResult<()> {
        if self.chunk_size == 0 {
            return Err(AppError::InvalidConfig("chunk_size must be > 0".into()));
        }
        if self.overlap >= self.chunk_size {
            return Err(AppError::InvalidConfig(format!(
                "overlap ({}) must be less than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    pub id: usize,
    pub text: String,
    /// Index of the chunk's first word within the document's word sequence.
    pub word_start: usize,
    pub word_count: usize,
}

/// Split text into overlapping fixed-size windows of whitespace-separated
/// words. The window advances by `chunk_size - overlap` each step; the final
/// window may be short. Empty text yields no chunks (callers must treat that
/// as "no context available"); otherwise every word lands in at least one
/// chunk. Deterministic for identical inputs.
pub fn chunk_words(text: &str, config: &ChunkConfig) -> AppResult<Vec<Chunk>> {
    config.validate()?;

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Ok(Vec::new());
    }

    let step = config.chunk_size - config.overlap;
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < words.len() {
        let end = (start + config.chunk_size).min(words.len());
        chunks.push(Chunk {
            id: chunks.len(),
            text: words[start..end].join(" "),
            word_start: start,
            word_count: end - start,
        });
        // Once a window reaches the last word, stop: any further window
        // would be wholly contained in this one.
        if end == words.len() {
            break;
        }
        start += step;
    }

    Ok(chunks)
}
