pub mod chunker;
pub mod score;
pub mod select;

pub use chunker::{Chunk, ChunkConfig, chunk_words};
pub use score::{KeywordScorer, RelevanceScorer, keyword_overlap};
pub use select::{ScoredChunk, select_relevant};
