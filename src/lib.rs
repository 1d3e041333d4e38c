//! Document Q&A engine.
//!
//! Extracts text from uploaded files, splits it into overlapping word
//! windows, picks the single chunk with the highest keyword overlap with
//! the user's question, and hands that chunk to an LLM as context.
//!
//! ```text
//! uploads → extract::combine_files → ContextSession::load
//! question → chunk_words → select_relevant → AnswerService → history
//! ```
//!
//! No embeddings, no vector store, no chunk persistence: relevance is pure
//! lexical overlap and all session state lives in memory for the session's
//! duration.

pub mod answer;
pub mod context;
pub mod error;
pub mod extract;
pub mod session;

pub use answer::{AnswerConfig, AnswerService, AnthropicClient};
pub use context::{Chunk, ChunkConfig, KeywordScorer, RelevanceScorer, chunk_words, keyword_overlap, select_relevant};
pub use error::{AppError, AppResult};
pub use extract::{ExtractError, ExtractionReport, FilePayload, LinkFetcher, combine_files, enrich_with_links, extract_text, find_urls};
pub use session::{ContextSession, Role, SessionState, Turn};
