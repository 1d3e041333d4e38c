use crate::error::{AppError, AppResult};

use super::chunker::Chunk;
use super::score::RelevanceScorer;

/// A chunk paired with its relevance score for one question. Transient:
/// exists only while picking a winner.
#[derive(Debug)]
pub struct ScoredChunk<'a> {
    pub chunk: &'a Chunk,
    pub score: usize,
}

/// Score every chunk against the question and return the best one. Ties go
/// to the earliest chunk in sequence order so selection stays deterministic
/// even when every chunk scores zero. An empty chunk list is a caller bug
/// (the document was empty and should never have reached selection) and
/// fails loudly.
pub fn select_relevant<'a>(
    chunks: &'a [Chunk],
    question: &str,
    scorer: &dyn RelevanceScorer,
) -> AppResult<&'a Chunk> {
    let scored: Vec<ScoredChunk<'a>> = chunks
        .iter()
        .map(|chunk| ScoredChunk { chunk, score: scorer.score(chunk, question) })
        .collect();

    scored
        .into_iter()
        .max_by(|a, b| {
            a.score
                .cmp(&b.score)
                // max_by keeps the later of equal elements; order by id
                // descending on ties so the earliest chunk wins
                .then(b.chunk.id.cmp(&a.chunk.id))
        })
        .map(|s| s.chunk)
        .ok_or(AppError::EmptyInput)
}
