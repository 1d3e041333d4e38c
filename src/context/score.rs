use std::collections::HashSet;

use super::chunker::Chunk;

/// Lower-case and split on whitespace, trimming punctuation from token
/// edges so "gamma?" in a question still matches "gamma" in a chunk.
fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .map(|w| w.to_string())
        .collect()
}

/// Count of distinct lower-cased word tokens shared between a question and a
/// chunk. A deliberately cheap stand-in for semantic search: no stemming, no
/// stopword removal, no term weighting. Pure function; word order within
/// either input does not affect the result.
pub fn keyword_overlap(chunk_text: &str, question: &str) -> usize {
    let question_tokens = tokenize(question);
    if question_tokens.is_empty() {
        return 0;
    }
    let chunk_tokens = tokenize(chunk_text);
    question_tokens.intersection(&chunk_tokens).count()
}

/// Produces a total order over chunks given a question; higher is more
/// relevant. The selection logic only depends on this trait, so a
/// vector-similarity scorer can slot in behind the same contract.
pub trait RelevanceScorer: Send + Sync {
    fn score(&self, chunk: &Chunk, question: &str) -> usize;
}

/// Default scorer: lexical keyword overlap.
pub struct KeywordScorer;

impl RelevanceScorer for KeywordScorer {
    fn score(&self, chunk: &Chunk, question: &str) -> usize {
        keyword_overlap(&chunk.text, question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_overlap() {
        assert_eq!(keyword_overlap("alpha beta", "What is gamma?"), 0);
        assert_eq!(keyword_overlap("gamma delta", "What is gamma?"), 1);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(keyword_overlap("The JWT Token Expiry", "what is jwt token expiry"), 3);
    }

    #[test]
    fn test_duplicates_counted_once() {
        // "go" appears three times in the chunk but is one shared token
        assert_eq!(keyword_overlap("go go go now", "where did it go"), 1);
    }

    #[test]
    fn test_punctuation_trimmed() {
        assert_eq!(keyword_overlap("expiry is 15 minutes.", "What is the expiry?"), 2);
    }

    #[test]
    fn test_empty_question_scores_zero() {
        assert_eq!(keyword_overlap("some chunk text", ""), 0);
        assert_eq!(keyword_overlap("some chunk text", "   \t "), 0);
        assert_eq!(keyword_overlap("some chunk text", "?!"), 0);
    }

    #[test]
    fn test_empty_chunk_scores_zero() {
        assert_eq!(keyword_overlap("", "a real question"), 0);
    }

    #[test]
    fn test_word_order_irrelevant() {
        let q = "how does chunk overlap work";
        assert_eq!(
            keyword_overlap("overlap between chunk windows", q),
            keyword_overlap("windows chunk between overlap", q),
        );
        assert_eq!(
            keyword_overlap("overlap between chunk windows", "work overlap chunk does how"),
            keyword_overlap("overlap between chunk windows", q),
        );
    }

    #[test]
    fn test_keyword_scorer_matches_free_function() {
        let chunk = Chunk {
            id: 0,
            text: "alpha beta gamma".into(),
            word_start: 0,
            word_count: 3,
        };
        let scorer = KeywordScorer;
        assert_eq!(
            scorer.score(&chunk, "beta or gamma"),
            keyword_overlap("alpha beta gamma", "beta or gamma"),
        );
    }
}
