//! TF-IDF cosine relevance scoring.
use std::collections::HashMap;

use polyglot_core::traits::Scorer;
use polyglot_core::types::{Chunk, ChunkId};

use crate::index::TermIndex;

/// Stateless [`Scorer`]: rebuilds the document-frequency table from the
/// chunks it is handed on every call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TfIdfScorer {
    idf_offset: f64,
}

impl TfIdfScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idf_offset(idf_offset: f64) -> Self {
        Self { idf_offset }
    }
}

impl Scorer for TfIdfScorer {
    fn score(&self, query: &str, chunks: &[Chunk]) -> HashMap<ChunkId, f32> {
        TermIndex::with_idf_offset(chunks, self.idf_offset).score(query).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyglot_core::{chunk, ChunkingConfig, PageText};

    #[test]
    fn scores_every_chunk_once() {
        let pages = vec![PageText::new(1, "alpha beta gamma delta epsilon zeta eta theta iota kappa")];
        let config = ChunkingConfig { target_size: 20, overlap: 4, min_size: 4, boundary_window: 10 };
        let chunks = chunk(&pages, &config).expect("chunk");

        let scores = TfIdfScorer::new().score("gamma", &chunks);
        assert_eq!(scores.len(), chunks.len());
        assert!(chunks.iter().all(|c| scores.contains_key(&c.id)));
    }

    #[test]
    fn no_chunks_no_scores() {
        assert!(TfIdfScorer::new().score("query", &[]).is_empty());
    }
}
