//! Ranking of scored chunks into the passage set handed to the generator.

use std::cmp::Ordering;
use std::collections::HashMap;

use polyglot_core::config::RetrievalConfig;
use polyglot_core::error::Result;
use polyglot_core::traits::Scorer;
use polyglot_core::types::{Chunk, ChunkId, ScoredChunk};
use polyglot_text::TfIdfScorer;
use tracing::debug;

/// Filter, order and cap scored chunks.
///
/// Chunks below `min_score` are dropped, and so are chunks scoring exactly
/// zero, which share no weighted term with the query. The rest are sorted by
/// descending score, ties broken by ascending page and then ascending id, and
/// truncated to `top_k`.
pub fn rank(scores: &HashMap<ChunkId, f32>, chunks: &[Chunk], config: &RetrievalConfig) -> Vec<ScoredChunk> {
    let mut ranked: Vec<ScoredChunk> = chunks
        .iter()
        .filter_map(|chunk| {
            let score = scores.get(&chunk.id).copied()?;
            (score > 0.0 && score >= config.min_score).then(|| ScoredChunk { chunk: chunk.clone(), score })
        })
        .collect();
    ranked.sort_by(compare);
    ranked.truncate(config.top_k);
    ranked
}

fn compare(a: &ScoredChunk, b: &ScoredChunk) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.chunk.page.cmp(&b.chunk.page))
        .then_with(|| a.chunk.id.cmp(&b.chunk.id))
}

/// Score `chunks` against `query` with `scorer` and rank the result.
///
/// An empty result is a normal outcome, not an error. Fails only with
/// `InvalidConfig`.
pub fn retrieve(query: &str, chunks: &[Chunk], config: &RetrievalConfig, scorer: &dyn Scorer) -> Result<Vec<ScoredChunk>> {
    config.validate()?;
    let scores = scorer.score(query, chunks);
    let passages = rank(&scores, chunks, config);
    debug!(chunks = chunks.len(), passages = passages.len(), "retrieved passages");
    Ok(passages)
}

/// A validated retrieval configuration bound to a scorer.
#[derive(Debug, Clone)]
pub struct Retriever<S: Scorer = TfIdfScorer> {
    scorer: S,
    config: RetrievalConfig,
}

impl Retriever<TfIdfScorer> {
    pub fn new(config: RetrievalConfig) -> Result<Self> {
        let scorer = TfIdfScorer::with_idf_offset(config.idf_offset);
        Self::with_scorer(scorer, config)
    }
}

impl<S: Scorer> Retriever<S> {
    pub fn with_scorer(scorer: S, config: RetrievalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { scorer, config })
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    pub fn retrieve(&self, query: &str, chunks: &[Chunk]) -> Vec<ScoredChunk> {
        let scores = self.scorer.score(query, chunks);
        rank(&scores, chunks, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use polyglot_core::error::Error;

    use super::*;

    fn chunk(id: usize, page: u32, text: &str) -> Chunk {
        Chunk {
            id: ChunkId(id),
            page,
            text: text.to_string(),
            start: 0,
            end: text.chars().count(),
            content_hash: String::new(),
        }
    }

    fn config(top_k: usize, min_score: f32) -> RetrievalConfig {
        RetrievalConfig { top_k, min_score, ..RetrievalConfig::default() }
    }

    struct Fixed(HashMap<ChunkId, f32>);

    impl Scorer for Fixed {
        fn score(&self, _query: &str, _chunks: &[Chunk]) -> HashMap<ChunkId, f32> {
            self.0.clone()
        }
    }

    #[test]
    fn ties_break_by_page_then_id() {
        let chunks = vec![chunk(0, 2, "a"), chunk(1, 1, "b"), chunk(2, 1, "c"), chunk(3, 3, "d")];
        let scores = HashMap::from([(ChunkId(0), 0.5), (ChunkId(1), 0.5), (ChunkId(2), 0.5), (ChunkId(3), 0.9)]);
        let ids: Vec<usize> = rank(&scores, &chunks, &config(10, 0.0)).iter().map(|p| p.chunk.id.0).collect();
        assert_eq!(ids, vec![3, 1, 2, 0]);
    }

    #[test]
    fn min_score_and_top_k_apply() {
        let chunks: Vec<Chunk> = (0..5).map(|i| chunk(i, 1, "x")).collect();
        let scores = HashMap::from([
            (ChunkId(0), 0.10),
            (ChunkId(1), 0.80),
            (ChunkId(2), 0.04),
            (ChunkId(3), 0.60),
            (ChunkId(4), 0.30),
        ]);
        let ranked = rank(&scores, &chunks, &config(2, 0.05));
        assert_eq!(ranked.iter().map(|p| p.chunk.id.0).collect::<Vec<_>>(), vec![1, 3]);

        let all = rank(&scores, &chunks, &config(10, 0.05));
        assert_eq!(all.len(), 4);
        assert!(all.iter().all(|p| p.score >= 0.05));
    }

    #[test]
    fn zero_scores_never_returned() {
        let chunks = vec![chunk(0, 1, "a"), chunk(1, 1, "b")];
        let scores = HashMap::from([(ChunkId(0), 0.0), (ChunkId(1), 0.0)]);
        assert!(rank(&scores, &chunks, &config(5, 0.0)).is_empty());
    }

    #[test]
    fn retriever_uses_injected_scorer() {
        let chunks = vec![chunk(0, 1, "a"), chunk(1, 2, "b")];
        let scorer = Fixed(HashMap::from([(ChunkId(0), 0.2), (ChunkId(1), 0.7)]));
        let retriever = Retriever::with_scorer(scorer, config(1, 0.1)).expect("retriever");
        let passages = retriever.retrieve("anything", &chunks);
        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].chunk.id, ChunkId(1));
        assert!((passages[0].score - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_query_returns_nothing() {
        let chunks = vec![chunk(0, 1, "solar power"), chunk(1, 1, "wind power")];
        let retriever = Retriever::new(config(5, 0.0)).expect("retriever");
        assert!(retriever.retrieve("", &chunks).is_empty());
        assert!(retriever.retrieve("   ", &chunks).is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let bad = config(0, 0.1);
        assert!(matches!(Retriever::new(bad.clone()), Err(Error::InvalidConfig(_))));
        assert!(matches!(retrieve("q", &[], &bad, &TfIdfScorer::new()), Err(Error::InvalidConfig(_))));
    }
}
