//! Document-frequency table and per-chunk term vectors.
//!
//! Term weight is `tf * (ln((1 + N) / (1 + df)) + idf_offset)` with `N` the
//! number of chunks. Terms present in every chunk weigh zero when
//! `idf_offset` is zero, which stands in for a stop-word list in any language.
//! A single-chunk index has no other chunk to contrast with, so its terms
//! take the IDF of a term seen in one chunk out of two. Zero weights are not
//! stored, so vectors stay sparse.

use std::collections::HashMap;
use std::f64::consts::LN_2;

use polyglot_core::types::{Chunk, ChunkId};
use tracing::debug;

use crate::tokenizer::tokenize;

/// Sparse term → weight mapping with its Euclidean norm.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    weights: HashMap<String, f64>,
    norm: f64,
}

impl TermVector {
    fn from_weights(weights: HashMap<String, f64>) -> Self {
        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        Self { weights, norm }
    }

    pub fn weight(&self, term: &str) -> f64 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }

    pub fn norm(&self) -> f64 {
        self.norm
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn dot(&self, other: &TermVector) -> f64 {
        let (small, large) = if self.len() <= other.len() { (self, other) } else { (other, self) };
        small.weights.iter().map(|(term, w)| w * large.weight(term)).sum()
    }

    /// Cosine similarity clamped to `[0, 1]`; zero when either norm is zero.
    pub fn cosine(&self, other: &TermVector) -> f64 {
        if self.norm == 0.0 || other.norm == 0.0 {
            return 0.0;
        }
        (self.dot(other) / (self.norm * other.norm)).clamp(0.0, 1.0)
    }
}

/// Term statistics over one chunk set, with each chunk's vector precomputed.
#[derive(Debug, Clone, Default)]
pub struct TermIndex {
    doc_freqs: HashMap<String, usize>,
    total_chunks: usize,
    idf_offset: f64,
    vectors: Vec<(ChunkId, TermVector)>,
}

impl TermIndex {
    pub fn build(chunks: &[Chunk]) -> Self {
        Self::with_idf_offset(chunks, 0.0)
    }

    pub fn with_idf_offset(chunks: &[Chunk], idf_offset: f64) -> Self {
        let term_counts: Vec<HashMap<String, usize>> = chunks.iter().map(|c| term_frequencies(&tokenize(&c.text))).collect();

        let mut doc_freqs: HashMap<String, usize> = HashMap::new();
        for counts in &term_counts {
            for term in counts.keys() {
                *doc_freqs.entry(term.clone()).or_insert(0) += 1;
            }
        }

        let mut index = Self { doc_freqs, total_chunks: chunks.len(), idf_offset, vectors: Vec::with_capacity(chunks.len()) };
        let vectors: Vec<(ChunkId, TermVector)> = chunks.iter().zip(term_counts).map(|(chunk, counts)| (chunk.id, index.weigh(counts))).collect();
        index.vectors = vectors;
        debug!(chunks = index.total_chunks, vocabulary = index.doc_freqs.len(), "built term index");
        index
    }

    pub fn total_chunks(&self) -> usize {
        self.total_chunks
    }

    pub fn vocabulary_size(&self) -> usize {
        self.doc_freqs.len()
    }

    /// Number of chunks containing `term` at least once.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.doc_freqs.get(term).copied().unwrap_or(0)
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn idf(&self, term: &str) -> f64 {
        if self.total_chunks == 1 {
            return LN_2 + self.idf_offset;
        }
        let n = self.total_chunks as f64;
        let df = self.document_frequency(term) as f64;
        ((1.0 + n) / (1.0 + df)).ln() + self.idf_offset
    }

    pub fn vector(&self, id: ChunkId) -> Option<&TermVector> {
        self.vectors.iter().find(|(chunk_id, _)| *chunk_id == id).map(|(_, v)| v)
    }

    /// Weigh a query against this index. Terms unseen in the chunk set are dropped.
    pub fn query_vector(&self, query: &str) -> TermVector {
        let mut counts = term_frequencies(&tokenize(query));
        counts.retain(|term, _| self.doc_freqs.contains_key(term));
        self.weigh(counts)
    }

    /// Cosine similarity of `query` to every chunk, in chunk order.
    #[allow(clippy::cast_possible_truncation)]
    pub fn score(&self, query: &str) -> Vec<(ChunkId, f32)> {
        let query_vector = self.query_vector(query);
        self.vectors.iter().map(|(id, v)| (*id, query_vector.cosine(v) as f32)).collect()
    }

    #[allow(clippy::cast_precision_loss)]
    fn weigh(&self, counts: HashMap<String, usize>) -> TermVector {
        let weights = counts
            .into_iter()
            .map(|(term, tf)| {
                let weight = tf as f64 * self.idf(&term);
                (term, weight)
            })
            .filter(|(_, weight)| *weight > 0.0)
            .collect();
        TermVector::from_weights(weights)
    }
}

fn term_frequencies(tokens: &[String]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0) += 1;
    }
    counts
}
