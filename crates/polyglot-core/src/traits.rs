use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Chunk, ChunkId, Message, PageText, ScoredChunk};

/// Supplies the ordered page texts of one document.
pub trait PageSource {
    fn pages(&self) -> Result<Vec<PageText>>;
}

/// Relevance of every chunk to a query.
///
/// Implementations return a score in `[0, 1]` for each chunk id in `chunks`;
/// an empty chunk slice yields an empty map.
pub trait Scorer: Send + Sync {
    fn score(&self, query: &str, chunks: &[Chunk]) -> HashMap<ChunkId, f32>;
}

/// Everything the answer generator is allowed to see for one question.
///
/// `passages` are the only grounding material; `instruction` already embeds
/// them as a context block.
#[derive(Debug, Clone)]
pub struct AnswerRequest {
    pub query: String,
    pub instruction: String,
    pub passages: Vec<ScoredChunk>,
    pub history: Vec<Message>,
}

/// Turns a grounded request into natural-language text.
///
/// Called at most once per question; retrying is up to the implementation.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, request: &AnswerRequest) -> Result<String>;
}
