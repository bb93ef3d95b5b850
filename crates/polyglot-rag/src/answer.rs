//! Question answering over the active snapshot.

use std::sync::Arc;

use async_trait::async_trait;
use polyglot_core::config::{AnswerConfig, Config};
use polyglot_core::error::{Error, Result};
use polyglot_core::traits::{AnswerGenerator, AnswerRequest, PageSource};
use polyglot_core::types::{Message, PageText, ScoredChunk};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::grounding::{citations, history_window, system_instruction, INSUFFICIENT_INFORMATION};
use crate::session::{Session, Snapshot};

/// How an answer came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The generator answered from retrieved passages.
    Grounded,
    /// Nothing cleared the relevance floor; the generator was not called.
    NoRelevantContent,
}

#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub text: String,
    pub outcome: Outcome,
    pub citations: Vec<u32>,
    pub passages: Vec<ScoredChunk>,
    /// Version of the snapshot the passages came from.
    pub snapshot_version: u64,
}

/// Offline generator that quotes the leading passages verbatim.
#[derive(Debug, Clone)]
pub struct ExtractiveAnswerer {
    max_passages: usize,
    excerpt_chars: usize,
}

impl ExtractiveAnswerer {
    pub fn new(max_passages: usize, excerpt_chars: usize) -> Self {
        Self { max_passages, excerpt_chars }
    }

    pub fn from_config(config: &AnswerConfig) -> Self {
        Self::new(config.fallback_passages, config.fallback_excerpt_chars)
    }

    pub fn compose(&self, passages: &[ScoredChunk]) -> String {
        if passages.is_empty() {
            return INSUFFICIENT_INFORMATION.to_string();
        }
        let pages = citations(passages).iter().map(u32::to_string).collect::<Vec<_>>().join(", ");
        let excerpts = passages
            .iter()
            .take(self.max_passages)
            .map(|p| {
                let excerpt: String = p.chunk.text.chars().take(self.excerpt_chars).collect();
                format!("Page {}: {}", p.chunk.page, excerpt)
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        format!("Based on the document (pages {pages}):\n\n{excerpts}\n\n(Answer synthesized from indexed document segments.)")
    }
}

impl Default for ExtractiveAnswerer {
    fn default() -> Self {
        Self::from_config(&AnswerConfig::default())
    }
}

#[async_trait]
impl AnswerGenerator for ExtractiveAnswerer {
    async fn generate(&self, request: &AnswerRequest) -> Result<String> {
        Ok(self.compose(&request.passages))
    }
}

/// A chat session over one document, answering through `G`.
pub struct Assistant<G: AnswerGenerator = ExtractiveAnswerer> {
    session: Session,
    generator: G,
    config: AnswerConfig,
}

impl Assistant<ExtractiveAnswerer> {
    /// Assistant backed by the offline extractive answerer.
    pub fn extractive(config: &Config) -> Result<Self> {
        Self::new(config, ExtractiveAnswerer::from_config(&config.answer))
    }
}

impl<G: AnswerGenerator> Assistant<G> {
    pub fn new(config: &Config, generator: G) -> Result<Self> {
        config.answer.validate()?;
        let session = Session::new(config.chunking.clone(), config.retrieval.clone())?;
        Ok(Self { session, generator, config: config.answer.clone() })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Replace the active document. A failure leaves the previous one in place.
    pub fn upload(&self, pages: &[PageText]) -> Result<Arc<Snapshot>> {
        self.session.index(pages)
    }

    /// Extract pages from `source` and upload them. Extraction errors surface
    /// before anything is chunked.
    pub fn upload_from(&self, source: &dyn PageSource) -> Result<Arc<Snapshot>> {
        let pages = source.pages()?;
        debug!(pages = pages.len(), "extracted pages");
        self.upload(&pages)
    }

    pub fn clear(&self) {
        self.session.clear();
    }

    /// Answer `query` from the active snapshot.
    ///
    /// With no relevant passage the generator is skipped and the fixed
    /// insufficient-information text is returned. Otherwise the generator is
    /// called once and must finish within the configured timeout.
    pub async fn ask(&self, query: &str, history: &[Message]) -> Result<Answer> {
        let snapshot = self.session.snapshot();
        let passages = snapshot.query(query, self.session.retrieval_config());
        if passages.is_empty() {
            info!(version = snapshot.version(), "no passage cleared the relevance floor");
            return Ok(Answer {
                text: INSUFFICIENT_INFORMATION.to_string(),
                outcome: Outcome::NoRelevantContent,
                citations: Vec::new(),
                passages,
                snapshot_version: snapshot.version(),
            });
        }

        let request = AnswerRequest {
            query: query.to_string(),
            instruction: system_instruction(&passages),
            passages,
            history: history_window(history, self.config.history_window),
        };
        let limit = self.config.timeout();
        let text = match tokio::time::timeout(limit, self.generator.generate(&request)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!(error = %e, "answer generation failed");
                return Err(e);
            }
            Err(_) => {
                warn!(timeout_secs = limit.as_secs(), "answer generation timed out");
                return Err(Error::AnswerTimeout(limit));
            }
        };

        debug!(version = snapshot.version(), passages = request.passages.len(), "answered");
        Ok(Answer {
            text,
            outcome: Outcome::Grounded,
            citations: citations(&request.passages),
            passages: request.passages,
            snapshot_version: snapshot.version(),
        })
    }
}
