//! polyglot-core
//!
//! Data model, configuration, errors and chunking for the document
//! assistant. Scoring lives in `polyglot-text`, retrieval and answering in
//! `polyglot-rag`.
pub mod chunker;
pub mod config;
pub mod error;
pub mod source;
pub mod traits;
pub mod types;

pub use chunker::{chunk, Chunker};
pub use config::{AnswerConfig, ChunkingConfig, Config, RetrievalConfig};
pub use error::{Error, Result};
pub use source::TextPageSource;
pub use traits::{AnswerGenerator, AnswerRequest, PageSource, Scorer};
pub use types::{Chunk, ChunkId, Message, PageText, Role, ScoredChunk};
