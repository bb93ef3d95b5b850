//! Domain types shared by the chunker, scorer and retriever.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The text of one physical page, as produced by a [`PageSource`].
///
/// `page_number` is 1-based and pages arrive in reading order.
///
/// [`PageSource`]: crate::traits::PageSource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    pub page_number: u32,
    pub content: String,
}

impl PageText {
    pub fn new(page_number: u32, content: impl Into<String>) -> Self {
        Self { page_number, content: content.into() }
    }
}

/// Position of a chunk within the chunk set it was produced in.
///
/// Ids are assigned in emission order, so ordering by id is ordering by
/// (page, offset) for a single chunking pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChunkId(pub usize);

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// A bounded, contiguous slice of one page.
///
/// - `id`: unique within its chunk set
/// - `page`: page number the slice was cut from
/// - `text`: exact copy of `content[start..end]` (in chars) of that page
/// - `start`/`end`: char offsets into the page text, end exclusive
/// - `content_hash`: blake3 hex digest of `text`, stable across uploads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub page: u32,
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub content_hash: String,
}

impl Chunk {
    /// Length of the chunk body in chars.
    pub fn char_len(&self) -> usize {
        self.end - self.start
    }
}

/// A chunk paired with its relevance to one query. `score` lies in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One turn of chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}
