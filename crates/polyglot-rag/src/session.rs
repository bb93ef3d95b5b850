//! Versioned, immutable snapshots of the active document.
//!
//! A session holds one `Arc<Snapshot>` behind a lock. Uploads build the next
//! snapshot without holding the lock and swap it in whole; queries clone the
//! `Arc` and run against that view for as long as they need it.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use polyglot_core::chunker::Chunker;
use polyglot_core::config::{ChunkingConfig, RetrievalConfig};
use polyglot_core::error::Result;
use polyglot_core::types::{Chunk, PageText, ScoredChunk};
use polyglot_text::TermIndex;
use tracing::{debug, info, warn};

use crate::retriever::rank;

/// One indexed document: its chunk set and the term index built over it.
#[derive(Debug)]
pub struct Snapshot {
    version: u64,
    chunks: Vec<Chunk>,
    index: TermIndex,
    page_count: usize,
}

impl Snapshot {
    fn empty(version: u64) -> Self {
        Self { version, chunks: Vec::new(), index: TermIndex::default(), page_count: 0 }
    }

    fn build(version: u64, chunks: Vec<Chunk>, idf_offset: f64) -> Self {
        let index = TermIndex::with_idf_offset(&chunks, idf_offset);
        let page_count = chunks.iter().map(|c| c.page).collect::<BTreeSet<_>>().len();
        Self { version, chunks, index, page_count }
    }

    /// Monotonic stamp; a later upload always carries a larger version.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn index(&self) -> &TermIndex {
        &self.index
    }

    /// Pages that contributed at least one chunk.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Ranked passages for `query`. Pure; safe to call from any thread.
    pub fn query(&self, query: &str, config: &RetrievalConfig) -> Vec<ScoredChunk> {
        let scores = self.index.score(query).into_iter().collect();
        let passages = rank(&scores, &self.chunks, config);
        debug!(version = self.version, passages = passages.len(), "queried snapshot");
        passages
    }
}

/// The single active document of one chat session.
#[derive(Debug)]
pub struct Session {
    chunker: Chunker,
    retrieval: RetrievalConfig,
    current: RwLock<Arc<Snapshot>>,
    last_version: AtomicU64,
}

impl Session {
    pub fn new(chunking: ChunkingConfig, retrieval: RetrievalConfig) -> Result<Self> {
        retrieval.validate()?;
        Ok(Self {
            chunker: Chunker::new(chunking)?,
            retrieval,
            current: RwLock::new(Arc::new(Snapshot::empty(0))),
            last_version: AtomicU64::new(0),
        })
    }

    pub fn retrieval_config(&self) -> &RetrievalConfig {
        &self.retrieval
    }

    /// Chunk and index `pages`, then make the result the active snapshot.
    ///
    /// On failure the previous snapshot stays active and untouched.
    /// Versions are drawn when the upload starts, so of two overlapping
    /// uploads the one started last stays active. A failed upload still
    /// consumes its version.
    pub fn index(&self, pages: &[PageText]) -> Result<Arc<Snapshot>> {
        let version = self.next_version();
        let chunks = self.chunker.chunk(pages).inspect_err(|e| {
            warn!(error = %e, version, active = self.snapshot().version(), "re-index failed, keeping active snapshot");
        })?;
        let snapshot = Arc::new(Snapshot::build(version, chunks, self.retrieval.idf_offset));
        self.install(Arc::clone(&snapshot));
        info!(
            version,
            pages = snapshot.page_count(),
            chunks = snapshot.chunks().len(),
            vocabulary = snapshot.index().vocabulary_size(),
            "document indexed"
        );
        Ok(snapshot)
    }

    /// The active snapshot. Holding it keeps that view alive across uploads.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.read())
    }

    pub fn query(&self, query: &str) -> Vec<ScoredChunk> {
        self.snapshot().query(query, &self.retrieval)
    }

    /// Start over with no document.
    pub fn clear(&self) {
        let version = self.next_version();
        self.install(Arc::new(Snapshot::empty(version)));
        info!(version, "session cleared");
    }

    fn next_version(&self) -> u64 {
        self.last_version.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn install(&self, snapshot: Arc<Snapshot>) {
        let mut current = self.current.write();
        // Two overlapping uploads: the higher version wins.
        if snapshot.version > current.version {
            *current = snapshot;
        }
    }
}
