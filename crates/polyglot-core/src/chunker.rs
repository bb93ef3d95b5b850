//! Overlapping, page-tagged chunking of extracted page text.
//!
//! Each page is walked left to right in windows of `target_size` chars that
//! advance by `target_size - overlap`. A cut point is pulled back to the
//! nearest word boundary inside `boundary_window` (whitespace first, then any
//! UAX #29 word boundary) and falls on the exact offset when there is none,
//! so unbroken text still makes progress. Chunk bodies are exact slices of the
//! page, never trimmed or rejoined.
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::types::{Chunk, ChunkId, PageText};

/// Chunk `pages` with `config`. See [`Chunker::chunk`].
pub fn chunk(pages: &[PageText], config: &ChunkingConfig) -> Result<Vec<Chunk>> {
    Chunker::new(config.clone())?.chunk(pages)
}

#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Produce the ordered chunk set for a document.
    ///
    /// Blank pages contribute nothing; if every page is blank the document
    /// is rejected with [`Error::EmptyDocument`]. Ids are assigned in
    /// emission order starting at zero.
    pub fn chunk(&self, pages: &[PageText]) -> Result<Vec<Chunk>> {
        let mut chunks = Vec::new();
        for page in pages {
            if page.content.trim().is_empty() {
                debug!(page = page.page_number, "skipping blank page");
                continue;
            }
            let chars: Vec<char> = page.content.chars().collect();
            let windows = self.page_windows(&page.content, &chars);
            debug!(page = page.page_number, chars = chars.len(), chunks = windows.len(), "chunked page");
            for (start, end) in windows {
                let text: String = chars[start..end].iter().collect();
                let content_hash = blake3::hash(text.as_bytes()).to_hex().to_string();
                chunks.push(Chunk { id: ChunkId(chunks.len()), page: page.page_number, text, start, end, content_hash });
            }
        }
        if chunks.is_empty() {
            return Err(Error::EmptyDocument);
        }
        Ok(chunks)
    }

    /// Char ranges `(start, end)` covering the whole page.
    fn page_windows(&self, text: &str, chars: &[char]) -> Vec<(usize, usize)> {
        let n = chars.len();
        let boundaries = word_boundaries(text, n);
        let ChunkingConfig { target_size, overlap, min_size, boundary_window } = self.config;

        let mut windows = Vec::new();
        let mut start = 0;
        loop {
            let mut end = (start + target_size).min(n);
            if end < n {
                let lowest = (start + overlap + 1).max(start + min_size).max(end.saturating_sub(boundary_window));
                end = snap_to_boundary(chars, &boundaries, lowest, end);
            }
            windows.push((start, end));
            if end == n {
                break;
            }
            start = end - overlap;
        }

        // A trailing sliver is never emitted on its own: the last window reaches
        // back into its predecessor until it carries `min_size` chars. Growing
        // the predecessor instead would break the `target_size` bound.
        if windows.len() > 1 {
            if let Some(last) = windows.last_mut() {
                if last.1 - last.0 < min_size {
                    last.0 = last.1 - min_size;
                }
            }
        }
        windows
    }
}

/// `true` at every char offset where a UAX #29 word segment starts, plus the end.
fn word_boundaries(text: &str, n: usize) -> Vec<bool> {
    let mut boundaries = vec![false; n + 1];
    let mut char_index = 0;
    let mut byte_cursor = 0;
    for (byte_offset, _) in text.split_word_bound_indices() {
        char_index += text[byte_cursor..byte_offset].chars().count();
        byte_cursor = byte_offset;
        boundaries[char_index] = true;
    }
    boundaries[n] = true;
    boundaries
}

/// Latest cut in `lowest..=end`, preferring one right after whitespace.
fn snap_to_boundary(chars: &[char], boundaries: &[bool], lowest: usize, end: usize) -> usize {
    if lowest > end {
        return end;
    }
    let after_whitespace = (lowest..=end).rev().find(|&b| b > 0 && boundaries[b] && chars[b - 1].is_whitespace());
    after_whitespace.or_else(|| (lowest..=end).rev().find(|&b| boundaries[b])).unwrap_or(end)
}
