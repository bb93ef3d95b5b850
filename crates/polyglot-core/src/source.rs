//! Plain-text page extraction.
//!
//! A single file holds pages separated by form feeds (the `pdftotext`
//! convention); a directory holds one `*.txt` file per page, ordered by path.
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::PageSource;
use crate::types::PageText;

const PAGE_BREAK: char = '\u{c}';

#[derive(Debug, Clone)]
pub struct TextPageSource {
    path: PathBuf,
}

impl TextPageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file_content(file_path: &Path) -> Result<String> {
        let bytes = fs::read(file_path)
            .map_err(|e| Error::Extraction(format!("cannot read {}: {}", file_path.display(), e)))?;
        match String::from_utf8(bytes) {
            Ok(content) => Ok(content),
            Err(err) => Ok(String::from_utf8_lossy(err.as_bytes()).into_owned()),
        }
    }

    fn list_txt_files(root: &Path) -> Vec<PathBuf> {
        let mut txt_files: Vec<PathBuf> = walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("txt"))
            .collect();
        txt_files.sort();
        txt_files
    }
}

/// Split form-feed separated text into 1-based pages.
pub fn split_pages(text: &str) -> Vec<PageText> {
    text.split(PAGE_BREAK)
        .zip(1u32..)
        .map(|(content, page_number)| PageText::new(page_number, content))
        .collect()
}

impl PageSource for TextPageSource {
    fn pages(&self) -> Result<Vec<PageText>> {
        if self.path.is_dir() {
            let files = Self::list_txt_files(&self.path);
            if files.is_empty() {
                return Err(Error::Extraction(format!("no .txt pages under {}", self.path.display())));
            }
            debug!(dir = %self.path.display(), pages = files.len(), "reading page directory");
            files
                .iter()
                .zip(1u32..)
                .map(|(file, page_number)| Ok(PageText::new(page_number, Self::read_file_content(file)?)))
                .collect()
        } else {
            let content = Self::read_file_content(&self.path)?;
            let pages = split_pages(&content);
            debug!(file = %self.path.display(), pages = pages.len(), "read paged text file");
            Ok(pages)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_feeds_separate_pages() {
        let pages = split_pages("first\u{c}second\u{c}");
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0], PageText::new(1, "first"));
        assert_eq!(pages[1], PageText::new(2, "second"));
        assert_eq!(pages[2].content, "");
    }

    #[test]
    fn text_without_breaks_is_one_page() {
        let pages = split_pages("just one page");
        assert_eq!(pages, vec![PageText::new(1, "just one page")]);
    }

    #[test]
    fn missing_file_is_an_extraction_error() {
        let source = TextPageSource::new("/definitely/not/here.txt");
        assert!(matches!(source.pages(), Err(Error::Extraction(_))));
    }
}
