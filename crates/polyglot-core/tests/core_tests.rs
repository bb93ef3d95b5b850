use std::fs;
use std::io::Write;
use tempfile::TempDir;

use polyglot_core::traits::PageSource;
use polyglot_core::{chunk, ChunkingConfig, Error, TextPageSource};

#[test]
fn paged_file_is_split_on_form_feeds() {
    let tmp = TempDir::new().unwrap();
    let file_path = tmp.path().join("doc.txt");
    let mut f = fs::File::create(&file_path).unwrap();
    write!(f, "Page one text\u{c}Page two text").unwrap();

    let pages = TextPageSource::new(&file_path).pages().expect("pages");

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[1].page_number, 2);
    assert_eq!(pages[1].content, "Page two text");
}

#[test]
fn directory_pages_follow_path_order() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("002.txt"), "second").unwrap();
    fs::write(dir.join("001.txt"), "first").unwrap();
    fs::write(dir.join("notes.md"), "ignored").unwrap();

    let pages = TextPageSource::new(dir).pages().expect("pages");

    let contents: Vec<_> = pages.iter().map(|p| (p.page_number, p.content.as_str())).collect();
    assert_eq!(contents, vec![(1, "first"), (2, "second")]);
}

#[test]
fn directory_without_pages_is_an_extraction_error() {
    let tmp = TempDir::new().unwrap();
    let err = TextPageSource::new(tmp.path()).pages().expect_err("no pages");
    assert!(matches!(err, Error::Extraction(_)));
}

#[test]
fn invalid_utf8_is_decoded_lossily() {
    let tmp = TempDir::new().unwrap();
    let file_path = tmp.path().join("latin1.txt");
    fs::write(&file_path, b"caf\xe9 au lait").unwrap();

    let pages = TextPageSource::new(&file_path).pages().expect("pages");
    assert!(pages[0].content.starts_with("caf"));
    assert!(pages[0].content.ends_with("au lait"));
}

#[test]
fn blank_extraction_fails_indexing_not_extraction() {
    let tmp = TempDir::new().unwrap();
    let file_path = tmp.path().join("blank.txt");
    fs::write(&file_path, "   \u{c}\n\n").unwrap();

    let pages = TextPageSource::new(&file_path).pages().expect("extraction itself succeeds");
    let err = chunk(&pages, &ChunkingConfig::default()).expect_err("nothing to chunk");
    assert!(matches!(err, Error::EmptyDocument));
}
