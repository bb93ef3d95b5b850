use proptest::prelude::*;

use polyglot_core::{chunk, Chunk, ChunkingConfig, Error, PageText};

fn config_strategy() -> impl Strategy<Value = ChunkingConfig> {
    (1usize..120).prop_flat_map(|target_size| {
        (Just(target_size), 0..target_size, 0..=target_size, 0usize..64).prop_map(
            |(target_size, overlap, min_size, boundary_window)| ChunkingConfig {
                target_size,
                overlap,
                min_size,
                boundary_window,
            },
        )
    })
}

fn page_text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z ,.]{0,300}",
        "[a-zA-Z0-9]{0,300}",
        "[ \n\t]{0,10}",
        "[東京日本語です。、 ]{0,200}",
        "(\\PC{0,12} ){0,30}",
    ]
}

fn pages_strategy() -> impl Strategy<Value = Vec<PageText>> {
    prop::collection::vec(page_text_strategy(), 0..5).prop_map(|texts| {
        texts
            .into_iter()
            .zip(1u32..)
            .map(|(content, page_number)| PageText::new(page_number, content))
            .collect()
    })
}

/// Rebuild a page from its chunks, dropping each overlap region once.
fn reassemble(chunks: &[&Chunk]) -> String {
    let mut out = String::new();
    let mut covered = 0;
    for c in chunks {
        assert!(c.start <= covered, "gap before chunk {}", c.id);
        out.extend(c.text.chars().skip(covered - c.start));
        covered = c.end;
    }
    out
}

proptest! {
    #[test]
    fn chunking_is_idempotent(pages in pages_strategy(), config in config_strategy()) {
        let first = chunk(&pages, &config);
        let second = chunk(&pages, &config);
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(Error::EmptyDocument), Err(Error::EmptyDocument)) => {}
            (a, b) => prop_assert!(false, "diverging results: {:?} vs {:?}", a, b),
        }
    }

    #[test]
    fn chunks_cover_every_page_exactly(pages in pages_strategy(), config in config_strategy()) {
        let Ok(chunks) = chunk(&pages, &config) else {
            prop_assert!(pages.iter().all(|p| p.content.trim().is_empty()));
            return Ok(());
        };
        for page in &pages {
            let of_page: Vec<&Chunk> = chunks.iter().filter(|c| c.page == page.page_number).collect();
            if page.content.trim().is_empty() {
                prop_assert!(of_page.is_empty());
                continue;
            }
            prop_assert_eq!(of_page[0].start, 0);
            prop_assert_eq!(of_page[of_page.len() - 1].end, page.content.chars().count());
            prop_assert_eq!(reassemble(&of_page), page.content.clone());
        }
    }

    #[test]
    fn chunk_lengths_respect_bounds(pages in pages_strategy(), config in config_strategy()) {
        let Ok(chunks) = chunk(&pages, &config) else { return Ok(()); };
        for page in &pages {
            let of_page: Vec<&Chunk> = chunks.iter().filter(|c| c.page == page.page_number).collect();
            for c in &of_page {
                prop_assert!(c.char_len() <= config.target_size);
                prop_assert_eq!(c.text.chars().count(), c.char_len());
                if of_page.len() > 1 {
                    prop_assert!(c.char_len() >= config.min_size, "chunk {} shorter than min_size", c.id);
                }
            }
        }
    }

    #[test]
    fn ids_are_dense_and_follow_page_order(pages in pages_strategy(), config in config_strategy()) {
        let Ok(chunks) = chunk(&pages, &config) else { return Ok(()); };
        for (i, c) in chunks.iter().enumerate() {
            prop_assert_eq!(c.id.0, i);
        }
        for pair in chunks.windows(2) {
            prop_assert!((pair[0].page, pair[0].start) < (pair[1].page, pair[1].start));
        }
    }
}
