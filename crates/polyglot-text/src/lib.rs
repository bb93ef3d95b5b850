//! polyglot-text
//!
//! Tokenizing and term-weighted relevance scoring. See `tokenizer`, `index`
//! and `scorer`.
pub mod index;
pub mod scorer;
pub mod tokenizer;

pub use index::{TermIndex, TermVector};
pub use scorer::TfIdfScorer;
pub use tokenizer::tokenize;
