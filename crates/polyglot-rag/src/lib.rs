//! polyglot-rag
//!
//! Retrieval over the active document and grounded answering on top of it.
//! `Session` owns the versioned snapshot, `Assistant` adds the generator.
pub mod answer;
pub mod grounding;
pub mod retriever;
pub mod session;

pub use answer::{Answer, Assistant, ExtractiveAnswerer, Outcome};
pub use grounding::INSUFFICIENT_INFORMATION;
pub use retriever::{rank, retrieve, Retriever};
pub use session::{Session, Snapshot};
