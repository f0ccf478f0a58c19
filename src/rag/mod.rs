//! Retrieval over the knowledge base and reply assembly.
//!
//! - `Retriever`: keyword-overlap or embedding-similarity top-k lookup
//! - `assembler`: per-record formatting plus the helpline footer

pub mod assembler;
mod retriever;

pub use assembler::{assemble, context_labels, HELPLINE_FOOTER, HELPLINE_MARKER, NO_MATCH_FALLBACK};
pub use retriever::{retriever_for, EmbeddingRetriever, KeywordRetriever, Retriever};
