//! Static disaster-guidance knowledge base.
//!
//! This module provides:
//! - `KnowledgeRecord`: the tagged record type (contacts, guidelines, first aid)
//! - `KeywordIndex` / `EmbeddingStore`: the two search companions
//! - `KnowledgeBase`: records plus one companion, loaded read-only at startup
//! - `indexer`: offline construction of the on-disk files from the dataset

pub mod dataset;
mod embedding;
pub mod indexer;
mod keyword;
mod record;
mod store;

pub use embedding::EmbeddingStore;
pub use keyword::{tokenize, KeywordIndex};
pub use record::KnowledgeRecord;
pub use store::{
    write_json_file, EmbeddingFile, KeywordFile, KnowledgeBackend, KnowledgeBase, KnowledgeError,
};
