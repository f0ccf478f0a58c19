//! Embedding generation for query and knowledge-base vectors.

mod openai;
mod provider;

pub use openai::OpenAiEmbeddingProvider;
pub use provider::EmbeddingProvider;
