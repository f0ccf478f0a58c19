//! Offline index construction from the source dataset.

use serde_json::Value;

use super::dataset::records_from_dataset;
use super::keyword::KeywordIndex;
use super::store::{EmbeddingFile, KeywordFile};
use crate::core::errors::ApiError;
use crate::embedding::EmbeddingProvider;

pub fn build_keyword_file(dataset: &Value) -> KeywordFile {
    let entries = records_from_dataset(dataset);
    let keywords = KeywordIndex::build(&entries);
    KeywordFile { entries, keywords }
}

/// Embeds every record in batches of `batch_size`. Any provider failure
/// aborts the build; a partial file is never produced.
pub async fn build_embedding_file(
    dataset: &Value,
    provider: &dyn EmbeddingProvider,
    batch_size: usize,
) -> Result<EmbeddingFile, ApiError> {
    let entries = records_from_dataset(dataset);
    let texts: Vec<String> = entries.iter().map(|r| r.embedding_text()).collect();

    let mut embeddings = Vec::with_capacity(texts.len());
    for (batch_index, batch) in texts.chunks(batch_size.max(1)).enumerate() {
        let vectors = provider.embed(batch).await?;
        embeddings.extend(vectors);
        tracing::info!(
            "Generated embeddings {}/{} (batch {})",
            embeddings.len(),
            texts.len(),
            batch_index + 1
        );
    }

    Ok(EmbeddingFile {
        entries,
        texts,
        embeddings,
    })
}
