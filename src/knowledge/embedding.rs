use crate::core::errors::ApiError;
use crate::vector_math::rank_descending_by_cosine;

/// Embeddings positionally aligned with the records.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingStore {
    embeddings: Vec<Vec<f32>>,
    dimension: usize,
}

impl EmbeddingStore {
    /// Fails unless texts and embeddings line up and every vector has the
    /// same non-zero dimension.
    pub fn new(texts: &[String], embeddings: Vec<Vec<f32>>) -> Result<Self, String> {
        if texts.len() != embeddings.len() {
            return Err(format!(
                "{} texts but {} embeddings",
                texts.len(),
                embeddings.len()
            ));
        }
        let dimension = embeddings.first().map(Vec::len).unwrap_or(0);
        if !embeddings.is_empty() && dimension == 0 {
            return Err("embeddings must not be empty vectors".to_string());
        }
        if let Some(position) = embeddings.iter().position(|e| e.len() != dimension) {
            return Err(format!(
                "embedding {} has dimension {}, expected {}",
                position,
                embeddings[position].len(),
                dimension
            ));
        }
        Ok(Self {
            embeddings,
            dimension,
        })
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Top `k` positions by cosine similarity. No relevance floor: the result
    /// always holds `min(k, len)` entries.
    pub fn nearest(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>, ApiError> {
        let mut ranked = rank_descending_by_cosine(query, &self.embeddings)?;
        ranked.truncate(k);
        Ok(ranked)
    }
}
