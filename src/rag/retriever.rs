//! Query -> top-k knowledge records.

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::config::RetrievalMode;
use crate::core::errors::ApiError;
use crate::embedding::EmbeddingProvider;
use crate::knowledge::{KnowledgeBackend, KnowledgeBase, KnowledgeRecord};

#[async_trait]
pub trait Retriever: Send + Sync {
    fn mode(&self) -> RetrievalMode;

    /// At most `k` records, most relevant first.
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<KnowledgeRecord>, ApiError>;
}

/// Keyword-overlap retrieval. Never calls out of process.
pub struct KeywordRetriever {
    knowledge: Arc<KnowledgeBase>,
}

impl KeywordRetriever {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self { knowledge }
    }
}

#[async_trait]
impl Retriever for KeywordRetriever {
    fn mode(&self) -> RetrievalMode {
        RetrievalMode::Keyword
    }

    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<KnowledgeRecord>, ApiError> {
        let KnowledgeBackend::Keyword(index) = self.knowledge.backend() else {
            return Err(ApiError::Internal(
                "keyword retrieval requires a keyword-indexed knowledge base".to_string(),
            ));
        };

        let records = self.knowledge.records();
        let hits = index.search(query, records.len(), k);
        tracing::debug!("Keyword retrieval matched {} record(s)", hits.len());

        Ok(hits
            .into_iter()
            .map(|(position, _)| records[position].clone())
            .collect())
    }
}

/// Cosine-similarity retrieval; embeds the query once per call.
pub struct EmbeddingRetriever {
    knowledge: Arc<KnowledgeBase>,
    provider: Arc<dyn EmbeddingProvider>,
}

impl EmbeddingRetriever {
    pub fn new(knowledge: Arc<KnowledgeBase>, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            knowledge,
            provider,
        }
    }
}

#[async_trait]
impl Retriever for EmbeddingRetriever {
    fn mode(&self) -> RetrievalMode {
        RetrievalMode::Embedding
    }

    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<KnowledgeRecord>, ApiError> {
        let KnowledgeBackend::Embedding(store) = self.knowledge.backend() else {
            return Err(ApiError::Internal(
                "embedding retrieval requires an embedding knowledge base".to_string(),
            ));
        };
        if store.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self.provider.embed_one(query).await?;
        if query_vector.len() != store.dimension() {
            return Err(ApiError::upstream(
                self.provider.name(),
                format!(
                    "query embedding has dimension {} but the index uses {}",
                    query_vector.len(),
                    store.dimension()
                ),
            ));
        }

        let hits = store.nearest(&query_vector, k)?;
        if let Some((_, best)) = hits.first() {
            tracing::debug!("Embedding retrieval best score {:.3}", best);
        }

        let records = self.knowledge.records();
        Ok(hits
            .into_iter()
            .map(|(position, _)| records[position].clone())
            .collect())
    }
}

/// Picks the retriever matching the loaded knowledge base.
pub fn retriever_for(
    knowledge: Arc<KnowledgeBase>,
    provider: Arc<dyn EmbeddingProvider>,
) -> Arc<dyn Retriever> {
    match knowledge.mode() {
        RetrievalMode::Keyword => Arc::new(KeywordRetriever::new(knowledge)),
        RetrievalMode::Embedding => Arc::new(EmbeddingRetriever::new(knowledge, provider)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider {
        vector: Option<Vec<f32>>,
    }

    #[async_trait]
    impl EmbeddingProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError> {
            match &self.vector {
                Some(vector) => Ok(inputs.iter().map(|_| vector.clone()).collect()),
                None => Err(ApiError::upstream("fixed", "connection refused")),
            }
        }
    }

    fn contact(service: &str, number: &str, description: &str) -> KnowledgeRecord {
        KnowledgeRecord::EmergencyContact {
            service: service.to_string(),
            number: number.to_string(),
            description: description.to_string(),
        }
    }

    fn records() -> Vec<KnowledgeRecord> {
        vec![
            contact("Police", "100", "Emergency police contact numbers"),
            contact("Fire", "101", "Fire brigade emergency"),
            contact("Ambulance", "108", "Medical emergency transport"),
            contact("Disaster Management", "1078", "NDMA national helpline"),
        ]
    }

    fn embedding_kb() -> Arc<KnowledgeBase> {
        let records = records();
        let texts = records.iter().map(|r| r.embedding_text()).collect();
        Arc::new(
            KnowledgeBase::with_embeddings(
                records,
                texts,
                vec![
                    vec![1.0, 0.0, 0.0],
                    vec![0.0, 1.0, 0.0],
                    vec![0.0, 0.0, 1.0],
                    vec![0.5, 0.5, 0.0],
                ],
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn keyword_mode_returns_empty_for_unmatched_queries() {
        let retriever = KeywordRetriever::new(Arc::new(KnowledgeBase::keyword_from_records(records())));
        let results = retriever.retrieve("tsunami xyz", 3).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn keyword_mode_is_deterministic() {
        let retriever = KeywordRetriever::new(Arc::new(KnowledgeBase::keyword_from_records(records())));

        let first = retriever.retrieve("emergency contact numbers", 3).await.unwrap();
        let second = retriever.retrieve("emergency contact numbers", 3).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert_eq!(first[0].context_label(), "Police: 100");
    }

    #[tokio::test]
    async fn embedding_mode_always_returns_k() {
        let provider = Arc::new(FixedProvider {
            vector: Some(vec![0.0, 0.0, -1.0]),
        });
        let retriever = EmbeddingRetriever::new(embedding_kb(), provider);

        let results = retriever.retrieve("tsunami xyz", 2).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn embedding_mode_ranks_by_cosine() {
        let provider = Arc::new(FixedProvider {
            vector: Some(vec![0.9, 0.1, 0.0]),
        });
        let retriever = EmbeddingRetriever::new(embedding_kb(), provider);

        let results = retriever.retrieve("police", 2).await.unwrap();
        let labels: Vec<String> = results.iter().map(|r| r.context_label()).collect();
        assert_eq!(labels, vec!["Police: 100", "Disaster Management: 1078"]);
    }

    #[tokio::test]
    async fn embedding_failure_is_not_silently_degraded() {
        let retriever = EmbeddingRetriever::new(embedding_kb(), Arc::new(FixedProvider { vector: None }));
        let err = retriever.retrieve("flood", 2).await.unwrap_err();
        assert!(matches!(err, ApiError::UpstreamUnavailable { .. }));
    }

    #[tokio::test]
    async fn embedding_dimension_mismatch_is_an_upstream_error() {
        let provider = Arc::new(FixedProvider {
            vector: Some(vec![1.0, 0.0]),
        });
        let retriever = EmbeddingRetriever::new(embedding_kb(), provider);
        let err = retriever.retrieve("flood", 2).await.unwrap_err();
        assert!(matches!(err, ApiError::UpstreamUnavailable { .. }));
    }

    #[tokio::test]
    async fn retriever_for_follows_knowledge_base_mode() {
        let provider: Arc<dyn EmbeddingProvider> = Arc::new(FixedProvider { vector: None });
        let keyword = retriever_for(Arc::new(KnowledgeBase::keyword_from_records(records())), provider.clone());
        let embedding = retriever_for(embedding_kb(), provider);

        assert_eq!(keyword.mode(), RetrievalMode::Keyword);
        assert_eq!(embedding.mode(), RetrievalMode::Embedding);
    }
}
