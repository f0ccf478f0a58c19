use std::sync::Arc;

use crate::bulletin::BulletinBoard;
use crate::chat::{ChatService, IntentClassifier};
use crate::core::config::{AppPaths, ConfigService, Settings};
use crate::core::http::{build_client, RetryPolicy};
use crate::embedding::{EmbeddingProvider, OpenAiEmbeddingProvider};
use crate::knowledge::KnowledgeBase;
use crate::rag::retriever_for;
use crate::weather::{forecast_provider, ForecastProvider, HeatWavePredictor};

pub mod error;

use error::InitializationError;

/// Application state shared across all routes.
///
/// Contains:
/// - Paths and typed settings
/// - The knowledge base (absent when the file could not be loaded)
/// - Chat orchestration and the heat-wave predictor
/// - The in-memory bulletin board
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub settings: Settings,
    pub knowledge: Option<Arc<KnowledgeBase>>,
    pub chat: ChatService,
    pub predictor: Arc<HeatWavePredictor>,
    pub bulletins: BulletinBoard,
}

impl AppState {
    /// Initializes the application state.
    ///
    /// This process includes:
    /// 1. Loading and validating configuration
    /// 2. Building the shared HTTP client and the external providers
    /// 3. Loading the knowledge base for the configured retrieval mode
    pub async fn initialize(paths: Arc<AppPaths>) -> Result<Arc<Self>, InitializationError> {
        let config = ConfigService::new(paths.clone());
        let raw = config.load_config()?;
        tracing::info!(
            "Effective configuration: {}",
            config.redact_sensitive_values(&raw)
        );
        let settings = config.load_settings()?;

        let client = build_client(&settings.http).map_err(InitializationError::HttpClient)?;
        let retry = RetryPolicy::from_settings(&settings.http);

        let embedding: Arc<dyn EmbeddingProvider> = Arc::new(OpenAiEmbeddingProvider::new(
            settings.embedding.base_url.clone(),
            settings.embedding.model.clone(),
            settings.embedding.api_key.clone(),
            client.clone(),
            retry,
        ));
        let forecast = forecast_provider(&settings.weather, client, retry);

        let kb_path = paths.resolve(settings.retrieval.effective_knowledge_base_path());
        let knowledge = match KnowledgeBase::load(&kb_path, settings.retrieval.mode) {
            Ok(kb) => {
                tracing::info!(
                    "Loaded {} knowledge base entries from {}",
                    kb.len(),
                    kb_path.display()
                );
                Some(kb)
            }
            Err(err) => {
                tracing::warn!("Knowledge base not loaded: {}", err);
                None
            }
        };

        Ok(Self::assemble(
            paths, settings, knowledge, embedding, forecast,
        ))
    }

    /// Wires already-built parts together. Used by `initialize` and tests.
    pub fn assemble(
        paths: Arc<AppPaths>,
        settings: Settings,
        knowledge: Option<KnowledgeBase>,
        embedding: Arc<dyn EmbeddingProvider>,
        forecast: Arc<dyn ForecastProvider>,
    ) -> Arc<Self> {
        let knowledge = knowledge.map(Arc::new);
        let retriever = knowledge
            .clone()
            .map(|kb| retriever_for(kb, embedding.clone()));
        let predictor = Arc::new(HeatWavePredictor::new(forecast));

        let chat = ChatService::new(
            retriever,
            predictor.clone(),
            IntentClassifier::new(settings.weather.default_city.clone()),
            settings.retrieval.effective_top_k(),
            settings.chat.max_message_chars,
        );

        Arc::new(AppState {
            paths,
            settings,
            knowledge,
            chat,
            predictor,
            bulletins: BulletinBoard::new(),
        })
    }
}
