use std::sync::Arc;

use serde::Serialize;

use super::intent::{Intent, IntentClassifier};
use crate::core::errors::ApiError;
use crate::rag::{assemble, context_labels, Retriever, HELPLINE_FOOTER};
use crate::weather::{HeatWavePrediction, HeatWavePredictor};

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub retrieved_context: Vec<String>,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction_data: Option<HeatWavePrediction>,
}

/// Routes a chat message to retrieval or heat-wave prediction.
///
/// `retriever` is `None` when no knowledge base could be loaded; general
/// queries then fail while predictions keep working.
pub struct ChatService {
    retriever: Option<Arc<dyn Retriever>>,
    predictor: Arc<HeatWavePredictor>,
    classifier: IntentClassifier,
    top_k: usize,
    max_message_chars: usize,
}

impl ChatService {
    pub fn new(
        retriever: Option<Arc<dyn Retriever>>,
        predictor: Arc<HeatWavePredictor>,
        classifier: IntentClassifier,
        top_k: usize,
        max_message_chars: usize,
    ) -> Self {
        Self {
            retriever,
            predictor,
            classifier,
            top_k,
            max_message_chars,
        }
    }

    pub async fn respond(&self, message: &str) -> Result<ChatReply, ApiError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ApiError::BadRequest("No message provided".to_string()));
        }
        let length = message.chars().count();
        if length > self.max_message_chars {
            return Err(ApiError::BadRequest(format!(
                "Message is {} characters; the limit is {}",
                length, self.max_message_chars
            )));
        }

        match self.classifier.classify(message) {
            Intent::HeatWavePrediction { city } => self.predict(&city).await,
            Intent::GeneralQuery => self.answer(message).await,
        }
    }

    async fn predict(&self, city: &str) -> Result<ChatReply, ApiError> {
        let prediction = self.predictor.predict(city).await?;
        Ok(ChatReply {
            response: prediction_text(&prediction),
            retrieved_context: vec![format!("Heat wave prediction for {}", city)],
            status: "success",
            prediction_data: Some(prediction),
        })
    }

    async fn answer(&self, message: &str) -> Result<ChatReply, ApiError> {
        let retriever = self
            .retriever
            .as_ref()
            .ok_or(ApiError::KnowledgeBaseUnavailable)?;

        let records = retriever.retrieve(message, self.top_k).await?;
        tracing::debug!(
            "Retrieved {} record(s) via {} retrieval",
            records.len(),
            retriever.mode().as_str()
        );

        Ok(ChatReply {
            response: assemble(&records),
            retrieved_context: context_labels(&records),
            status: "success",
            prediction_data: None,
        })
    }
}

fn prediction_text(prediction: &HeatWavePrediction) -> String {
    if prediction.heat_wave_days.is_empty() {
        return format!(
            "No heat wave predicted for {} in next 2 days. Stay hydrated and avoid peak sun hours (12-3 PM). | {}",
            prediction.city, HELPLINE_FOOTER
        );
    }
    format!(
        "HEAT WAVE PREDICTION for {}:\n\n{}\n\nSAFETY ADVICE: {}\n\n{}",
        prediction.city,
        prediction.warnings.join("\n"),
        prediction.safety_advice,
        HELPLINE_FOOTER
    )
}
