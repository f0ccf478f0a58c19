use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::bulletin::BulletinKind;
use crate::state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (knowledge_base, entries) = match &state.knowledge {
        Some(kb) => ("connected", kb.len()),
        None => ("not_found", 0),
    };

    Json(json!({
        "status": "healthy",
        "knowledge_base": knowledge_base,
        "knowledge_base_entries": entries,
        "mode": state.settings.retrieval.mode.as_str(),
        "weather_prediction": state.predictor.provider_name(),
        "alerts": state.bulletins.count(BulletinKind::Alert).await,
        "announcements": state.bulletins.count(BulletinKind::Announcement).await,
    }))
}
