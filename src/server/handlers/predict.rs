use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::core::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PredictQuery {
    pub city: Option<String>,
}

pub async fn predict_heatwave(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PredictQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let city = query
        .city
        .map(|city| city.trim().to_string())
        .filter(|city| !city.is_empty())
        .unwrap_or_else(|| state.settings.weather.default_city.clone());

    let prediction = state.predictor.predict(&city).await?;
    Ok(Json(prediction))
}
