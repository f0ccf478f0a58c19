use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value;

use crate::bulletin::BulletinKind;
use crate::core::errors::ApiError;
use crate::state::AppState;

pub async fn list_alerts(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.bulletins.list(BulletinKind::Alert).await)
}

pub async fn create_alert(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    post(&state, BulletinKind::Alert, payload).await
}

pub async fn list_announcements(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.bulletins.list(BulletinKind::Announcement).await)
}

pub async fn create_announcement(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    post(&state, BulletinKind::Announcement, payload).await
}

async fn post(
    state: &AppState,
    kind: BulletinKind,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(body) = payload?;
    let stored = state.bulletins.post(kind, body).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}
