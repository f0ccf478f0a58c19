use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Shown to the user whenever the service itself fails, so a failed request
/// still points at a next step.
pub const SYSTEM_ERROR_FALLBACK: &str =
    "System error. Please contact NDMA Helpline: 1078 immediately.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("knowledge base not available")]
    KnowledgeBaseUnavailable,
    #[error("{provider} unavailable: {message}")]
    UpstreamUnavailable { provider: String, message: String },
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn upstream<E: std::fmt::Display>(provider: &str, err: E) -> Self {
        ApiError::UpstreamUnavailable {
            provider: provider.to_string(),
            message: err.to_string(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::NotFound(_) => "not_found",
            ApiError::KnowledgeBaseUnavailable => "knowledge_base_unavailable",
            ApiError::UpstreamUnavailable { .. } => "upstream_unavailable",
            ApiError::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::KnowledgeBaseUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match &self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => msg.clone(),
            ApiError::KnowledgeBaseUnavailable => "Knowledge base not available".to_string(),
            ApiError::UpstreamUnavailable { provider, message } => {
                format!("{} request failed: {}", provider, message)
            }
            ApiError::Internal(_) => "An error occurred processing your request".to_string(),
        };

        match &self {
            ApiError::Internal(detail) => tracing::error!("Internal error: {}", detail),
            ApiError::UpstreamUnavailable { .. } | ApiError::KnowledgeBaseUnavailable => {
                tracing::warn!("{}", self)
            }
            _ => tracing::debug!("{}", self),
        }

        let mut body = json!({
            "status": "error",
            "error": self.code(),
            "message": message,
        });
        if status.is_server_error() {
            body["response"] = json!(SYSTEM_ERROR_FALLBACK);
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_errors_map_to_bad_gateway() {
        let err = ApiError::upstream("openweathermap", "city not found");
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.code(), "upstream_unavailable");
        assert_eq!(err.to_string(), "openweathermap unavailable: city not found");
    }

    #[test]
    fn server_errors_carry_the_helpline_fallback() {
        let response = ApiError::KnowledgeBaseUnavailable.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = ApiError::BadRequest("Message is required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
