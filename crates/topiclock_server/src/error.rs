//! HTTP error mapping for API handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use topiclock_core::AppError;

/// Wrapper that renders [`AppError`] as a JSON error response.
#[derive(Debug)]
pub struct HttpError(pub AppError);

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl HttpError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NoViewer => (
                StatusCode::UNAUTHORIZED,
                "No authenticated viewer".to_string(),
            ),
            err if err.is_store_failure() => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Presence store unavailable".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}
