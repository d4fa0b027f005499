use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Upstream returned status {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Upstream(e) => {
                tracing::error!("Upstream error: {:?}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Failed to load report".to_string(),
                )
            }
            AppError::UpstreamStatus { status, url } => {
                tracing::error!(%status, %url, "Upstream returned an error status");
                (
                    StatusCode::BAD_GATEWAY,
                    format!("Report service returned status {}", status),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
