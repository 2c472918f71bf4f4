use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::backend::BackendError;
use crate::llm_client::LlmError;
use crate::render::RenderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("File too large: {0}")]
    FileTooLarge(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Optimization rejected: {0}")]
    OptimizationRejected(String),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnsupportedFileType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_FILE_TYPE",
                msg.clone(),
            ),
            AppError::FileTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE", msg.clone())
            }
            AppError::ExtractionFailed(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EXTRACTION_FAILED",
                msg.clone(),
            ),
            AppError::OptimizationRejected(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "OPTIMIZATION_REJECTED",
                msg.clone(),
            ),
            AppError::Backend(e) => {
                tracing::warn!("Backend error: {e}");
                match e {
                    BackendError::Timeout { .. } => {
                        (StatusCode::GATEWAY_TIMEOUT, "BACKEND_TIMEOUT", e.to_string())
                    }
                    _ => (StatusCode::BAD_GATEWAY, "BACKEND_ERROR", e.to_string()),
                }
            }
            AppError::Llm(e) => {
                tracing::warn!("LLM error: {e}");
                match e {
                    LlmError::NotConfigured | LlmError::InvalidCredential => {
                        (StatusCode::BAD_GATEWAY, "LLM_CREDENTIALS", e.to_string())
                    }
                    LlmError::RateLimited => (
                        StatusCode::TOO_MANY_REQUESTS,
                        "LLM_RATE_LIMITED",
                        e.to_string(),
                    ),
                    LlmError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "LLM_TIMEOUT", e.to_string()),
                    _ => (StatusCode::BAD_GATEWAY, "LLM_ERROR", e.to_string()),
                }
            }
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RENDER_ERROR",
                    "The resume document could not be generated".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
