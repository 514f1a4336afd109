use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extract::handlers::SUPPORTED_TYPES;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Extraction failures are deterministic parsing failures — nothing here is
/// retried; every variant surfaces synchronously in the request that caused it.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unsupported file type: {0}")]
    UnsupportedMediaType(String),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Insufficient text content")]
    InsufficientContent,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::UnsupportedMediaType(mime) => {
                let body = Json(json!({
                    "error": "Unsupported file type",
                    "detail": format!("received '{mime}'"),
                    "supported_types": SUPPORTED_TYPES,
                }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            AppError::MalformedDocument(msg) => error_response(
                StatusCode::BAD_REQUEST,
                "Malformed document",
                Some(msg.clone()),
            ),
            AppError::ExtractionFailed(msg) => {
                tracing::error!("extraction failed: {msg}");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to extract text",
                    Some(msg.clone()),
                )
            }
            AppError::InsufficientContent => error_response(
                StatusCode::BAD_REQUEST,
                "Insufficient text content",
                Some(
                    "The document contains very little text. If this is a scanned \
                     document, please convert it to searchable PDF first."
                        .to_string(),
                ),
            ),
            AppError::BadRequest(msg) => {
                error_response(StatusCode::BAD_REQUEST, msg.clone(), None)
            }
            AppError::Internal(e) => {
                tracing::error!("internal error: {e:?}");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred",
                    None,
                )
            }
        }
    }
}

fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    detail: Option<String>,
) -> Response {
    let body = match detail {
        Some(detail) => Json(json!({ "error": error.into(), "detail": detail })),
        None => Json(json!({ "error": error.into() })),
    };
    (status, body).into_response()
}
