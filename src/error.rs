//! HTTP error type and JSON error envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::application::services::refresh_service::RefreshError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

/// Error returned by JSON endpoints, rendered as
/// `{"error": {"code", "message", "details"}}`.
#[derive(Debug)]
pub enum AppError {
    ServiceUnavailable { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn service_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }
}

impl From<RefreshError> for AppError {
    fn from(e: RefreshError) -> Self {
        match e {
            RefreshError::Source(source) => AppError::service_unavailable(
                "Data source failed and no fallback file is configured",
                json!({ "source_error": source.to_string() }),
            ),
            RefreshError::FallbackUnavailable {
                source_error,
                fallback,
            } => AppError::service_unavailable(
                "Data source and fallback file both failed",
                json!({
                    "source_error": source_error.to_string(),
                    "fallback_error": fallback.to_string(),
                }),
            ),
            RefreshError::QueueClosed(_) => {
                AppError::internal("Update workers are not running", json!({}))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::ServiceUnavailable { message, details } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                message,
                details,
            ),
            AppError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                details,
            ),
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}
