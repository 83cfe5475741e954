use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::storage::StorageError;

/// Pipeline-level error taxonomy. Every variant is terminal for the job it
/// occurs in; recoverable degradation travels as warnings attached to the
/// output instead of surfacing here.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailure(String),

    #[error("File exceeds maximum size of {0} bytes")]
    FileTooLarge(u64),

    #[error("Incompatible schema version: {0}")]
    SchemaIncompatible(String),

    #[error("Field validation failed: {0}")]
    FieldValidationFailure(String),

    #[error("Prohibited derived field detected: {0}")]
    PrivacyViolation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ParseError {
    /// Stable error kind tag used for metric labels and job results.
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::UnsupportedFormat(_) => "UnsupportedFormat",
            ParseError::ExtractionFailure(_) => "ExtractionFailure",
            ParseError::FileTooLarge(_) => "FileTooLarge",
            ParseError::SchemaIncompatible(_) => "SchemaIncompatible",
            ParseError::FieldValidationFailure(_) => "FieldValidationFailure",
            ParseError::PrivacyViolation(_) => "PrivacyViolation",
            ParseError::Storage(e) => e.kind(),
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
