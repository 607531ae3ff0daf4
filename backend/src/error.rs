//! Error handling for the BloomWatch analytics server
//!
//! Every failure leaves the server as `{"error": {code, message, field?}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] shared::ValidationError),

    #[error("Invalid request: {message}")]
    InvalidRequest {
        field: Option<String>,
        message: String,
    },

    #[error("Invalid CSV: {0}")]
    InvalidCsv(String),

    #[error("Too many observations: {count} (limit {limit})")]
    PayloadTooLarge { count: usize, limit: usize },

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field = errors
            .field_errors()
            .keys()
            .min()
            .map(|name| camel_case(name));
        AppError::InvalidRequest {
            field,
            message: errors.to_string(),
        }
    }
}

/// `days_ahead` -> `daysAhead`, matching the JSON field names.
fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: err.to_string(),
                    field: err.field().map(str::to_string),
                },
            ),
            AppError::InvalidRequest { field, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: field.clone(),
                },
            ),
            AppError::InvalidCsv(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "INVALID_CSV".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::PayloadTooLarge { count, limit } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorDetail {
                    code: "PAYLOAD_TOO_LARGE".to_string(),
                    message: format!(
                        "{} observations submitted, at most {} are accepted per request",
                        count, limit
                    ),
                    field: Some("observations".to_string()),
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message: format!("Configuration error: {}", msg),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred".to_string(),
                    field: None,
                },
            ),
        };

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
