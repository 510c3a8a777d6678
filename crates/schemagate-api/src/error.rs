//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps [`AdmissionError`] categories to HTTP status codes and returns JSON
//! bodies with an error code, a message and optional details. Internal
//! faults are never described to the client; the admission pipeline logs
//! them where they occur, with the resource type attached.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use schemagate_admission::AdmissionError;
use schemagate_schema::ValidationViolations;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "SCHEMA_VIOLATION").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Violation list for `SCHEMA_VIOLATION`; absent otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request could not be parsed or is missing a field (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Conflict with existing state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Stored schema fails the strictness check (400).
    #[error("{0}")]
    SchemaNotStrict(String),

    /// Document does not satisfy the schema (400). Violations go in `details`.
    #[error("{message}")]
    SchemaViolation {
        message: String,
        violations: ValidationViolations,
    },

    /// Internal server error (500). Message is not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::SchemaNotStrict(_) => (StatusCode::BAD_REQUEST, "SCHEMA_NOT_STRICT"),
            Self::SchemaViolation { .. } => (StatusCode::BAD_REQUEST, "SCHEMA_VIOLATION"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        let details = match self {
            Self::SchemaViolation { violations, .. } => serde_json::to_value(violations).ok(),
            _ => None,
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<AdmissionError> for AppError {
    fn from(err: AdmissionError) -> Self {
        match err {
            AdmissionError::InvalidRequest(_) | AdmissionError::MalformedInput(_) => {
                Self::BadRequest(err.to_string())
            }
            AdmissionError::DuplicateName(_) => Self::Conflict(err.to_string()),
            AdmissionError::UnknownResourceType(_) => Self::NotFound(err.to_string()),
            AdmissionError::SchemaNotStrict { .. } => Self::SchemaNotStrict(err.to_string()),
            AdmissionError::SchemaViolation {
                resource_type,
                violations,
            } => Self::SchemaViolation {
                message: format!(
                    "data does not conform to schema of resource type '{resource_type}'"
                ),
                violations,
            },
            AdmissionError::ValidatorFault { .. } | AdmissionError::StoreUnavailable(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}
