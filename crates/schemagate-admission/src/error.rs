//! # Admission Errors
//!
//! One variant per terminal failure of the pipeline. Each variant belongs
//! to exactly one [`ErrorCategory`]:
//!
//! | Variant | Category |
//! |---|---|
//! | `InvalidRequest`, `MalformedInput` | BadRequest |
//! | `SchemaNotStrict`, `SchemaViolation` | BadRequest |
//! | `DuplicateName` | Conflict |
//! | `UnknownResourceType` | NotFound |
//! | `ValidatorFault`, `StoreUnavailable` | Internal |

use schemagate_schema::{SchemaCompileError, StrictnessFinding, ValidationViolations};
use thiserror::Error;

/// Terminal failure of a pipeline operation.
#[derive(Error, Debug)]
pub enum AdmissionError {
    /// The registration request is missing a field or has an invalid name.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The submitted document is not valid JSON.
    #[error("malformed JSON input: {0}")]
    MalformedInput(String),

    /// A resource type with this name already exists.
    #[error("resource type '{0}' already exists")]
    DuplicateName(String),

    /// No resource type has this name.
    #[error("resource type '{0}' not found")]
    UnknownResourceType(String),

    /// The schema does not set `additionalProperties: false` at its root.
    #[error("schema of resource type '{resource_type}' is not strict: {finding}")]
    SchemaNotStrict {
        /// Name of the resource type whose schema was checked.
        resource_type: String,
        /// Why the check failed.
        finding: StrictnessFinding,
    },

    /// The document does not satisfy the schema.
    #[error("data does not conform to schema of resource type '{resource_type}': {violations}")]
    SchemaViolation {
        /// Name of the target resource type.
        resource_type: String,
        /// Every violation found, in evaluation order.
        violations: ValidationViolations,
    },

    /// The stored schema could not be compiled.
    #[error("schema of resource type '{resource_type}' could not be compiled: {source}")]
    ValidatorFault {
        /// Name of the resource type whose schema failed to compile.
        resource_type: String,
        /// Compiler error.
        #[source]
        source: SchemaCompileError,
    },

    /// The store failed or is unreachable.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Caller-facing class of an [`AdmissionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller's request, schema or data was rejected.
    BadRequest,
    /// The request conflicts with existing state.
    Conflict,
    /// The addressed resource type does not exist.
    NotFound,
    /// A server-side fault not attributable to the caller.
    Internal,
}

impl AdmissionError {
    /// Classify this error for the transport layer.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidRequest(_)
            | Self::MalformedInput(_)
            | Self::SchemaNotStrict { .. }
            | Self::SchemaViolation { .. } => ErrorCategory::BadRequest,
            Self::DuplicateName(_) => ErrorCategory::Conflict,
            Self::UnknownResourceType(_) => ErrorCategory::NotFound,
            Self::ValidatorFault { .. } | Self::StoreUnavailable(_) => ErrorCategory::Internal,
        }
    }

    /// Stable label used for metrics and structured logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::MalformedInput(_) => "malformed_input",
            Self::DuplicateName(_) => "duplicate_name",
            Self::UnknownResourceType(_) => "unknown_resource_type",
            Self::SchemaNotStrict { .. } => "schema_not_strict",
            Self::SchemaViolation { .. } => "schema_violation",
            Self::ValidatorFault { .. } => "validator_fault",
            Self::StoreUnavailable(_) => "store_unavailable",
        }
    }
}
