//! # Store Errors

use thiserror::Error;

/// Failure of a store operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A resource type with this name already exists.
    #[error("resource type '{0}' already exists")]
    DuplicateName(String),

    /// No resource type has this name.
    #[error("resource type '{0}' not found")]
    NotFound(String),

    /// The underlying storage failed or is unreachable.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::Unavailable(format!("migration failed: {err}"))
    }
}
