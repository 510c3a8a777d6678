//! # Error Types
//!
//! Errors raised while constructing core domain values.

use thiserror::Error;

/// A domain value failed its constructor checks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The resource type name was empty or whitespace-only.
    #[error("resource type name must not be empty")]
    EmptyName,

    /// The resource type name exceeds the storage column width.
    #[error("resource type name must not exceed {max} characters (got {actual})")]
    NameTooLong {
        /// Maximum permitted length in characters.
        max: usize,
        /// Length of the rejected name in characters.
        actual: usize,
    },
}
