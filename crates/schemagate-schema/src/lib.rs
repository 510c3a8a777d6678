//! # schemagate-schema: Schema Strictness & Validation
//!
//! The two pure checking components of the admission pipeline.
//!
//! ## Strictness (`strict`)
//!
//! [`is_strict`] decides whether a schema explicitly forbids undeclared
//! properties at its root (`"additionalProperties": false`). Only the root
//! key counts. [`strictness_finding`] explains a failed check.
//!
//! ## Validation (`validate`)
//!
//! [`SchemaValidator::validate`] compiles a schema with the `jsonschema`
//! crate and evaluates a document against it, returning an ordered list of
//! [`Violation`]s. A schema that does not compile is reported as a
//! [`SchemaCompileError`], never as a data violation.
//!
//! ## Crate Policy
//!
//! - Depends on no other `schemagate-*` crate.
//! - No I/O: both components are synchronous, side-effect free and safe to
//!   call concurrently.
//! - Remote `$ref`s are never fetched.

pub mod strict;
pub mod validate;

pub use strict::{is_strict, is_strict_document, strictness_finding, StrictnessFinding};
pub use validate::{SchemaCompileError, SchemaValidator, ValidationViolations, Violation};
