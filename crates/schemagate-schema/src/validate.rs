//! # Schema Validation
//!
//! Runtime validation of JSON documents against caller-supplied JSON
//! Schema definitions.
//!
//! ## Trust Boundary
//!
//! Every submitted document crosses this boundary. Documents that fail
//! validation are rejected with structured violations carrying the
//! instance path, the schema path that triggered the failure, and a
//! human-readable message.
//!
//! ## Compilation
//!
//! Schemas are compiled fresh on every call. The draft is read from the
//! schema's `$schema` keyword when present and defaults to Draft 2020-12
//! otherwise. Compilation also checks the schema against its meta-schema,
//! so malformed keywords (`"type": 5`, `"required": "x"`) surface as
//! [`SchemaCompileError`] rather than as data violations.
//!
//! ## Reference Resolution
//!
//! Internal `$ref`s (`#/$defs/...`) are resolved by the jsonschema crate.
//! Remote `$ref`s are refused by [`RefuseRemoteRetriever`]; a schema that
//! depends on one does not compile.

use std::fmt;

use jsonschema::{Draft, Retrieve, Uri, Validator};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Retriever that refuses every external URI.
///
/// Stored schemas come from API clients; resolving their remote
/// references would let a registration trigger outbound requests.
struct RefuseRemoteRetriever;

impl Retrieve for RefuseRemoteRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("remote reference '{}' is not resolvable", uri.as_str()).into())
    }
}

/// The schema document could not be compiled into a validator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("schema compilation failed: {reason}")]
pub struct SchemaCompileError {
    /// Reason reported by the schema compiler.
    pub reason: String,
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// JSON Pointer path to the violating value in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Ordered collection of validation violations.
///
/// An empty collection means the document is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl From<Vec<Violation>> for ValidationViolations {
    fn from(violations: Vec<Violation>) -> Self {
        Self { violations }
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A schema validator backed by the `jsonschema` crate.
///
/// Holds only configuration. No compiled schema is cached between calls,
/// so one instance can be shared freely across concurrent requests.
#[derive(Debug, Clone, Copy)]
pub struct SchemaValidator {
    default_draft: Draft,
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaValidator {
    /// Create a validator that defaults to Draft 2020-12.
    pub fn new() -> Self {
        Self {
            default_draft: Draft::Draft202012,
        }
    }

    /// Compile `schema` into a `jsonschema::Validator`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaCompileError`] if the schema is not a valid JSON
    /// Schema or references a remote document.
    pub fn compile(&self, schema: &Value) -> Result<Validator, SchemaCompileError> {
        let mut opts = jsonschema::options();
        if schema.get("$schema").is_none() {
            opts.with_draft(self.default_draft);
        }
        opts.with_retriever(RefuseRemoteRetriever);

        opts.build(schema).map_err(|e| SchemaCompileError {
            reason: e.to_string(),
        })
    }

    /// Compile `schema` and evaluate `instance` against it.
    ///
    /// Returns the (possibly empty) ordered list of violations. Repeated
    /// calls with the same inputs return identical lists.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaCompileError`] if the schema cannot be compiled.
    pub fn validate(
        &self,
        schema: &Value,
        instance: &Value,
    ) -> Result<ValidationViolations, SchemaCompileError> {
        let validator = self.compile(schema)?;

        let violations: Vec<Violation> = validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        Ok(ValidationViolations { violations })
    }
}
