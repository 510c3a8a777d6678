//! # schemagate-admission: Schema-Gated Admission Pipeline
//!
//! Composes the strictness check, the schema validator and the resource
//! store into the two operations exposed to the transport layer:
//!
//! - [`AdmissionPipeline::register_resource_type`]: validate the request
//!   and insert a new resource type.
//! - [`AdmissionPipeline::submit_resource_data`]: look up the target type,
//!   parse the document, require a strict schema, validate, and persist.
//!
//! ## Admission Rule
//!
//! A document is admitted iff the stored schema is strict AND compiles AND
//! produces no violations. Any failure is terminal for the request; nothing
//! is written unless every check passed.
//!
//! ## Crate Policy
//!
//! - Holds no state across requests beyond immutable configuration.
//! - The store is injected as `Arc<dyn ResourceStore>`; there is no global
//!   connection.
//! - Every failure maps to exactly one [`ErrorCategory`] so the transport
//!   layer can pick a status without inspecting messages.

pub mod error;
pub mod pipeline;
pub mod policy;

pub use error::{AdmissionError, ErrorCategory};
pub use pipeline::AdmissionPipeline;
pub use policy::AdmissionPolicy;
