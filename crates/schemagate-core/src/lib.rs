//! # schemagate-core: Foundational Types
//!
//! Defines the records that flow between the admission pipeline, the
//! store, and the HTTP layer. Every other crate in the workspace depends
//! on `schemagate-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype identifiers.** `ResourceTypeId` and `ResourceDatumId` wrap
//!    the store-assigned integer keys so the two tables' ids cannot be
//!    swapped by accident.
//!
//! 2. **Validated names.** A `ResourceTypeName` can only be built through
//!    [`ResourceTypeName::new`], which rejects empty and oversized names.
//!
//! 3. **Documents stay dynamic.** Schemas and data are `serde_json::Value`;
//!    their shape is only known at runtime.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `schemagate-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod resource;

pub use error::ValidationError;
pub use identity::{ResourceDatumId, ResourceTypeId, ResourceTypeName, MAX_RESOURCE_TYPE_NAME_LEN};
pub use resource::{ResourceDatum, ResourceType};
