//! # schemagate-store: Resource Persistence
//!
//! Holds resource type definitions and admitted resource data.
//!
//! ## Architecture
//!
//! [`ResourceStore`] is the seam between the admission pipeline and
//! durable state. It is object-safe (via `async-trait`) so the pipeline can
//! hold an `Arc<dyn ResourceStore>` chosen at startup:
//!
//! - [`PgStore`]: Postgres via SQLx, used when `DATABASE_URL` is set.
//! - [`MemoryStore`]: process-local maps, used in tests and when running
//!   without a database. Data does not survive restarts.
//!
//! ## Consistency
//!
//! Each operation is a single-row insert or a single lookup. Name
//! uniqueness is enforced by the store (unique index / write lock), never
//! by callers checking first.

pub mod error;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use schemagate_core::{ResourceDatum, ResourceType, ResourceTypeId, ResourceTypeName};
use serde_json::Value;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::{PgStore, PoolConfig};

/// Storage operations required by the admission pipeline.
///
/// Implementations must be `Send + Sync` so they can be shared across
/// request tasks behind an `Arc`.
#[async_trait]
pub trait ResourceStore: Send + Sync + std::fmt::Debug {
    /// Insert a new resource type and return it with its assigned id.
    ///
    /// Fails with [`StoreError::DuplicateName`] if the name is taken.
    async fn create_resource_type(
        &self,
        name: &ResourceTypeName,
        schema: &Value,
    ) -> Result<ResourceType, StoreError>;

    /// Look up a resource type by its unique name.
    ///
    /// Fails with [`StoreError::NotFound`] if no type has this name.
    async fn get_resource_type_by_name(&self, name: &str) -> Result<ResourceType, StoreError>;

    /// Insert a validated document under an existing resource type.
    async fn create_resource_datum(
        &self,
        resource_type_id: ResourceTypeId,
        data: &Value,
    ) -> Result<ResourceDatum, StoreError>;

    /// Check that the backing storage is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
