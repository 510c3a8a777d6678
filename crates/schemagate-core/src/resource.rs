//! # Resource Records
//!
//! The two persisted entities: a resource type (name + JSON Schema) and a
//! resource datum (a document admitted under a resource type).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identity::{ResourceDatumId, ResourceTypeId, ResourceTypeName};

/// A registered resource type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceType {
    /// Store-assigned identifier, immutable after creation.
    pub id: ResourceTypeId,
    /// Unique name.
    pub name: ResourceTypeName,
    /// JSON Schema document that submitted data must satisfy.
    pub schema: Value,
}

/// A document admitted under a resource type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDatum {
    /// Store-assigned identifier.
    pub id: ResourceDatumId,
    /// Owning resource type.
    pub resource_type_id: ResourceTypeId,
    /// The admitted document.
    pub data: Value,
    /// Insertion time as recorded by the store.
    pub created_at: DateTime<Utc>,
}
