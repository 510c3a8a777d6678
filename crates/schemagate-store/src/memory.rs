//! In-memory resource store.
//!
//! All operations are synchronous under a `parking_lot::RwLock` that is
//! never held across an `.await`. Id assignment and the uniqueness check
//! for names happen under the same write lock, so concurrent registrations
//! of one name produce exactly one success.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use schemagate_core::{
    ResourceDatum, ResourceDatumId, ResourceType, ResourceTypeId, ResourceTypeName,
};
use serde_json::Value;

use crate::{ResourceStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    types_by_name: HashMap<String, ResourceType>,
    type_names_by_id: HashMap<ResourceTypeId, String>,
    data: Vec<ResourceDatum>,
    last_type_id: i32,
    last_datum_id: i32,
}

/// Process-local [`ResourceStore`].
///
/// Cheaply cloneable; all clones share the same data. Ids start at 1 and
/// increase monotonically, mirroring `SERIAL` columns.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered resource types.
    pub fn resource_type_count(&self) -> usize {
        self.inner.read().types_by_name.len()
    }

    /// All data admitted under `resource_type_id`, in insertion order.
    pub fn data_for(&self, resource_type_id: ResourceTypeId) -> Vec<ResourceDatum> {
        self.inner
            .read()
            .data
            .iter()
            .filter(|d| d.resource_type_id == resource_type_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn create_resource_type(
        &self,
        name: &ResourceTypeName,
        schema: &Value,
    ) -> Result<ResourceType, StoreError> {
        let mut guard = self.inner.write();
        if guard.types_by_name.contains_key(name.as_str()) {
            return Err(StoreError::DuplicateName(name.to_string()));
        }

        guard.last_type_id += 1;
        let record = ResourceType {
            id: ResourceTypeId(guard.last_type_id),
            name: name.clone(),
            schema: schema.clone(),
        };
        guard
            .type_names_by_id
            .insert(record.id, name.as_str().to_string());
        guard
            .types_by_name
            .insert(name.as_str().to_string(), record.clone());
        Ok(record)
    }

    async fn get_resource_type_by_name(&self, name: &str) -> Result<ResourceType, StoreError> {
        self.inner
            .read()
            .types_by_name
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn create_resource_datum(
        &self,
        resource_type_id: ResourceTypeId,
        data: &Value,
    ) -> Result<ResourceDatum, StoreError> {
        let mut guard = self.inner.write();
        // Same outcome as the foreign key on resource_data.resource_type_id.
        if !guard.type_names_by_id.contains_key(&resource_type_id) {
            return Err(StoreError::Unavailable(format!(
                "{resource_type_id} does not exist"
            )));
        }

        guard.last_datum_id += 1;
        let record = ResourceDatum {
            id: ResourceDatumId(guard.last_datum_id),
            resource_type_id,
            data: data.clone(),
            created_at: Utc::now(),
        };
        guard.data.push(record.clone());
        Ok(record)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn name(s: &str) -> ResourceTypeName {
        ResourceTypeName::new(s).unwrap()
    }

    #[tokio::test]
    async fn register_then_lookup_round_trips() {
        let store = MemoryStore::new();
        let schema = json!({"type": "object", "additionalProperties": false});
        let created = store
            .create_resource_type(&name("point"), &schema)
            .await
            .unwrap();
        assert_eq!(created.id, ResourceTypeId(1));

        let fetched = store.get_resource_type_by_name("point").await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.schema, schema);
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let store = MemoryStore::new();
        store
            .create_resource_type(&name("point"), &json!({}))
            .await
            .unwrap();
        let err = store
            .create_resource_type(&name("point"), &json!({"type": "object"}))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::DuplicateName("point".to_string()));
        assert_eq!(store.resource_type_count(), 1);
        // The original schema is untouched.
        let fetched = store.get_resource_type_by_name("point").await.unwrap();
        assert_eq!(fetched.schema, json!({}));
    }

    #[tokio::test]
    async fn unknown_name_is_not_found() {
        let store = MemoryStore::new();
        let err = store.get_resource_type_by_name("ghost").await.unwrap_err();
        assert_eq!(err, StoreError::NotFound("ghost".to_string()));
    }

    #[tokio::test]
    async fn data_ids_increase_and_reference_owner() {
        let store = MemoryStore::new();
        let a = store.create_resource_type(&name("a"), &json!({})).await.unwrap();
        let b = store.create_resource_type(&name("b"), &json!({})).await.unwrap();

        let d1 = store.create_resource_datum(a.id, &json!({"n": 1})).await.unwrap();
        let d2 = store.create_resource_datum(b.id, &json!({"n": 2})).await.unwrap();
        let d3 = store.create_resource_datum(a.id, &json!({"n": 3})).await.unwrap();

        assert_eq!(d1.id, ResourceDatumId(1));
        assert_eq!(d2.id, ResourceDatumId(2));
        assert_eq!(d3.id, ResourceDatumId(3));

        let for_a = store.data_for(a.id);
        assert_eq!(for_a.len(), 2);
        assert_eq!(for_a[1].data, json!({"n": 3}));
    }

    #[tokio::test]
    async fn datum_for_missing_type_fails() {
        let store = MemoryStore::new();
        let err = store
            .create_resource_datum(ResourceTypeId(42), &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn concurrent_registration_of_one_name_has_one_winner() {
        let store = MemoryStore::new();
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .create_resource_type(&ResourceTypeName::new("race").unwrap(), &json!({}))
                    .await
            }));
        }
        let mut ok = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                ok += 1;
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(store.resource_type_count(), 1);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = MemoryStore::new();
        let clone = store.clone();
        store.create_resource_type(&name("shared"), &json!({})).await.unwrap();
        assert!(clone.get_resource_type_by_name("shared").await.is_ok());
        assert!(clone.ping().await.is_ok());
    }
}
