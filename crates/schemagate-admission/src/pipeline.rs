//! # Admission Pipeline
//!
//! Linear state machines for the two write operations. Neither retries;
//! the first failing step ends the request.
//!
//! ## Register
//!
//! 1. Validate the name and require a schema document.
//! 2. (Opt-in) require a strict schema.
//! 3. Insert. A taken name is a conflict.
//!
//! ## Submit
//!
//! 1. Look up the target resource type.
//! 2. Parse the raw body as JSON. Numbers keep their exact textual form.
//! 3. Require a strict stored schema.
//! 4. Compile the schema and validate the document.
//! 5. Insert the document.
//!
//! The type lookup runs before the body is parsed, so an unknown type is
//! reported as not found even when the body is also malformed.
//!
//! Dropping a submit future before step 5 leaves the store untouched.

use std::sync::Arc;

use schemagate_core::{ResourceDatum, ResourceType, ResourceTypeName};
use schemagate_schema::{strictness_finding, SchemaValidator};
use schemagate_store::{ResourceStore, StoreError};
use serde_json::Value;

use crate::error::AdmissionError;
use crate::policy::AdmissionPolicy;

const ADMISSIONS_TOTAL: &str = "schemagate_admissions_total";

/// The admission pipeline.
///
/// Cheap to share behind an `Arc`: it holds the injected store, a
/// configuration-only validator and the policy.
#[derive(Debug, Clone)]
pub struct AdmissionPipeline {
    store: Arc<dyn ResourceStore>,
    validator: SchemaValidator,
    policy: AdmissionPolicy,
}

impl AdmissionPipeline {
    /// Build a pipeline over `store` with the default policy.
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self::with_policy(store, AdmissionPolicy::default())
    }

    /// Build a pipeline over `store` with an explicit policy.
    pub fn with_policy(store: Arc<dyn ResourceStore>, policy: AdmissionPolicy) -> Self {
        Self {
            store,
            validator: SchemaValidator::new(),
            policy,
        }
    }

    /// The active policy.
    pub fn policy(&self) -> &AdmissionPolicy {
        &self.policy
    }

    /// The injected store.
    pub fn store(&self) -> &Arc<dyn ResourceStore> {
        &self.store
    }

    /// Register a new resource type.
    ///
    /// `schema` of `None` or JSON `null` counts as absent.
    pub async fn register_resource_type(
        &self,
        name: &str,
        schema: Option<Value>,
    ) -> Result<ResourceType, AdmissionError> {
        let result = self.register(name, schema).await;
        record_outcome("register", &result);
        result
    }

    /// Validate and store a document for the resource type `resource_type_name`.
    ///
    /// `raw` is the unparsed request body.
    pub async fn submit_resource_data(
        &self,
        resource_type_name: &str,
        raw: &[u8],
    ) -> Result<ResourceDatum, AdmissionError> {
        let result = self.submit(resource_type_name, raw).await;
        record_outcome("submit", &result);
        result
    }

    /// Fetch a registered resource type by name.
    pub async fn resource_type(&self, name: &str) -> Result<ResourceType, AdmissionError> {
        self.lookup(name).await
    }

    async fn register(
        &self,
        name: &str,
        schema: Option<Value>,
    ) -> Result<ResourceType, AdmissionError> {
        let name = ResourceTypeName::new(name)
            .map_err(|e| AdmissionError::InvalidRequest(e.to_string()))?;
        let schema = match schema {
            Some(Value::Null) | None => {
                return Err(AdmissionError::InvalidRequest(
                    "schema is required".to_string(),
                ))
            }
            Some(schema) => schema,
        };

        if self.policy.strict_on_register {
            if let Some(finding) = strictness_finding(&schema) {
                tracing::warn!(
                    resource_type = %name,
                    %finding,
                    "registration rejected: schema is not strict"
                );
                return Err(AdmissionError::SchemaNotStrict {
                    resource_type: name.into_inner(),
                    finding,
                });
            }
        }

        let record = self
            .store
            .create_resource_type(&name, &schema)
            .await
            .map_err(|e| match e {
                StoreError::DuplicateName(n) => AdmissionError::DuplicateName(n),
                other => {
                    tracing::error!(resource_type = %name, error = %other, "failed to insert resource type");
                    AdmissionError::StoreUnavailable(other.to_string())
                }
            })?;

        tracing::info!(resource_type = %record.name, id = %record.id, "resource type registered");
        Ok(record)
    }

    async fn submit(
        &self,
        resource_type_name: &str,
        raw: &[u8],
    ) -> Result<ResourceDatum, AdmissionError> {
        let resource_type = self.lookup(resource_type_name).await?;

        let data: Value = serde_json::from_slice(raw)
            .map_err(|e| AdmissionError::MalformedInput(e.to_string()))?;

        self.check_admissible(&resource_type, &data)?;

        let datum = self
            .store
            .create_resource_datum(resource_type.id, &data)
            .await
            .map_err(|e| {
                tracing::error!(
                    resource_type = %resource_type.name,
                    error = %e,
                    "validated data could not be persisted"
                );
                AdmissionError::StoreUnavailable(e.to_string())
            })?;

        tracing::info!(
            resource_type = %resource_type.name,
            id = %datum.id,
            "resource data stored"
        );
        Ok(datum)
    }

    /// Strictness, compilation and validation, in that order.
    fn check_admissible(
        &self,
        resource_type: &ResourceType,
        data: &Value,
    ) -> Result<(), AdmissionError> {
        if let Some(finding) = strictness_finding(&resource_type.schema) {
            tracing::warn!(
                resource_type = %resource_type.name,
                %finding,
                "sanity check failed: additionalProperties is not explicitly false"
            );
            return Err(AdmissionError::SchemaNotStrict {
                resource_type: resource_type.name.to_string(),
                finding,
            });
        }

        let violations = self
            .validator
            .validate(&resource_type.schema, data)
            .map_err(|source| {
                tracing::error!(
                    resource_type = %resource_type.name,
                    error = %source,
                    "stored schema does not compile"
                );
                AdmissionError::ValidatorFault {
                    resource_type: resource_type.name.to_string(),
                    source,
                }
            })?;

        if !violations.is_empty() {
            tracing::warn!(
                resource_type = %resource_type.name,
                count = violations.len(),
                %violations,
                "validation failed"
            );
            return Err(AdmissionError::SchemaViolation {
                resource_type: resource_type.name.to_string(),
                violations,
            });
        }

        Ok(())
    }

    async fn lookup(&self, name: &str) -> Result<ResourceType, AdmissionError> {
        self.store
            .get_resource_type_by_name(name)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(n) => AdmissionError::UnknownResourceType(n),
                other => {
                    tracing::error!(resource_type = name, error = %other, "resource type lookup failed");
                    AdmissionError::StoreUnavailable(other.to_string())
                }
            })
    }
}

fn record_outcome<T>(operation: &'static str, result: &Result<T, AdmissionError>) {
    let outcome = match result {
        Ok(_) => "admitted",
        Err(e) => e.outcome(),
    };
    metrics::counter!(ADMISSIONS_TOTAL, "operation" => operation, "outcome" => outcome)
        .increment(1);
}
