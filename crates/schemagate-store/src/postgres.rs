//! Postgres resource store.
//!
//! Operates on the `resource_types` and `resource_data` tables created by
//! the embedded migrations in `migrations/`. Every operation is a single
//! statement; unique-name enforcement is the `resource_types.name` index.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use schemagate_core::{
    ResourceDatum, ResourceDatumId, ResourceType, ResourceTypeId, ResourceTypeName,
};
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::{ResourceStore, StoreError};

/// Connection pool settings.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Upper bound on open connections.
    pub max_connections: u32,
    /// How long a request waits for a free connection before failing.
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 20,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// [`ResourceStore`] backed by a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to `url`, apply migrations, and return a ready store.
    ///
    /// Migrations only create missing tables, so running this against an
    /// already-initialized database is safe.
    pub async fn connect(url: &str, config: &PoolConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(url)
            .await?;
        tracing::info!("Connected to PostgreSQL");

        let store = Self::from_pool(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Wrap an existing pool without running migrations.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the embedded migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations applied");
        Ok(())
    }
}

#[async_trait]
impl ResourceStore for PgStore {
    async fn create_resource_type(
        &self,
        name: &ResourceTypeName,
        schema: &Value,
    ) -> Result<ResourceType, StoreError> {
        let result = sqlx::query_scalar::<_, i32>(
            "INSERT INTO resource_types (name, schema) VALUES ($1, $2) RETURNING id",
        )
        .bind(name.as_str())
        .bind(schema)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(id) => Ok(ResourceType {
                id: ResourceTypeId(id),
                name: name.clone(),
                schema: schema.clone(),
            }),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::DuplicateName(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_resource_type_by_name(&self, name: &str) -> Result<ResourceType, StoreError> {
        let row = sqlx::query_as::<_, ResourceTypeRow>(
            "SELECT id, name, schema FROM resource_types WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.into_record(),
            None => Err(StoreError::NotFound(name.to_string())),
        }
    }

    async fn create_resource_datum(
        &self,
        resource_type_id: ResourceTypeId,
        data: &Value,
    ) -> Result<ResourceDatum, StoreError> {
        let (id, created_at) = sqlx::query_as::<_, (i32, NaiveDateTime)>(
            "INSERT INTO resource_data (resource_type_id, data) VALUES ($1, $2)
             RETURNING id, COALESCE(created_at, LOCALTIMESTAMP)",
        )
        .bind(resource_type_id.get())
        .bind(data)
        .fetch_one(&self.pool)
        .await?;

        Ok(ResourceDatum {
            id: ResourceDatumId(id),
            resource_type_id,
            data: data.clone(),
            created_at: created_at.and_utc(),
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct ResourceTypeRow {
    id: i32,
    name: String,
    schema: Value,
}

impl ResourceTypeRow {
    fn into_record(self) -> Result<ResourceType, StoreError> {
        let name = ResourceTypeName::new(self.name).map_err(|e| {
            tracing::warn!(id = self.id, error = %e, "invalid resource type name in database");
            StoreError::Unavailable(format!("stored resource type {} is invalid: {e}", self.id))
        })?;
        Ok(ResourceType {
            id: ResourceTypeId(self.id),
            name,
            schema: self.schema,
        })
    }
}
