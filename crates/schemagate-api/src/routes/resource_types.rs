//! # Resource Type API
//!
//! - `POST /resource-types`: register a resource type
//! - `GET /resource-types/{name}`: fetch a resource type by name

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use schemagate_core::{ResourceType, ResourceTypeName};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request to register a resource type.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateResourceTypeRequest {
    /// Unique, non-empty name (at most 255 characters).
    pub name: String,
    /// JSON Schema document. Submissions are only admitted when its root
    /// sets `"additionalProperties": false`.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub schema: Option<Value>,
}

impl Validate for CreateResourceTypeRequest {
    fn validate(&self) -> Result<(), String> {
        ResourceTypeName::new(self.name.as_str()).map_err(|e| e.to_string())?;
        match &self.schema {
            None | Some(Value::Null) => Err("schema is required".to_string()),
            Some(_) => Ok(()),
        }
    }
}

/// A registered resource type.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResourceTypeResponse {
    /// Store-assigned identifier.
    pub id: i32,
    /// Unique resource type name.
    pub name: String,
    /// The schema exactly as registered.
    #[schema(value_type = Object)]
    pub schema: Value,
}

impl From<ResourceType> for ResourceTypeResponse {
    fn from(record: ResourceType) -> Self {
        Self {
            id: record.id.get(),
            name: record.name.into_inner(),
            schema: record.schema,
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the resource types router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/resource-types", post(create_resource_type))
        .route("/resource-types/{name}", get(get_resource_type))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /resource-types: Register a new resource type.
#[utoipa::path(
    post,
    path = "/resource-types",
    request_body = CreateResourceTypeRequest,
    responses(
        (status = 201, description = "Resource type registered", body = ResourceTypeResponse),
        (status = 400, description = "Malformed request or missing field", body = crate::error::ErrorBody),
        (status = 409, description = "Name already registered", body = crate::error::ErrorBody),
    ),
    tag = "resource_types"
)]
async fn create_resource_type(
    State(state): State<AppState>,
    body: Result<Json<CreateResourceTypeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ResourceTypeResponse>), AppError> {
    let req = extract_validated_json(body)?;
    let record = state
        .pipeline
        .register_resource_type(&req.name, req.schema)
        .await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// GET /resource-types/{name}: Fetch a resource type.
#[utoipa::path(
    get,
    path = "/resource-types/{name}",
    params(("name" = String, Path, description = "Resource type name")),
    responses(
        (status = 200, description = "Resource type found", body = ResourceTypeResponse),
        (status = 404, description = "Resource type not found", body = crate::error::ErrorBody),
    ),
    tag = "resource_types"
)]
async fn get_resource_type(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ResourceTypeResponse>, AppError> {
    let record = state.pipeline.resource_type(&name).await?;
    Ok(Json(record.into()))
}
