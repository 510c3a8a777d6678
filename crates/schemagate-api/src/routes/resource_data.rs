//! # Resource Data API
//!
//! - `POST /resource-data/{resource_type_name}`: Submit a document
//!
//! The body is taken as raw bytes so the resource type is resolved before
//! the document is parsed: an unknown type is a 404 even when the body is
//! not JSON.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use schemagate_core::ResourceDatum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::state::AppState;

/// A stored document.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResourceDatumResponse {
    /// Store-assigned identifier.
    pub id: i32,
    /// Identifier of the resource type the document was validated against.
    pub resource_type_id: i32,
    /// The document exactly as submitted.
    #[schema(value_type = Object)]
    pub data: Value,
    /// When the document was stored (UTC).
    pub created_at: DateTime<Utc>,
}

impl From<ResourceDatum> for ResourceDatumResponse {
    fn from(datum: ResourceDatum) -> Self {
        Self {
            id: datum.id.get(),
            resource_type_id: datum.resource_type_id.get(),
            data: datum.data,
            created_at: datum.created_at,
        }
    }
}

/// Build the resource data router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/resource-data/{resource_type_name}",
        post(submit_resource_data),
    )
}

/// POST /resource-data/{resource_type_name}: Validate and store a document.
#[utoipa::path(
    post,
    path = "/resource-data/{resource_type_name}",
    params(("resource_type_name" = String, Path, description = "Target resource type")),
    request_body(content = serde_json::Value, description = "Document to validate", content_type = "application/json"),
    responses(
        (status = 201, description = "Document admitted and stored", body = ResourceDatumResponse),
        (status = 400, description = "Malformed JSON, non-strict schema, or schema violation", body = crate::error::ErrorBody),
        (status = 404, description = "Resource type not found", body = crate::error::ErrorBody),
    ),
    tag = "resource_data"
)]
async fn submit_resource_data(
    State(state): State<AppState>,
    Path(resource_type_name): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<ResourceDatumResponse>), AppError> {
    let datum = state
        .pipeline
        .submit_resource_data(&resource_type_name, &body)
        .await?;
    Ok((StatusCode::CREATED, Json(datum.into())))
}
