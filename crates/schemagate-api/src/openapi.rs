//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI 3.1 spec
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SchemaGate API",
        version = "0.1.0",
        description = "Register JSON Schema resource types and submit documents that are admitted only when they conform.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        crate::routes::resource_types::create_resource_type,
        crate::routes::resource_types::get_resource_type,
        crate::routes::resource_data::submit_resource_data,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::resource_types::CreateResourceTypeRequest,
        crate::routes::resource_types::ResourceTypeResponse,
        crate::routes::resource_data::ResourceDatumResponse,
    )),
    tags(
        (name = "resource_types", description = "Resource type registration"),
        (name = "resource_data", description = "Schema-validated document submission"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
