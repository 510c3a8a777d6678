//! # Integration Tests for schemagate-api
//!
//! Drives the full router with `oneshot` requests: registration, lookup,
//! document submission, error bodies, health probes, OpenAPI and metrics.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use tower::ServiceExt;

use schemagate_api::config::AppConfig;
use schemagate_api::state::AppState;
use schemagate_core::{ResourceDatum, ResourceType, ResourceTypeId, ResourceTypeName};
use schemagate_store::{MemoryStore, ResourceStore, StoreError};

fn test_app() -> axum::Router {
    schemagate_api::app(AppState::in_memory())
}

fn test_app_with_config(config: AppConfig) -> axum::Router {
    schemagate_api::app(AppState::with_store(Arc::new(MemoryStore::new()), config))
}

fn point_schema() -> Value {
    json!({
        "type": "object",
        "properties": {"x": {"type": "integer"}},
        "required": ["x"],
        "additionalProperties": false
    })
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn send_json(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn register(app: &axum::Router, name: &str, schema: Value) -> (StatusCode, Value) {
    let body = json!({"name": name, "schema": schema}).to_string();
    send_json(app, post_json("/resource-types", body)).await
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let app = test_app();
    let (status, body) = send(&app, get("/health/liveness")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn test_readiness_probe() {
    let app = test_app();
    let (status, body) = send(&app, get("/health/readiness")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ready");
}

/// Store whose every operation fails.
#[derive(Debug)]
struct DownStore;

#[async_trait]
impl ResourceStore for DownStore {
    async fn create_resource_type(
        &self,
        _name: &ResourceTypeName,
        _schema: &Value,
    ) -> Result<ResourceType, StoreError> {
        Err(StoreError::Unavailable("pool timed out".into()))
    }

    async fn get_resource_type_by_name(&self, _name: &str) -> Result<ResourceType, StoreError> {
        Err(StoreError::Unavailable("pool timed out".into()))
    }

    async fn create_resource_datum(
        &self,
        _resource_type_id: ResourceTypeId,
        _data: &Value,
    ) -> Result<ResourceDatum, StoreError> {
        Err(StoreError::Unavailable("pool timed out".into()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("pool timed out".into()))
    }
}

#[tokio::test]
async fn test_readiness_probe_reports_store_outage() {
    let app = schemagate_api::app(AppState::with_store(
        Arc::new(DownStore),
        AppConfig::default(),
    ));
    let (status, _) = send(&app, get("/health/readiness")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

// -- Resource Types -----------------------------------------------------------

#[tokio::test]
async fn test_register_resource_type() {
    let app = test_app();
    let (status, body) = register(&app, "point", point_schema()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "point");
    assert_eq!(body["schema"], point_schema());
    assert!(body["id"].is_i64());
}

#[tokio::test]
async fn test_register_then_get_round_trip() {
    let app = test_app();
    let (_, created) = register(&app, "point", point_schema()).await;

    let (status, fetched) = send_json(&app, get("/resource-types/point")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_get_unknown_resource_type_is_404() {
    let app = test_app();
    let (status, body) = send_json(&app, get("/resource-types/ghost")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_register_duplicate_is_409() {
    let app = test_app();
    register(&app, "point", point_schema()).await;
    let (status, body) = register(&app, "point", point_schema()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
    assert!(body["error"]["message"].as_str().unwrap().contains("point"));
}

#[tokio::test]
async fn test_register_missing_schema_is_400() {
    let app = test_app();
    let (status, body) = send_json(&app, post_json("/resource-types", r#"{"name":"point"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_register_missing_name_is_400() {
    let app = test_app();
    let (status, body) = send_json(
        &app,
        post_json("/resource-types", json!({"schema": point_schema()}).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_register_malformed_json_is_400() {
    let app = test_app();
    let (status, body) = send_json(&app, post_json("/resource-types", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_register_without_content_type_is_400() {
    let app = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/resource-types")
        .body(Body::from(
            json!({"name": "point", "schema": point_schema()}).to_string(),
        ))
        .unwrap();
    let (status, body) = send_json(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_register_non_strict_schema_accepted_by_default() {
    let app = test_app();
    let (status, _) = register(&app, "loose", json!({"type": "object"})).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_strict_registration_rejects_non_strict_schema() {
    let app = test_app_with_config(AppConfig {
        strict_registration: true,
        ..AppConfig::default()
    });
    let (status, body) = register(&app, "loose", json!({"type": "object"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "SCHEMA_NOT_STRICT");

    let (status, _) = send(&app, get("/resource-types/loose")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_store_outage_is_500_without_details() {
    let app = schemagate_api::app(AppState::with_store(
        Arc::new(DownStore),
        AppConfig::default(),
    ));
    let (status, body) = register(&app, "point", point_schema()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
    assert_eq!(body["error"]["message"], "An internal error occurred");
    assert!(!body.to_string().contains("pool timed out"));
}

// -- Resource Data ------------------------------------------------------------

#[tokio::test]
async fn test_submit_conforming_document() {
    let app = test_app();
    let (_, rt) = register(&app, "point", point_schema()).await;

    let (status, body) = send_json(&app, post_json("/resource-data/point", r#"{"x": 5}"#)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["resource_type_id"], rt["id"]);
    assert_eq!(body["data"], json!({"x": 5}));
    assert!(body["id"].is_i64());
    assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn test_submit_keeps_number_precision() {
    let app = test_app();
    register(
        &app,
        "measure",
        json!({
            "type": "object",
            "properties": {"x": {"type": "number"}},
            "additionalProperties": false
        }),
    )
    .await;

    let (status, body) = send(
        &app,
        post_json("/resource-data/measure", r#"{"x":123456789012345678901234567890}"#),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let body = String::from_utf8(body).unwrap();
    assert!(body.contains(r#""data":{"x":123456789012345678901234567890}"#), "{body}");

    let (status, _) = send(&app, post_json("/resource-data/measure", r#"{"x":1e400}"#)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_submit_wrong_type_is_schema_violation() {
    let app = test_app();
    register(&app, "point", point_schema()).await;

    let (status, body) =
        send_json(&app, post_json("/resource-data/point", r#"{"x": "str"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "SCHEMA_VIOLATION");
    let details = body["error"]["details"].as_array().unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0]["instance_path"], "/x");
    assert!(details[0]["message"].is_string());
}

#[tokio::test]
async fn test_submit_extra_field_is_schema_violation() {
    let app = test_app();
    register(&app, "point", point_schema()).await;

    let (status, body) =
        send_json(&app, post_json("/resource-data/point", r#"{"x": 5, "y": 1}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "SCHEMA_VIOLATION");
}

#[tokio::test]
async fn test_submit_unknown_type_is_404() {
    let app = test_app();
    let (status, body) = send_json(&app, post_json("/resource-data/ghost", r#"{"x": 5}"#)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_submit_unknown_type_with_malformed_body_is_404() {
    let app = test_app();
    let (status, _) = send(&app, post_json("/resource-data/ghost", "{oops")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_submit_malformed_body_is_400() {
    let app = test_app();
    register(&app, "point", point_schema()).await;

    let (status, body) = send_json(&app, post_json("/resource-data/point", "{oops")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_submit_to_non_strict_type_is_rejected() {
    let app = test_app();
    register(&app, "absent", json!({"type": "object"})).await;
    register(
        &app,
        "allowed",
        json!({"type": "object", "additionalProperties": true}),
    )
    .await;

    for name in ["absent", "allowed"] {
        let (status, body) =
            send_json(&app, post_json(&format!("/resource-data/{name}"), "{}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{name}");
        assert_eq!(body["error"]["code"], "SCHEMA_NOT_STRICT", "{name}");
    }
}

#[tokio::test]
async fn test_submit_against_uncompilable_schema_is_500() {
    let app = test_app();
    register(
        &app,
        "broken",
        json!({"type": 5, "additionalProperties": false}),
    )
    .await;

    let (status, body) = send_json(&app, post_json("/resource-data/broken", "{}")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
    assert_eq!(body["error"]["message"], "An internal error occurred");
}

#[tokio::test]
async fn test_submit_same_invalid_document_is_deterministic() {
    let app = test_app();
    register(&app, "point", point_schema()).await;

    let mut bodies = Vec::new();
    for _ in 0..3 {
        let (_, body) = send_json(
            &app,
            post_json("/resource-data/point", r#"{"x": "str", "y": true}"#),
        )
        .await;
        bodies.push(body);
    }
    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[1], bodies[2]);
}

#[tokio::test]
async fn test_body_over_limit_is_rejected() {
    let app = test_app_with_config(AppConfig {
        max_body_bytes: 256,
        ..AppConfig::default()
    });
    register(&app, "point", point_schema()).await;

    let big = format!(r#"{{"x": 5, "pad": "{}"}}"#, "a".repeat(1024));
    let (status, _) = send(&app, post_json("/resource-data/point", big)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

// -- OpenAPI & Metrics --------------------------------------------------------

#[tokio::test]
async fn test_openapi_spec() {
    let app = test_app();
    let (status, spec) = send_json(&app, get("/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(spec["info"]["title"], "SchemaGate API");
    assert!(spec["paths"]["/resource-types"].is_object());
    assert!(spec["paths"]["/resource-data/{resource_type_name}"].is_object());
}

#[tokio::test]
async fn test_metrics_not_mounted_without_recorder() {
    let app = test_app();
    let (status, _) = send(&app, get("/metrics")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_served_with_handle() {
    let handle = PrometheusBuilder::new().build_recorder().handle();
    let app = schemagate_api::app(AppState::in_memory().with_metrics(handle));
    let (status, _) = send(&app, get("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
}
