//! # schemagate-api: Axum HTTP Service for SchemaGate
//!
//! Exposes the admission pipeline over HTTP.
//!
//! ## API Surface
//!
//! | Route | Module |
//! |---|---|
//! | `POST /resource-types` | [`routes::resource_types`] |
//! | `GET /resource-types/{name}` | [`routes::resource_types`] |
//! | `POST /resource-data/{resource_type_name}` | [`routes::resource_data`] |
//! | `GET /openapi.json` | [`openapi`] |
//! | `GET /metrics` | [`middleware::metrics`] |
//! | `GET /health/*` | probes |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! DefaultBodyLimit → TraceLayer → MetricsMiddleware → Handler
//! ```

pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// `/metrics` is only mounted when the state carries a Prometheus handle.
pub fn app(state: AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    let mut api = Router::new()
        .merge(routes::resource_types::router())
        .merge(routes::resource_data::router())
        .merge(openapi::router());
    if state.metrics.is_some() {
        api = api.route("/metrics", get(middleware::metrics::render_metrics));
    }

    let api = api
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state.clone());

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .with_state(state);

    Router::new().merge(health).merge(api)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 when the store answers, 503 otherwise.
async fn readiness(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.store().ping().await {
        Ok(()) => (StatusCode::OK, "ready"),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "store unavailable")
        }
    }
}
