//! # Prometheus Metrics
//!
//! Request counters recorded through the `metrics` facade. `main` installs
//! the Prometheus recorder; without one (as in tests) the counters are
//! no-ops.

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

use crate::state::AppState;

/// Counter of completed HTTP requests, labelled by status class.
pub const HTTP_REQUESTS_TOTAL: &str = "schemagate_http_requests_total";

/// Install the global Prometheus recorder.
///
/// Fails if a recorder is already installed.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// `2xx`, `4xx`, ... for a response status.
pub fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    }
}

/// Middleware that counts every response by status class.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    metrics::counter!(HTTP_REQUESTS_TOTAL, "status_class" => status_class(response.status()))
        .increment(1);
    response
}

/// GET /metrics: Prometheus text exposition.
pub async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
