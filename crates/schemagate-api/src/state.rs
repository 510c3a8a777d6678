//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. Holds the admission pipeline (which owns the
//! injected store), the configuration, and the Prometheus handle when a
//! recorder is installed.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use schemagate_admission::AdmissionPipeline;
use schemagate_store::{MemoryStore, ResourceStore};

use crate::config::AppConfig;

/// Shared application state. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AdmissionPipeline>,
    pub config: AppConfig,
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("pipeline", &self.pipeline)
            .field("config", &self.config)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl AppState {
    /// Build state over `store` using the policy selected by `config`.
    pub fn with_store(store: Arc<dyn ResourceStore>, config: AppConfig) -> Self {
        let pipeline = AdmissionPipeline::with_policy(store, config.admission_policy());
        Self {
            pipeline: Arc::new(pipeline),
            config,
            metrics: None,
        }
    }

    /// State backed by a fresh [`MemoryStore`] and default configuration.
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), AppConfig::default())
    }

    /// Attach a Prometheus handle; enables `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// The store behind the pipeline.
    pub fn store(&self) -> &Arc<dyn ResourceStore> {
        self.pipeline.store()
    }
}
