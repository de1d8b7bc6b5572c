//! Application state for Axum handlers.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::AppConfig;
use crate::service::clock::TimeSource;
use crate::service::{FormattedService, SharedGenerator};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Raw snowflake id generator.
    pub generator: Arc<SharedGenerator>,
    /// Calendar-string id service.
    pub formatted_service: Arc<FormattedService<Arc<dyn TimeSource>>>,
    /// Prometheus recorder handle, if one was installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(config: Arc<AppConfig>, generator: Arc<SharedGenerator>) -> Self {
        let formatted_service = Arc::new(FormattedService::new(
            Arc::clone(&generator),
            config.generator.calendar_zone,
        ));

        Self {
            config,
            generator,
            formatted_service,
            metrics: None,
        }
    }

    /// Attach a Prometheus recorder handle for `/metrics`.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
