//! Application state shared by all handlers.

use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::ApiConfig;

pub struct AppState {
    pub config: ApiConfig,
    /// Absent when no global recorder was installed (tests).
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: ApiConfig, prometheus: Option<PrometheusHandle>) -> Self {
        Self { config, prometheus }
    }
}
