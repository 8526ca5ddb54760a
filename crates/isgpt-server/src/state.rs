//! Shared application state

use isgpt_detector::Detector;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// State handed to every request handler
#[derive(Clone)]
pub struct AppState {
    /// The loaded detector; its model lock serializes inference
    pub detector: Arc<Detector>,

    /// Prometheus handle for rendering `/metrics`, if a recorder is installed
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(detector: Detector) -> Self {
        Self {
            detector: Arc::new(detector),
            metrics_handle: None,
        }
    }

    /// Attach a Prometheus handle
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}
