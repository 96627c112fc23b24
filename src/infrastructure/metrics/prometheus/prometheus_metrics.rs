//! Prometheus metrics implementation.
//!
//! Concrete implementation of the `Metrics` trait using the Prometheus text
//! format. It delegates to utility functions in sibling modules
//! (`counters.rs`, `recorder.rs`) which handle the actual collection via the
//! global `metrics` crate registry.

use crate::domain::Metrics;
use std::time::Instant;

/// Prometheus-based metrics implementation.
///
/// Empty because all metrics are registered globally through `counter!()` and
/// `histogram!()`, and the global `PrometheusHandle` in `recorder.rs` renders them.
#[derive(Default)]
pub struct PrometheusMetrics {}

impl PrometheusMetrics {
    pub fn new() -> Self {
        tracing::info!("Creating Prometheus metrics");
        PrometheusMetrics {}
    }
}

impl Metrics for PrometheusMetrics {
    fn render(&self) -> String {
        super::render_metrics()
    }

    fn record_valentine_created(&self) {
        tracing::debug!("Recording valentine created event");
        super::increment_valentine_created();
    }

    fn record_credential_lookup(&self, found: bool) {
        super::increment_credential_lookup(found);
    }

    fn record_http_request(&self, start: Instant, path: &str, method: &str, status: u16) {
        super::track_http_request(start, path, method, status);
    }
}
