use crate::domain::Metrics;
use std::time::Instant;

/// No-op metrics implementation for testing.
#[derive(Default)]
pub struct NoopMetrics;

impl NoopMetrics {
    pub fn new() -> Self {
        NoopMetrics
    }
}

impl Metrics for NoopMetrics {
    // ---
    fn render(&self) -> String {
        String::new()
    }
    fn record_valentine_created(&self) {}
    fn record_credential_lookup(&self, _: bool) {}
    fn record_http_request(&self, _: Instant, _: &str, _: &str, _: u16) {}
}
