use metrics::{counter, histogram};
use std::time::Instant;

/// Increment a counter for created valentines.
pub fn increment_valentine_created() {
    counter!("valentines_created_total").increment(1);
}

/// Count credential lookups, labelled by outcome.
pub fn increment_credential_lookup(found: bool) {
    let outcome = if found { "found" } else { "missing" };
    counter!("credential_lookups_total", "outcome" => outcome).increment(1);
}

/// Track HTTP request latency using a histogram.
pub fn track_http_request(start: Instant, path: &str, method: &str, status: u16) {
    let elapsed = start.elapsed();
    histogram!(
        "http_request_duration_seconds",
        "path" => path.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .record(elapsed);
}
