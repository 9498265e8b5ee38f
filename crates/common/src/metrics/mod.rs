//! Metrics and observability utilities
//!
//! Prometheus metrics with standardized naming conventions.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all GrantFlow metrics
pub const METRICS_PREFIX: &str = "grantflow";

/// Histogram buckets for request latency (in seconds)
pub const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 2.500, 5.000,
];

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    describe_counter!(
        format!("{}_matches_created_total", METRICS_PREFIX),
        Unit::Count,
        "Total mentorship matches created, by initial status"
    );

    describe_counter!(
        format!("{}_match_transitions_total", METRICS_PREFIX),
        Unit::Count,
        "Total mentorship match status transitions"
    );

    describe_counter!(
        format!("{}_sessions_logged_total", METRICS_PREFIX),
        Unit::Count,
        "Total mentorship sessions logged"
    );

    describe_counter!(
        format!("{}_notifications_created_total", METRICS_PREFIX),
        Unit::Count,
        "Total notifications created"
    );

    describe_counter!(
        format!("{}_emails_sent_total", METRICS_PREFIX),
        Unit::Count,
        "Total transactional emails attempted, by outcome"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

/// Record a newly created match, by initial status
pub fn record_match_created(status: &str) {
    counter!(
        format!("{}_matches_created_total", METRICS_PREFIX),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a lifecycle status transition
pub fn record_transition(from: &str, to: &str) {
    counter!(
        format!("{}_match_transitions_total", METRICS_PREFIX),
        "from" => from.to_string(),
        "to" => to.to_string()
    )
    .increment(1);
}

/// Record a logged session
pub fn record_session_logged(mode: &str) {
    counter!(
        format!("{}_sessions_logged_total", METRICS_PREFIX),
        "mode" => mode.to_string()
    )
    .increment(1);
}

/// Record a created notification
pub fn record_notification(kind: &str) {
    counter!(
        format!("{}_notifications_created_total", METRICS_PREFIX),
        "kind" => kind.to_string()
    )
    .increment(1);
}

/// Record an email send attempt
pub fn record_email(template: &str, success: bool) {
    let outcome = if success { "sent" } else { "failed" };

    counter!(
        format!("{}_emails_sent_total", METRICS_PREFIX),
        "template" => template.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_buckets_sorted() {
        let mut prev = 0.0;
        for &bucket in LATENCY_BUCKETS {
            assert!(bucket > prev);
            prev = bucket;
        }
    }

    #[test]
    fn test_request_metrics() {
        let metrics = RequestMetrics::start("POST", "/v1/mentorship/request");
        std::thread::sleep(std::time::Duration::from_millis(10));
        metrics.finish(201);
        // Just verify it runs without panic
    }
}
