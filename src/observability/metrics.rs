//! Metrics collection and exposition.
//!
//! # Metrics
//! - `devon_rex_operations_total` (counter): entry point calls by operation, outcome
//! - `devon_rex_emergency_transfers_total` (counter): completed recoveries
//! - `devon_rex_blacklisted_accounts` (gauge): accounts in the terminal state
//! - `devon_rex_http_request_duration_seconds` (histogram): API latency
//!
//! # Design Decisions
//! - Outcome label is the error code, so rejected recoveries are visible by reason
//! - Recording is a no-op until `init_metrics` installs the exporter

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with an HTTP listener on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one entry point call. `outcome` is `"ok"` or an error code.
pub fn record_operation(operation: &'static str, outcome: &'static str) {
    counter!(
        "devon_rex_operations_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a completed emergency transfer.
pub fn record_emergency_transfer() {
    counter!("devon_rex_emergency_transfers_total").increment(1);
}

/// Update the blacklisted account gauge.
pub fn record_blacklisted(count: usize) {
    gauge!("devon_rex_blacklisted_accounts").set(count as f64);
}

/// Record API request latency.
pub fn record_request(route: &str, status: u16, start: Instant) {
    histogram!(
        "devon_rex_http_request_duration_seconds",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
