//! Metrics collection and exposition.
//!
//! # Metrics
//! - `langneg_requests_total` (counter): responses by status
//! - `langneg_negotiations_total` (counter): negotiations by outcome
//!   (`matched`, `no_match`, `header_absent`, `not_found`)
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(status: u16) {
    ::metrics::counter!("langneg_requests_total", "status" => status.to_string()).increment(1);
}

pub fn record_negotiation(outcome: &'static str) {
    ::metrics::counter!("langneg_negotiations_total", "outcome" => outcome).increment(1);
}
