//! Metrics collection and exposition.
//!
//! # Metrics
//! - `goat_requests_total` (counter): requests by endpoint and channel
//! - `goat_insecure_exposures_total` (counter): plaintext requests that
//!   leaked account data or credentials, by endpoint
//! - `goat_malformed_requests_total` (counter): rejected registration bodies
//!   by channel

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::security::Channel;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(endpoint: &'static str, channel: Channel) {
    metrics::counter!(
        "goat_requests_total",
        "endpoint" => endpoint,
        "channel" => channel.as_str()
    )
    .increment(1);
}

pub fn record_exposure(endpoint: &'static str) {
    metrics::counter!("goat_insecure_exposures_total", "endpoint" => endpoint).increment(1);
}

pub fn record_malformed(channel: Channel) {
    metrics::counter!("goat_malformed_requests_total", "channel" => channel.as_str())
        .increment(1);
}
