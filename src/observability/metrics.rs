//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cadenza_routes_bound_total` (counter): routes installed, by verb
//! - `cadenza_route_bindings_skipped_total` (counter): bindings lost to an earlier registration
//! - `cadenza_requests_total` (counter): requests reaching a controller route, by verb
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus exporter is opt-in (`observability.metrics_enabled`)

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::routing::Verb;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_route_bound(verb: Verb) {
    metrics::counter!("cadenza_routes_bound_total", "verb" => verb.as_str()).increment(1);
}

pub fn record_binding_skipped() {
    metrics::counter!("cadenza_route_bindings_skipped_total").increment(1);
}

pub fn record_request(verb: Verb) {
    metrics::counter!("cadenza_requests_total", "verb" => verb.as_str()).increment(1);
}
