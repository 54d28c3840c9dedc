//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gate_blocks_ingested_total` (counter): blocks fully processed
//! - `gate_block_fetch_failures_total` (counter): failed block fetches (retried)
//! - `gate_transactions_published_total` (counter): transactions put on the bus
//! - `gate_publish_failures_total` (counter): transactions the bus refused
//! - `gate_ingest_cursor` (gauge): next height the ingestion loop will fetch
//! - `gate_node_requests_total` (counter): node calls by operation and outcome

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_block_ingested(height: u64) {
    ::metrics::counter!("gate_blocks_ingested_total").increment(1);
    ::metrics::gauge!("gate_ingest_cursor").set((height + 1) as f64);
}

pub fn record_block_fetch_failure() {
    ::metrics::counter!("gate_block_fetch_failures_total").increment(1);
}

pub fn record_transaction_published() {
    ::metrics::counter!("gate_transactions_published_total").increment(1);
}

pub fn record_publish_failure() {
    ::metrics::counter!("gate_publish_failures_total").increment(1);
}

pub fn record_cursor(height: u64) {
    ::metrics::gauge!("gate_ingest_cursor").set(height as f64);
}

/// Record a node call. `outcome` is one of `ok`, `transport`, `node`.
pub fn record_node_request(operation: &'static str, outcome: &'static str) {
    ::metrics::counter!("gate_node_requests_total", "operation" => operation, "outcome" => outcome)
        .increment(1);
}
