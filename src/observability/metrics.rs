//! Adapter lifecycle metrics.
//!
//! # Metrics
//! - `scaffold_adapters_running` (gauge): adapters whose `start` has not returned
//! - `scaffold_adapter_exits_total` (counter): exits by adapter and outcome
//!
//! Updates are no-ops until a recorder is installed with [`init_metrics`].

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const ADAPTERS_RUNNING: &str = "scaffold_adapters_running";
pub const ADAPTER_EXITS: &str = "scaffold_adapter_exits_total";

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_adapter_started(adapter: &'static str) {
    metrics::gauge!(ADAPTERS_RUNNING).increment(1.0);
    tracing::trace!(adapter, "Adapter task spawned");
}

pub fn record_adapter_exit(adapter: &'static str, success: bool) {
    let outcome = if success { "ok" } else { "error" };
    metrics::gauge!(ADAPTERS_RUNNING).decrement(1.0);
    metrics::counter!(ADAPTER_EXITS, "adapter" => adapter, "outcome" => outcome).increment(1);
}
