//! Prometheus metrics handler.

use axum::extract::State;
use metrics_exporter_prometheus::PrometheusHandle;

/// Handler for GET /metrics
///
/// Renders the Prometheus text exposition format.
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}
