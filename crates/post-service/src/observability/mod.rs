//! Observability for the Post service: Prometheus metrics.

pub mod metrics;

pub use metrics::init_metrics_recorder;
