//! Metrics definitions for the Post service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `post_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `method`: HTTP methods
//! - `endpoint`: route templates, anything else collapses to `/other`
//! - `status`: success, error, timeout
//! - `operation`: store operation names fixed in code

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize the Prometheus metrics recorder and return the handle
/// for serving metrics via HTTP.
///
/// # Errors
///
/// Returns error if the recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("post_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.150, 0.200, 0.300, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("post_db_query".to_string()),
            &[
                0.001, 0.002, 0.005, 0.010, 0.020, 0.050, 0.100, 0.250, 0.500, 1.000,
            ],
        )
        .map_err(|e| format!("Failed to set DB query buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion
///
/// Metric: `post_http_requests_total`, `post_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status`
pub fn record_http_request(method: &str, path: &str, status_code: u16, duration: Duration) {
    let endpoint = normalize_endpoint(path);
    let status = categorize_status_code(status_code);

    histogram!("post_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => endpoint,
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("post_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Categorize HTTP status code into success/error/timeout
fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Map a request path onto its route template.
fn normalize_endpoint(path: &str) -> &'static str {
    match path {
        "/" => "/",
        "/ping" => "/ping",
        "/posts" => "/posts",
        "/metrics" => "/metrics",
        _ => match path.strip_prefix("/posts/") {
            Some(id) if !id.is_empty() && !id.contains('/') => "/posts/{id}",
            _ => "/other",
        },
    }
}

// ============================================================================
// Database Metrics
// ============================================================================

/// Record store query execution
///
/// Metric: `post_db_query_duration_seconds`, `post_db_queries_total`
/// Labels: `operation`, `status`
pub fn record_db_query(operation: &'static str, status: &'static str, duration: Duration) {
    histogram!("post_db_query_duration_seconds",
        "operation" => operation
    )
    .record(duration.as_secs_f64());

    counter!("post_db_queries_total",
        "operation" => operation,
        "status" => status
    )
    .increment(1);
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};

    type Recorded = Vec<(metrics::Key, DebugValue)>;

    /// Run `f` against a thread-local debugging recorder and return what it
    /// recorded.
    fn capture(f: impl FnOnce()) -> Recorded {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        metrics::with_local_recorder(&recorder, f);

        snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .map(|(key, _, _, value)| (key.key().clone(), value))
            .collect()
    }

    fn find<'a>(recorded: &'a Recorded, name: &str, labels: &[(&str, &str)]) -> Option<&'a DebugValue> {
        recorded.iter().find_map(|(key, value)| {
            let matches = key.name() == name
                && labels
                    .iter()
                    .all(|(k, v)| key.labels().any(|l| l.key() == *k && l.value() == *v));
            matches.then_some(value)
        })
    }

    #[test]
    fn test_record_http_request() {
        let recorded = capture(|| {
            record_http_request("GET", "/posts", 200, Duration::from_millis(5));
            record_http_request("PUT", "/posts/abc", 404, Duration::from_millis(3));
            record_http_request("PUT", "/posts/def", 404, Duration::from_millis(4));
        });

        assert!(matches!(
            find(
                &recorded,
                "post_http_requests_total",
                &[("method", "GET"), ("endpoint", "/posts"), ("status_code", "200")]
            ),
            Some(DebugValue::Counter(1))
        ));
        assert!(matches!(
            find(
                &recorded,
                "post_http_requests_total",
                &[("method", "PUT"), ("endpoint", "/posts/{id}"), ("status_code", "404")]
            ),
            Some(DebugValue::Counter(2))
        ));

        match find(
            &recorded,
            "post_http_request_duration_seconds",
            &[("endpoint", "/posts"), ("status", "success")],
        ) {
            Some(DebugValue::Histogram(samples)) => {
                assert_eq!(samples.len(), 1);
                let seconds = samples.first().map(|s| s.into_inner()).unwrap();
                assert!((seconds - 0.005).abs() < 1e-9);
            }
            other => panic!("expected a duration histogram, got {other:?}"),
        }
    }

    #[test]
    fn test_record_db_query() {
        let recorded = capture(|| {
            record_db_query("find_all", "success", Duration::from_millis(2));
            record_db_query("create", "error", Duration::from_millis(9));
        });

        assert!(matches!(
            find(
                &recorded,
                "post_db_queries_total",
                &[("operation", "create"), ("status", "error")]
            ),
            Some(DebugValue::Counter(1))
        ));
        assert!(matches!(
            find(
                &recorded,
                "post_db_query_duration_seconds",
                &[("operation", "find_all")]
            ),
            Some(DebugValue::Histogram(samples)) if samples.len() == 1
        ));
    }

    #[test]
    fn test_categorize_status_code() {
        assert_eq!(categorize_status_code(200), "success");
        assert_eq!(categorize_status_code(204), "success");
        assert_eq!(categorize_status_code(408), "timeout");
        assert_eq!(categorize_status_code(504), "timeout");
        assert_eq!(categorize_status_code(400), "error");
        assert_eq!(categorize_status_code(401), "error");
        assert_eq!(categorize_status_code(500), "error");
    }

    #[test]
    fn test_normalize_endpoint_known_paths() {
        assert_eq!(normalize_endpoint("/"), "/");
        assert_eq!(normalize_endpoint("/ping"), "/ping");
        assert_eq!(normalize_endpoint("/posts"), "/posts");
        assert_eq!(normalize_endpoint("/metrics"), "/metrics");
    }

    #[test]
    fn test_normalize_endpoint_post_ids() {
        assert_eq!(
            normalize_endpoint("/posts/550e8400-e29b-41d4-a716-446655440000"),
            "/posts/{id}"
        );
        assert_eq!(normalize_endpoint("/posts/x"), "/posts/{id}");
    }

    #[test]
    fn test_normalize_endpoint_unknown_paths() {
        assert_eq!(normalize_endpoint("/posts/"), "/other");
        assert_eq!(normalize_endpoint("/posts/a/b"), "/other");
        assert_eq!(normalize_endpoint("/admin"), "/other");
    }
}
