//! Request logging middleware.
//!
//! Wraps everything after CORS, so it observes every response produced by
//! authentication, the handlers, and framework-level rejections alike:
//! - 401 Unauthorized (missing or unknown API key)
//! - 400 Bad Request (body decode errors)
//! - 404 Not Found / 405 Method Not Allowed
//!
//! For each request it emits one `post.http.request` event carrying latency,
//! path and status, and records the HTTP request metrics.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::observability::metrics::record_http_request;

/// Middleware that logs latency, route and status for every response.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status().as_u16();

    tracing::info!(
        target: "post.http.request",
        method = %method,
        route = %path,
        status,
        latency_ms = latency.as_secs_f64() * 1000.0,
        "Request completed"
    );
    record_http_request(&method, &path, status, latency);

    response
}
