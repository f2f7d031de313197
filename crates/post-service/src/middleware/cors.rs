//! CORS policy.
//!
//! Any origin, methods GET/POST/PUT/DELETE, any request header, credentials
//! allowed, preflight cached for the configured duration.
//!
//! Browsers refuse `*` together with credentials, so origin and request
//! headers are mirrored back instead of answered with a wildcard.
//!
//! Preflights answered by the layer carry `204 No Content`.

use axum::{
    extract::Request,
    http::{header, Method, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Duration;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

/// Methods advertised to cross-origin callers.
pub const ALLOWED_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

/// Build the CORS layer.
pub fn cors_layer(max_age: Duration) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .max_age(max_age)
}

fn is_preflight(req: &Request) -> bool {
    req.method() == Method::OPTIONS
        && req
            .headers()
            .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

/// Middleware wrapping [`cors_layer`] that turns its empty `200 OK`
/// preflight answer into `204 No Content`.
pub async fn preflight_no_content(req: Request, next: Next) -> Response {
    let preflight = is_preflight(&req);
    let mut response = next.run(req).await;

    if preflight && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request as HttpRequest, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/posts", get(|| async { "[]" }).options(|| async { "handler" }))
            .layer(cors_layer(Duration::from_secs(43_200)))
            .layer(middleware::from_fn(preflight_no_content))
    }

    #[tokio::test]
    async fn test_preflight_is_answered_with_policy() {
        let response = app()
            .oneshot(
                HttpRequest::builder()
                    .method("OPTIONS")
                    .uri("/posts")
                    .header(header::ORIGIN, "https://blog.example")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
                    .header(
                        header::ACCESS_CONTROL_REQUEST_HEADERS,
                        "spitfire-api-key,content-type",
                    )
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://blog.example"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "43200");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "spitfire-api-key,content-type"
        );

        let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap();
        for method in ["GET", "POST", "PUT", "DELETE"] {
            assert!(methods.contains(method), "missing {method} in {methods}");
        }
    }

    #[tokio::test]
    async fn test_simple_request_gets_origin_header() {
        let response = app()
            .oneshot(
                HttpRequest::builder()
                    .uri("/posts")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );
    }

    #[tokio::test]
    async fn test_plain_options_is_not_a_preflight() {
        let response = app()
            .oneshot(
                HttpRequest::builder()
                    .method("OPTIONS")
                    .uri("/posts")
                    .header(header::ORIGIN, "https://blog.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
