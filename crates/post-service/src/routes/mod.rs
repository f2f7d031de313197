//! HTTP routes for the Post service.
//!
//! Defines the Axum router, the request pipeline and application state.

use crate::config::Config;
use crate::handlers;
use crate::middleware::{
    cors_layer, log_requests, preflight_no_content, require_api_key, AuthState,
};
use crate::repositories::PostStore;
use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Post persistence backend.
    pub store: Arc<dyn PostStore>,

    /// Service configuration.
    pub config: Config,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/` - Greeting
/// - `/ping` - Liveness
/// - `/posts` - List (GET) and create (POST)
/// - `/posts/:id` - Update (PUT) and delete (DELETE)
/// - `/metrics` - Prometheus metrics endpoint
///
/// Every request, matched or not, runs through the same pipeline:
///
/// ```text
/// CORS -> request logger -> API key check -> handler
/// ```
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let auth_state = Arc::new(AuthState::new(state.config.api_keys.clone()));
    let cors = cors_layer(state.config.cors_max_age());

    let post_routes = Router::new()
        .route("/", get(handlers::root))
        .route("/ping", get(handlers::ping))
        .route(
            "/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route(
            "/posts/:id",
            put(handlers::update_post).delete(handlers::delete_post),
        )
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Layer order (bottom-to-top execution):
    // 1. require_api_key - Reject unauthenticated requests (innermost)
    // 2. log_requests - Log latency/route/status of every response
    // 3. TraceLayer - Request spans
    // 4. CORS - Header injection and preflight answers
    // 5. preflight_no_content - 204 for preflights answered by CORS (outermost)
    post_routes
        .merge(metrics_routes)
        .layer(middleware::from_fn_with_state(auth_state, require_api_key))
        .layer(middleware::from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(preflight_no_content))
}
