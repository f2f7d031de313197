//! Greeting and liveness handlers.

use crate::models::MessageResponse;
use axum::Json;
use tracing::instrument;

/// Handler for GET /
#[instrument(skip_all, name = "post.health.root")]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("Hello World!"))
}

/// Handler for GET /ping
///
/// Liveness only: the store is not consulted.
#[instrument(skip_all, name = "post.health.ping")]
pub async fn ping() -> Json<MessageResponse> {
    Json(MessageResponse::new("Server is running!"))
}
