//! Post handlers.
//!
//! Implements post endpoints:
//!
//! - `GET /posts` - List posts
//! - `POST /posts` - Create post
//! - `PUT /posts/:id` - Update post
//! - `DELETE /posts/:id` - Delete post
//!
//! Each handler returns a single `Result`, so a request gets exactly one body:
//! either the success payload or the rendered `PostError`.

use crate::errors::PostError;
use crate::models::{Post, PostInput};
use crate::routes::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Decode and validate a create/update body.
///
/// The body is buffered and deserialized by hand so that every failure,
/// including an over-limit body, is a 400 with a JSON error rather than
/// Axum's plain-text 413/415/422 rejections.
fn parse_post_input(body: Result<Bytes, BytesRejection>) -> Result<PostInput, PostError> {
    let body = body.map_err(|rejection| {
        tracing::debug!(
            target: "post.handlers.posts",
            status = rejection.status().as_u16(),
            "Request body rejected"
        );
        PostError::BadRequest(rejection.body_text())
    })?;

    let input: PostInput = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(target: "post.handlers.posts", error = %e, "Invalid request body");
        PostError::BadRequest(e.to_string())
    })?;

    input
        .validate()
        .map_err(|msg| PostError::BadRequest(msg.to_string()))?;

    Ok(input)
}

/// Handler for GET /posts
///
/// # Response
///
/// - 200 OK: All posts, oldest first
/// - 500 Internal Server Error: Store failure
#[instrument(skip_all, name = "post.posts.list")]
pub async fn list_posts(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Post>>, PostError> {
    let posts = state.store.find_all().await?;
    Ok(Json(posts))
}

/// Handler for POST /posts
///
/// # Response
///
/// - 200 OK: The created post with its generated id
/// - 400 Bad Request: Undecodable or oversized body, or empty title
/// - 500 Internal Server Error: Store failure
#[instrument(skip_all, name = "post.posts.create")]
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Post>, PostError> {
    let input = parse_post_input(body)?;

    let post = state
        .store
        .create(&input.title, input.published, &input.description)
        .await?;

    info!(target: "post.handlers.posts", post_id = %post.id, "Post created");
    Ok(Json(post))
}

/// Handler for PUT /posts/:id
///
/// # Response
///
/// - 200 OK: The updated post
/// - 400 Bad Request: Undecodable or oversized body, or empty title
/// - 404 Not Found: No post with this id
/// - 500 Internal Server Error: Store failure
#[instrument(skip_all, name = "post.posts.update", fields(post_id = %id))]
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Post>, PostError> {
    let input = parse_post_input(body)?;

    let post = state
        .store
        .find_by_id_and_update(&id, &input.title, input.published, &input.description)
        .await?;

    info!(target: "post.handlers.posts", post_id = %post.id, "Post updated");
    Ok(Json(post))
}

/// Handler for DELETE /posts/:id
///
/// # Response
///
/// - 200 OK: The deleted post as it was before removal
/// - 404 Not Found: No post with this id
/// - 500 Internal Server Error: Store failure
#[instrument(skip_all, name = "post.posts.delete", fields(post_id = %id))]
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Post>, PostError> {
    let post = state.store.find_by_id_and_delete(&id).await?;

    info!(target: "post.handlers.posts", post_id = %post.id, "Post deleted");
    Ok(Json(post))
}
