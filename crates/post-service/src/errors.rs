//! Post service error types.
//!
//! All errors map to HTTP status codes via the `IntoResponse` impl. Every
//! error renders exactly one JSON body of the shape `{"error": "<message>"}`,
//! except `Unauthorized` which renders `{"message": "Unauthorized"}`.
//!
//! Store error messages are passed through to the caller; the API audience is
//! trusted consumers holding a shared key.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Post service error type.
///
/// Maps to HTTP status codes:
/// - Unauthorized: 401 Unauthorized
/// - BadRequest: 400 Bad Request
/// - NotFound: 404 Not Found
/// - Database: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum PostError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Database(String),
}

impl PostError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            PostError::Unauthorized => 401,
            PostError::BadRequest(_) => 400,
            PostError::NotFound(_) => 404,
            PostError::Database(_) => 500,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct MessageBody {
    message: &'static str,
}

impl IntoResponse for PostError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match self {
            PostError::Unauthorized => (
                status,
                Json(MessageBody {
                    message: "Unauthorized",
                }),
            )
                .into_response(),
            PostError::Database(err) => {
                tracing::error!(target: "post.database", error = %err, "Store operation failed");
                (status, Json(ErrorBody { error: err })).into_response()
            }
            PostError::BadRequest(message) | PostError::NotFound(message) => {
                (status, Json(ErrorBody { error: message })).into_response()
            }
        }
    }
}

/// Convert sqlx errors to PostError.
impl From<sqlx::Error> for PostError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => PostError::NotFound("post not found".to_string()),
            other => PostError::Database(other.to_string()),
        }
    }
}
