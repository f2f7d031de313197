//! API key authentication middleware.
//!
//! Reads the `SPITFIRE-API-KEY` header and admits the request only when the
//! value is a member of the configured [`ApiKeySet`]. Every failure yields the
//! same 401 `{"message": "Unauthorized"}`; the reason is only logged.
//!
//! The check is a plain set lookup. It is not constant-time and keys carry no
//! scopes.

use crate::config::ApiKeySet;
use crate::errors::PostError;
use crate::middleware::Outcome;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::instrument;

/// Header carrying the shared secret (header names are case-insensitive).
pub const API_KEY_HEADER: &str = "spitfire-api-key";

/// State for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    /// Accepted keys, fixed at startup.
    pub api_keys: Arc<ApiKeySet>,
}

impl AuthState {
    pub fn new(api_keys: ApiKeySet) -> Self {
        Self {
            api_keys: Arc::new(api_keys),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Missing,
    Malformed,
    Empty,
    UnknownKey,
}

impl Rejection {
    fn as_str(self) -> &'static str {
        match self {
            Rejection::Missing => "missing",
            Rejection::Malformed => "malformed",
            Rejection::Empty => "empty",
            Rejection::UnknownKey => "unknown_key",
        }
    }
}

fn evaluate(api_keys: &ApiKeySet, headers: &HeaderMap) -> Result<(), Rejection> {
    let value = headers.get(API_KEY_HEADER).ok_or(Rejection::Missing)?;
    let key = value.to_str().map_err(|_| Rejection::Malformed)?;

    if key.is_empty() {
        return Err(Rejection::Empty);
    }

    if !api_keys.contains(key) {
        return Err(Rejection::UnknownKey);
    }

    Ok(())
}

/// Decide whether a request carrying `headers` may continue.
pub fn check_api_key(api_keys: &ApiKeySet, headers: &HeaderMap) -> Outcome {
    match evaluate(api_keys, headers) {
        Ok(()) => Outcome::Continue,
        Err(reason) => {
            tracing::debug!(
                target: "post.middleware.auth",
                reason = reason.as_str(),
                "Rejected request without a valid API key"
            );
            Outcome::Terminated(PostError::Unauthorized.into_response())
        }
    }
}

/// Authentication middleware.
///
/// # Response
///
/// - 401 Unauthorized with `{"message": "Unauthorized"}` if the key is
///   missing, empty or not accepted; no later stage runs
/// - Otherwise continues to the next stage
#[instrument(skip_all, name = "post.middleware.auth")]
pub async fn require_api_key(
    State(state): State<Arc<AuthState>>,
    req: Request,
    next: Next,
) -> Response {
    check_api_key(&state.api_keys, req.headers())
        .proceed(req, next)
        .await
}
