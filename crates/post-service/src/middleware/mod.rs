//! Middleware for the Post service.
//!
//! # Components
//!
//! - `cors` - Permissive CORS policy (outermost stage)
//! - `request_logger` - Latency/path/status logging and HTTP metrics
//! - `auth` - Shared API key check
//!
//! Stages that may short-circuit report an [`Outcome`]; the stage driver
//! forwards on `Continue` and returns the terminal response otherwise.

pub mod auth;
pub mod cors;
pub mod request_logger;

pub use auth::{require_api_key, AuthState, API_KEY_HEADER};
pub use cors::{cors_layer, preflight_no_content};
pub use request_logger::log_requests;

use axum::{extract::Request, middleware::Next, response::Response};

/// Decision of a pipeline stage.
pub enum Outcome {
    /// Hand the request to the next stage.
    Continue,

    /// Stop here; this is the response for the request.
    Terminated(Response),
}

impl Outcome {
    /// Run the rest of the pipeline, or return the terminal response.
    pub async fn proceed(self, req: Request, next: Next) -> Response {
        match self {
            Outcome::Continue => next.run(req).await,
            Outcome::Terminated(response) => response,
        }
    }
}
