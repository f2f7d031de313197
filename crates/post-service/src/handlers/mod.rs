//! HTTP request handlers for the Post service.

pub mod health;
pub mod metrics;
pub mod posts;

pub use health::{ping, root};
pub use metrics::metrics_handler;
pub use posts::{create_post, delete_post, list_posts, update_post};
