//! Post Service Library
//!
//! A single-resource HTTP CRUD service for blog posts, guarded by a shared
//! API key.
//!
//! # Architecture
//!
//! The service follows the Handler -> Repository pattern behind a fixed
//! middleware pipeline:
//!
//! ```text
//! CORS -> request logger -> API key check -> handlers/*.rs -> repositories/*.rs
//! ```
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - CORS, request logging and API key authentication
//! - `models` - Data models
//! - `observability` - Prometheus metrics
//! - `repositories` - Post store trait with Postgres and in-memory backends
//! - `routes` - Axum router setup

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
