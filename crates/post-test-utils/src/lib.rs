//! # Post Test Utilities
//!
//! Shared test utilities for the Post service.
//!
//! This crate provides:
//! - Server test harness (`TestPostServer` for E2E tests)
//! - Mock stores (`FailingPostStore`, `CountingPostStore`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use post_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<()> {
//!     let server = TestPostServer::spawn().await?;
//!     let client = reqwest::Client::new();
//!
//!     let response = client
//!         .get(format!("{}/posts", server.url()))
//!         .header("SPITFIRE-API-KEY", TEST_API_KEY)
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod mock_store;
pub mod server_harness;

// Re-export commonly used items
pub use mock_store::*;
pub use server_harness::*;
