//! Repository layer for the Post service.
//!
//! Handlers talk to persistence only through the [`PostStore`] trait, held as
//! `Arc<dyn PostStore>` in application state. Two backends are provided:
//!
//! - [`PgPostStore`] - PostgreSQL via sqlx
//! - [`MemoryPostStore`] - in-process, used when no database is configured

pub mod memory;
pub mod posts;

pub use memory::MemoryPostStore;
pub use posts::PgPostStore;

use crate::errors::PostError;
use crate::models::Post;

/// CRUD operations over Post records.
///
/// Update and delete against a missing identifier return
/// [`PostError::NotFound`]; every other failure is [`PostError::Database`].
#[async_trait::async_trait]
pub trait PostStore: Send + Sync {
    /// All posts, oldest first.
    async fn find_all(&self) -> Result<Vec<Post>, PostError>;

    /// Insert a post and return it with its new identifier.
    async fn create(
        &self,
        title: &str,
        published: bool,
        description: &str,
    ) -> Result<Post, PostError>;

    /// Overwrite the mutable fields of an existing post.
    async fn find_by_id_and_update(
        &self,
        id: &str,
        title: &str,
        published: bool,
        description: &str,
    ) -> Result<Post, PostError>;

    /// Remove a post, returning its last representation.
    async fn find_by_id_and_delete(&self, id: &str) -> Result<Post, PostError>;

    /// Connectivity probe.
    async fn ping(&self) -> Result<(), PostError>;
}

/// Not-found error for a post identifier.
pub(crate) fn post_not_found(id: &str) -> PostError {
    PostError::NotFound(format!("post not found: {}", id))
}
