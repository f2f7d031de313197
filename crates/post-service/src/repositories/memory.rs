//! In-memory post store.
//!
//! Used when no database is configured and by the test harness.
//! Data is lost on restart.

use crate::errors::PostError;
use crate::models::Post;
use crate::repositories::{post_not_found, PostStore};
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Post store holding records in insertion order.
#[derive(Debug, Default)]
pub struct MemoryPostStore {
    posts: RwLock<Vec<Post>>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored posts.
    pub async fn len(&self) -> usize {
        self.posts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.posts.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl PostStore for MemoryPostStore {
    async fn find_all(&self) -> Result<Vec<Post>, PostError> {
        Ok(self.posts.read().await.clone())
    }

    async fn create(
        &self,
        title: &str,
        published: bool,
        description: &str,
    ) -> Result<Post, PostError> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            published,
            description: description.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.posts.write().await.push(post.clone());
        debug!(target: "post.repo.memory", post_id = %post.id, "Post created");
        Ok(post)
    }

    async fn find_by_id_and_update(
        &self,
        id: &str,
        title: &str,
        published: bool,
        description: &str,
    ) -> Result<Post, PostError> {
        let mut posts = self.posts.write().await;
        let post = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| post_not_found(id))?;

        post.title = title.to_string();
        post.published = published;
        post.description = description.to_string();
        post.updated_at = Utc::now();

        Ok(post.clone())
    }

    async fn find_by_id_and_delete(&self, id: &str) -> Result<Post, PostError> {
        let mut posts = self.posts.write().await;
        let index = posts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| post_not_found(id))?;

        let removed = posts.remove(index);
        debug!(target: "post.repo.memory", post_id = %removed.id, "Post deleted");
        Ok(removed)
    }

    async fn ping(&self) -> Result<(), PostError> {
        Ok(())
    }
}
