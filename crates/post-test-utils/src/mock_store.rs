//! Mock post stores for failure and side-effect testing.

use async_trait::async_trait;
use post_service::errors::PostError;
use post_service::models::Post;
use post_service::repositories::{MemoryPostStore, PostStore};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Store whose every operation fails with a database error.
pub struct FailingPostStore {
    message: String,
    call_count: AtomicUsize,
}

impl FailingPostStore {
    /// Fail with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Get the number of calls made.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn fail(&self) -> PostError {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        PostError::Database(self.message.clone())
    }
}

impl Default for FailingPostStore {
    fn default() -> Self {
        Self::new("database unreachable")
    }
}

#[async_trait]
impl PostStore for FailingPostStore {
    async fn find_all(&self) -> Result<Vec<Post>, PostError> {
        Err(self.fail())
    }

    async fn create(&self, _: &str, _: bool, _: &str) -> Result<Post, PostError> {
        Err(self.fail())
    }

    async fn find_by_id_and_update(
        &self,
        _: &str,
        _: &str,
        _: bool,
        _: &str,
    ) -> Result<Post, PostError> {
        Err(self.fail())
    }

    async fn find_by_id_and_delete(&self, _: &str) -> Result<Post, PostError> {
        Err(self.fail())
    }

    async fn ping(&self) -> Result<(), PostError> {
        Err(self.fail())
    }
}

/// In-memory store that counts calls per operation.
#[derive(Default)]
pub struct CountingPostStore {
    inner: MemoryPostStore,
    find_all_calls: AtomicUsize,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl CountingPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_all_calls(&self) -> usize {
        self.find_all_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Total calls across all mutating operations.
    pub fn mutation_calls(&self) -> usize {
        self.create_calls() + self.update_calls() + self.delete_calls()
    }
}

#[async_trait]
impl PostStore for CountingPostStore {
    async fn find_all(&self) -> Result<Vec<Post>, PostError> {
        self.find_all_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_all().await
    }

    async fn create(
        &self,
        title: &str,
        published: bool,
        description: &str,
    ) -> Result<Post, PostError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.create(title, published, description).await
    }

    async fn find_by_id_and_update(
        &self,
        id: &str,
        title: &str,
        published: bool,
        description: &str,
    ) -> Result<Post, PostError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .find_by_id_and_update(id, title, published, description)
            .await
    }

    async fn find_by_id_and_delete(&self, id: &str) -> Result<Post, PostError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id_and_delete(id).await
    }

    async fn ping(&self) -> Result<(), PostError> {
        self.inner.ping().await
    }
}
