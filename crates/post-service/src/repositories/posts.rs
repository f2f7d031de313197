//! PostgreSQL-backed post store.
//!
//! # Security
//!
//! - All queries use parameterized statements (SQL injection safe)
//! - Identifiers are generated server-side; client-supplied ids are only
//!   ever bound as parameters

use crate::errors::PostError;
use crate::models::Post;
use crate::observability::metrics;
use crate::repositories::{post_not_found, PostStore};
use sqlx::{PgPool, Row};
use std::time::Instant;
use tracing::instrument;
use uuid::Uuid;

const POST_COLUMNS: &str = "id, title, published, description, created_at, updated_at";

/// Post store backed by the `posts` table.
#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Record the outcome of a query and convert its error.
fn observe<T>(
    operation: &'static str,
    start: Instant,
    result: Result<T, sqlx::Error>,
) -> Result<T, PostError> {
    let duration = start.elapsed();
    match result {
        Ok(value) => {
            metrics::record_db_query(operation, "success", duration);
            Ok(value)
        }
        Err(e) => {
            metrics::record_db_query(operation, "error", duration);
            Err(PostError::Database(e.to_string()))
        }
    }
}

#[async_trait::async_trait]
impl PostStore for PgPostStore {
    #[instrument(skip_all, name = "post.repo.find_all")]
    async fn find_all(&self) -> Result<Vec<Post>, PostError> {
        let start = Instant::now();

        let rows = sqlx::query(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await;

        let rows = observe("find_all", start, rows)?;
        rows.iter().map(map_row_to_post).collect()
    }

    #[instrument(skip_all, name = "post.repo.create")]
    async fn create(
        &self,
        title: &str,
        published: bool,
        description: &str,
    ) -> Result<Post, PostError> {
        let start = Instant::now();
        let id = Uuid::new_v4().to_string();

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO posts (id, title, published, description)
            VALUES ($1, $2, $3, $4)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(&id) // $1
        .bind(title) // $2
        .bind(published) // $3
        .bind(description) // $4
        .fetch_one(&self.pool)
        .await;

        let row = observe("create", start, row)?;
        let post = map_row_to_post(&row)?;

        tracing::debug!(target: "post.repo.posts", post_id = %post.id, "Post created");
        Ok(post)
    }

    #[instrument(skip_all, name = "post.repo.update", fields(post_id = %id))]
    async fn find_by_id_and_update(
        &self,
        id: &str,
        title: &str,
        published: bool,
        description: &str,
    ) -> Result<Post, PostError> {
        let start = Instant::now();

        let row = sqlx::query(&format!(
            r#"
            UPDATE posts
            SET title = $2, published = $3, description = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(id) // $1
        .bind(title) // $2
        .bind(published) // $3
        .bind(description) // $4
        .fetch_optional(&self.pool)
        .await;

        match observe("update", start, row)? {
            Some(row) => map_row_to_post(&row),
            None => Err(post_not_found(id)),
        }
    }

    #[instrument(skip_all, name = "post.repo.delete", fields(post_id = %id))]
    async fn find_by_id_and_delete(&self, id: &str) -> Result<Post, PostError> {
        let start = Instant::now();

        let row = sqlx::query(&format!(
            "DELETE FROM posts WHERE id = $1 RETURNING {POST_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        match observe("delete", start, row)? {
            Some(row) => map_row_to_post(&row),
            None => Err(post_not_found(id)),
        }
    }

    #[instrument(skip_all, name = "post.repo.ping")]
    async fn ping(&self) -> Result<(), PostError> {
        let start = Instant::now();
        let result = sqlx::query("SELECT 1").execute(&self.pool).await;
        observe("ping", start, result).map(|_| ())
    }
}

/// Map a database row to a Post.
fn map_row_to_post(row: &sqlx::postgres::PgRow) -> Result<Post, PostError> {
    Ok(Post {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        published: row.try_get("published")?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
