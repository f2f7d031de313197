//! Post service models.
//!
//! Contains the Post entity, its request body and the fixed message responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Validation message for an empty title.
pub const EMPTY_TITLE_MESSAGE: &str = "title cannot be empty";

/// A stored post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Opaque identifier assigned by the store on creation.
    pub id: String,

    pub title: String,

    pub published: bool,

    pub description: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Request body for `POST /posts` and `PUT /posts/:id`.
///
/// `title` is required; `published` and `description` default when absent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostInput {
    pub title: String,

    #[serde(default)]
    pub published: bool,

    #[serde(default)]
    pub description: String,
}

impl PostInput {
    /// Validate the input before it reaches the store.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.is_empty() {
            return Err(EMPTY_TITLE_MESSAGE);
        }
        Ok(())
    }
}

/// Fixed `{"message": ...}` response used by the health endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
