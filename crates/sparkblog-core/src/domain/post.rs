use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Post entity - a persisted blog entry, visible only to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub content: String,
    pub topic: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post. Identifier and timestamps are assigned here, which
    /// makes this a store-side constructor: clients send a [`PostInput`].
    pub fn new(owner_id: Uuid, input: PostInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: input.title,
            content: input.content,
            topic: input.topic,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the editable fields and bump `updated_at`.
    pub fn apply(&mut self, input: PostInput) {
        self.title = input.title;
        self.content = input.content;
        self.topic = input.topic;
        self.updated_at = Utc::now();
    }
}

/// The client-writable part of a post, used for both insert and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostInput {
    pub title: String,
    pub content: String,
    pub topic: Option<String>,
}

impl PostInput {
    /// Build an input from raw form values. A blank topic becomes `None`.
    pub fn new(title: impl Into<String>, content: impl Into<String>, topic: &str) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            topic: normalize_topic(topic),
        }
    }

    /// Title and content must both contain something other than whitespace.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(DomainError::Validation(
                "Please fill in both title and content".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn normalize_topic(topic: &str) -> Option<String> {
    if topic.trim().is_empty() {
        None
    } else {
        Some(topic.to_string())
    }
}
