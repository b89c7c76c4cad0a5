//! Presentation rules for the post list. Display-only: nothing here mutates a [`Post`].

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::Post;

/// Characters of content shown per list entry.
pub const EXCERPT_CHARS: usize = 150;

const ELLIPSIS: &str = "...";

/// One rendered row of the post list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostListItem {
    pub id: Uuid,
    pub title: String,
    /// Creation date, e.g. `Jan 5, 2025`.
    pub created: String,
    pub topic: Option<String>,
    pub excerpt: String,
}

impl From<&Post> for PostListItem {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            created: format_date(post.created_at),
            topic: post.topic.clone(),
            excerpt: truncate_content(&post.content, EXCERPT_CHARS).into_owned(),
        }
    }
}

/// Cut `content` to `max_chars` characters followed by `...`.
/// Content that already fits is returned as is.
pub fn truncate_content(content: &str, max_chars: usize) -> Cow<'_, str> {
    match content.char_indices().nth(max_chars) {
        None => Cow::Borrowed(content),
        Some((cut, _)) => Cow::Owned(format!("{}{ELLIPSIS}", &content[..cut])),
    }
}

pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y").to_string()
}
