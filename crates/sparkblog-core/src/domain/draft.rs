use uuid::Uuid;

use super::post::{Post, PostInput};
use crate::error::DomainError;

/// Unsaved post-in-progress held by the editor.
///
/// `bound_post_id` decides what a save does: `None` inserts a new post,
/// `Some(id)` updates the existing one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub bound_post_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub topic: String,
    pub ai_prompt: String,
}

impl Draft {
    /// Draft for editing an existing post.
    pub fn from_post(post: &Post) -> Self {
        Self {
            bound_post_id: Some(post.id),
            title: post.title.clone(),
            content: post.content.clone(),
            topic: post.topic.clone().unwrap_or_default(),
            ai_prompt: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Validated persistable view of the draft.
    pub fn to_input(&self) -> Result<PostInput, DomainError> {
        let input = PostInput::new(self.title.clone(), self.content.clone(), &self.topic);
        input.validate()?;
        Ok(input)
    }

    /// Merge a generated body into the draft.
    ///
    /// The content is always replaced. Title and topic are only filled in
    /// when they are still empty.
    pub fn apply_generated(&mut self, prompt: &str, text: String) {
        if self.title.is_empty() {
            self.title = title_from_generated(&text).unwrap_or_else(|| prompt.to_string());
        }
        if self.topic.is_empty() {
            self.topic = topic_from_prompt(prompt);
        }
        self.content = text;
    }
}

/// First line of `text` with leading `#` heading markers removed.
fn title_from_generated(text: &str) -> Option<String> {
    let first = text.lines().next()?;
    let title = first.trim_start().trim_start_matches('#').trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// First two whitespace-separated tokens of the prompt.
fn topic_from_prompt(prompt: &str) -> String {
    prompt.split_whitespace().take(2).collect::<Vec<_>>().join(" ")
}
