//! Post collection - the owner's posts, newest first.
//!
//! The view is rebuilt wholesale by every fetch. Refreshes are not guarded:
//! overlapping calls are allowed and whichever response lands last wins.

use std::sync::{Arc, Mutex, PoisonError};

use uuid::Uuid;

use crate::display::PostListItem;
use crate::domain::Post;
use crate::error::SessionError;
use crate::ports::{Confirmation, IdentityProvider, PostRepository};

const DELETE_QUESTION: &str = "Are you sure you want to delete this blog?";

/// Value the composing controller flips on every save. The collection
/// refreshes when it observes a value different from the last one seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshToken(bool);

impl RefreshToken {
    pub fn toggle(&mut self) {
        self.0 = !self.0;
    }
}

#[derive(Debug)]
pub enum DeleteOutcome {
    /// The post is gone from the store and from the view. `refresh` is the
    /// follow-up fetch, which fails on its own without undoing the delete.
    Deleted { refresh: Result<usize, SessionError> },
    /// The user declined the confirmation prompt. Nothing was sent.
    Cancelled,
}

#[derive(Debug, Default)]
struct CollectionView {
    posts: Vec<Post>,
    loaded: bool,
}

pub struct PostCollection {
    identity: Arc<dyn IdentityProvider>,
    posts: Arc<dyn PostRepository>,
    confirm: Arc<dyn Confirmation>,
    view: Mutex<CollectionView>,
    observed: Mutex<Option<RefreshToken>>,
}

impl PostCollection {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        posts: Arc<dyn PostRepository>,
        confirm: Arc<dyn Confirmation>,
    ) -> Self {
        Self {
            identity,
            posts,
            confirm,
            view: Mutex::new(CollectionView::default()),
            observed: Mutex::new(None),
        }
    }

    /// Refresh unconditionally and remember `token`, as the list does every
    /// time it is brought to the front.
    pub async fn enter(&self, token: RefreshToken) -> Result<usize, SessionError> {
        *self.observed.lock().unwrap_or_else(PoisonError::into_inner) = Some(token);
        self.refresh().await
    }

    /// Refresh if `token` differs from the last observed value.
    ///
    /// The first observation always refreshes (initial mount). Returns
    /// whether a refresh was performed.
    pub async fn observe(&self, token: RefreshToken) -> Result<bool, SessionError> {
        let changed = {
            let mut observed = self.observed.lock().unwrap_or_else(PoisonError::into_inner);
            let changed = *observed != Some(token);
            *observed = Some(token);
            changed
        };
        if !changed {
            return Ok(false);
        }
        self.refresh().await?;
        Ok(true)
    }

    /// Re-fetch the owner's posts and replace the view.
    ///
    /// On failure the previous (possibly stale) view is kept.
    pub async fn refresh(&self) -> Result<usize, SessionError> {
        let result = self.fetch().await;
        let mut view = self.view.lock().unwrap_or_else(PoisonError::into_inner);
        view.loaded = true;
        let mut posts = result?;

        // Stable: equal timestamps keep the store's order.
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let count = posts.len();
        view.posts = posts;
        tracing::info!(count, "Post list refreshed");
        Ok(count)
    }

    /// Ask for confirmation, delete the post, then re-fetch the whole list.
    ///
    /// Only a failed delete is an error. A failed re-fetch after a
    /// successful delete is carried in [`DeleteOutcome::Deleted`].
    pub async fn delete(&self, id: Uuid) -> Result<DeleteOutcome, SessionError> {
        if !self.confirm.confirm(DELETE_QUESTION).await {
            tracing::debug!(post_id = %id, "Delete cancelled by user");
            return Ok(DeleteOutcome::Cancelled);
        }

        let identity = self
            .identity
            .current_identity()
            .await
            .ok_or(SessionError::AuthRequired)?;

        self.posts
            .delete(identity.user_id, id)
            .await
            .map_err(|e| {
                tracing::warn!(post_id = %id, error = %e, "Deleting post failed");
                SessionError::Delete(e.to_string())
            })?;
        tracing::info!(post_id = %id, "Post deleted");

        {
            let mut view = self.view.lock().unwrap_or_else(PoisonError::into_inner);
            view.posts.retain(|p| p.id != id);
        }
        let refresh = self.refresh().await;
        Ok(DeleteOutcome::Deleted { refresh })
    }

    /// Snapshot of the current view.
    pub fn posts(&self) -> Vec<Post> {
        self.with_view(|view| view.posts.clone())
    }

    /// A post from the current view, for handing over to the editor.
    pub fn get(&self, id: Uuid) -> Option<Post> {
        self.with_view(|view| view.posts.iter().find(|p| p.id == id).cloned())
    }

    /// Display rows for the current view.
    pub fn items(&self) -> Vec<PostListItem> {
        self.with_view(|view| view.posts.iter().map(PostListItem::from).collect())
    }

    /// True until the first fetch has settled, successfully or not.
    pub fn is_loading(&self) -> bool {
        self.with_view(|view| !view.loaded)
    }

    pub fn is_empty(&self) -> bool {
        self.with_view(|view| view.posts.is_empty())
    }

    async fn fetch(&self) -> Result<Vec<Post>, SessionError> {
        let identity = self
            .identity
            .current_identity()
            .await
            .ok_or(SessionError::AuthRequired)?;

        tracing::debug!(owner_id = %identity.user_id, "Fetching posts");
        self.posts
            .find_by_owner(identity.user_id)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Fetching posts failed");
                SessionError::Fetch(e.to_string())
            })
    }

    fn with_view<R>(&self, f: impl FnOnce(&CollectionView) -> R) -> R {
        let view = self.view.lock().unwrap_or_else(PoisonError::into_inner);
        f(&view)
    }
}
