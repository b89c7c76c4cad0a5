//! Dashboard - composes the editor and the post list.
//!
//! The two halves never talk to each other directly. The dashboard listens
//! to the editor's saved signal and flips a [`RefreshToken`] the collection
//! observes, and it hands a selected post from the collection to the editor.
//! Every operation result ends up as a [`Notification`]; no error escapes.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::TryRecvError};
use uuid::Uuid;

use crate::collection::{DeleteOutcome, PostCollection, RefreshToken};
use crate::editor::{EditorSession, SavedPost};
use crate::error::SessionError;
use crate::ports::{IdentityProvider, Notification, Notifier};

/// Which half of the dashboard is in front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Write,
    Posts,
}

pub struct Dashboard {
    editor: EditorSession,
    collection: PostCollection,
    identity: Arc<dyn IdentityProvider>,
    notifier: Arc<dyn Notifier>,
    saved_rx: broadcast::Receiver<SavedPost>,
    view: View,
    refresh_token: RefreshToken,
    editing: Option<Uuid>,
}

impl Dashboard {
    pub fn new(
        editor: EditorSession,
        collection: PostCollection,
        identity: Arc<dyn IdentityProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let saved_rx = editor.subscribe();
        Self {
            editor,
            collection,
            identity,
            notifier,
            saved_rx,
            view: View::default(),
            refresh_token: RefreshToken::default(),
            editing: None,
        }
    }

    pub fn editor(&self) -> &EditorSession {
        &self.editor
    }

    pub fn collection(&self) -> &PostCollection {
        &self.collection
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// The post handed to the editor, if any.
    pub fn editing(&self) -> Option<Uuid> {
        self.editing
    }

    pub fn refresh_token(&self) -> RefreshToken {
        self.refresh_token
    }

    /// Initial load of the post list.
    pub async fn mount(&mut self) {
        self.sync_collection().await;
    }

    /// Bring a view to the front.
    ///
    /// Coming back to `Write` from elsewhere starts a fresh post. Bringing
    /// up `Posts` always re-fetches the list.
    pub async fn switch_view(&mut self, view: View) {
        if view == self.view {
            return;
        }
        self.view = view;
        match view {
            View::Write => {
                self.editing = None;
                self.editor.start_new();
            }
            View::Posts => {
                if let Err(e) = self.collection.enter(self.refresh_token).await {
                    self.report(&e);
                }
            }
        }
    }

    /// Generate content from the draft's AI prompt.
    pub async fn generate(&self) -> bool {
        let prompt = self.editor.draft().ai_prompt;
        match self.editor.generate(&prompt).await {
            Ok(()) => {
                self.notifier.notify(Notification::success(
                    "AI Content Generated!",
                    "Your blog content has been generated successfully.",
                ));
                true
            }
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    /// Save the draft, then follow the saved signal to the post list.
    pub async fn save(&mut self) -> bool {
        match self.editor.save().await {
            Ok(saved) => {
                let notification = if saved.created {
                    Notification::success(
                        "Blog Saved!",
                        "Your blog post has been saved successfully.",
                    )
                } else {
                    Notification::success(
                        "Blog Updated!",
                        "Your blog post has been updated successfully.",
                    )
                };
                self.notifier.notify(notification);
            }
            Err(e) => {
                self.report(&e);
                return false;
            }
        }
        self.drain_saved_signals().await;
        true
    }

    /// Hand a listed post to the editor.
    pub fn edit(&mut self, id: Uuid) -> bool {
        let Some(post) = self.collection.get(id) else {
            self.notifier.notify(Notification::destructive(
                "Error",
                "That blog post is no longer available",
            ));
            return false;
        };
        self.editor.load(&post);
        self.editing = Some(id);
        self.view = View::Write;
        true
    }

    pub async fn delete(&mut self, id: Uuid) -> bool {
        match self.collection.delete(id).await {
            Ok(DeleteOutcome::Deleted { refresh }) => {
                if self.editing == Some(id) {
                    self.editing = None;
                    self.editor.start_new();
                }
                self.notifier.notify(Notification::success(
                    "Blog Deleted",
                    "Your blog post has been deleted successfully.",
                ));
                if let Err(e) = refresh {
                    self.report(&e);
                }
                true
            }
            Ok(DeleteOutcome::Cancelled) => false,
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    /// Manual re-fetch of the post list.
    pub async fn refresh(&self) {
        if let Err(e) = self.collection.refresh().await {
            self.report(&e);
        }
    }

    pub async fn sign_out(&self) {
        if let Err(e) = self.identity.sign_out().await {
            tracing::warn!(error = %e, "Sign out failed");
            self.notifier
                .notify(Notification::destructive("Error", e.to_string()));
        }
    }

    async fn drain_saved_signals(&mut self) {
        let mut saw_save = false;
        loop {
            match self.saved_rx.try_recv() {
                Ok(saved) => {
                    tracing::debug!(post_id = %saved.post.id, "Saved signal received");
                    saw_save = true;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Saved signals skipped");
                    saw_save = true;
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        if saw_save {
            self.refresh_token.toggle();
            self.editing = None;
            self.view = View::Posts;
            self.sync_collection().await;
        }
    }

    async fn sync_collection(&self) {
        if let Err(e) = self.collection.observe(self.refresh_token).await {
            self.report(&e);
        }
    }

    fn report(&self, err: &SessionError) {
        self.notifier.notify(notification_for(err));
    }
}

fn notification_for(err: &SessionError) -> Notification {
    match err {
        SessionError::Validation(msg) => Notification::destructive("Error", msg.clone()),
        SessionError::AuthRequired => {
            Notification::destructive("Error", "You must be logged in to continue")
        }
        SessionError::Generation(msg) => Notification::destructive(
            "AI Generation Failed",
            format!("Unable to generate content ({msg}). Please try again."),
        ),
        SessionError::Persist(_) => Notification::destructive(
            "Save Failed",
            "Unable to save your blog. Please try again.",
        ),
        SessionError::Fetch(_) => Notification::destructive("Error", "Failed to load blogs"),
        SessionError::Delete(_) => Notification::destructive(
            "Delete Failed",
            "Unable to delete the blog. Please try again.",
        ),
        SessionError::Busy(_) => Notification::destructive("Please wait", err.to_string()),
    }
}
