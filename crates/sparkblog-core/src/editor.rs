//! Editor session - owns one [`Draft`] and turns it into a persisted post.
//!
//! ```text
//! Idle --generate--> Generating --settle--> Idle
//! Idle --save------> Saving     --settle--> Idle
//! ```
//!
//! The two sequences are independent and may overlap. Each one admits a
//! single call at a time; a second call while one is outstanding fails
//! with [`SessionError::Busy`] without touching the network.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::domain::{Draft, Post};
use crate::error::{Operation, SessionError};
use crate::flight::{OpState, SingleFlight};
use crate::ports::{GenerateError, IdentityProvider, PostRepository, TextGenerator};

const SAVED_CHANNEL_CAPACITY: usize = 16;

/// Signal emitted after a successful save.
#[derive(Debug, Clone)]
pub struct SavedPost {
    pub post: Post,
    /// `true` for an insert, `false` for an update of a bound post.
    pub created: bool,
}

/// What a save of the current draft would do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    New,
    Editing(Uuid),
}

pub struct EditorSession {
    identity: Arc<dyn IdentityProvider>,
    posts: Arc<dyn PostRepository>,
    generator: Arc<dyn TextGenerator>,
    draft: Mutex<Draft>,
    generating: SingleFlight,
    saving: SingleFlight,
    saved_tx: broadcast::Sender<SavedPost>,
}

impl EditorSession {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        posts: Arc<dyn PostRepository>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let (saved_tx, _) = broadcast::channel(SAVED_CHANNEL_CAPACITY);
        Self {
            identity,
            posts,
            generator,
            draft: Mutex::new(Draft::default()),
            generating: SingleFlight::new(Operation::Generate),
            saving: SingleFlight::new(Operation::Save),
            saved_tx,
        }
    }

    /// Receive a [`SavedPost`] for every successful save from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SavedPost> {
        self.saved_tx.subscribe()
    }

    /// Snapshot of the current draft.
    pub fn draft(&self) -> Draft {
        self.with_draft(|draft| draft.clone())
    }

    pub fn mode(&self) -> EditorMode {
        match self.with_draft(|draft| draft.bound_post_id) {
            Some(id) => EditorMode::Editing(id),
            None => EditorMode::New,
        }
    }

    pub fn generation_state(&self) -> OpState {
        self.generating.state()
    }

    pub fn save_state(&self) -> OpState {
        self.saving.state()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.with_draft(|draft| draft.title = title);
    }

    pub fn set_content(&self, content: impl Into<String>) {
        let content = content.into();
        self.with_draft(|draft| draft.content = content);
    }

    pub fn set_topic(&self, topic: impl Into<String>) {
        let topic = topic.into();
        self.with_draft(|draft| draft.topic = topic);
    }

    pub fn set_ai_prompt(&self, prompt: impl Into<String>) {
        let prompt = prompt.into();
        self.with_draft(|draft| draft.ai_prompt = prompt);
    }

    /// Switch to editing an existing post. Replaces whatever was drafted.
    pub fn load(&self, post: &Post) {
        tracing::debug!(post_id = %post.id, "Loading post into editor");
        let loaded = Draft::from_post(post);
        self.with_draft(|draft| *draft = loaded);
    }

    /// Discard the draft and start a new post.
    pub fn start_new(&self) {
        self.with_draft(Draft::clear);
    }

    /// Ask the generator for a body and merge it into the draft.
    ///
    /// The content is replaced unconditionally, even if it was edited while
    /// the request was outstanding. Title and topic are only filled in when
    /// still empty at the moment the result lands.
    pub async fn generate(&self, prompt: &str) -> Result<(), SessionError> {
        if prompt.trim().is_empty() {
            return Err(SessionError::Validation(
                "Please enter a prompt for AI generation".to_string(),
            ));
        }

        let _flight = self.generating.begin().inspect_err(|_| {
            tracing::warn!(operation = %Operation::Generate, "Rejected: already in flight");
        })?;

        tracing::debug!(prompt_len = prompt.len(), "Requesting generated content");

        let text = match self.generator.generate(prompt).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => return Err(generation_failed(GenerateError::EmptyResponse)),
            Err(e) => return Err(generation_failed(e)),
        };

        self.with_draft(|draft| draft.apply_generated(prompt, text));
        tracing::info!("Generated content applied to draft");
        Ok(())
    }

    /// Persist the draft: insert when no post is bound, update otherwise.
    ///
    /// On success the draft is cleared and a [`SavedPost`] is broadcast.
    /// On failure the draft is left untouched.
    pub async fn save(&self) -> Result<SavedPost, SessionError> {
        let draft = self.draft();
        let input = draft.to_input()?;

        let _flight = self.saving.begin().inspect_err(|_| {
            tracing::warn!(operation = %Operation::Save, "Rejected: already in flight");
        })?;

        let identity = self
            .identity
            .current_identity()
            .await
            .ok_or(SessionError::AuthRequired)?;

        let saved = match draft.bound_post_id {
            None => {
                tracing::debug!(owner_id = %identity.user_id, "Inserting new post");
                let post = self
                    .posts
                    .insert(identity.user_id, input)
                    .await
                    .map_err(|e| persist_failed(e.to_string()))?;
                SavedPost {
                    post,
                    created: true,
                }
            }
            Some(id) => {
                tracing::debug!(owner_id = %identity.user_id, post_id = %id, "Updating post");
                let post = self
                    .posts
                    .update(identity.user_id, id, input)
                    .await
                    .map_err(|e| persist_failed(e.to_string()))?;
                SavedPost {
                    post,
                    created: false,
                }
            }
        };

        self.with_draft(Draft::clear);
        tracing::info!(post_id = %saved.post.id, created = saved.created, "Post saved");

        // No subscribers is fine.
        let _ = self.saved_tx.send(saved.clone());
        Ok(saved)
    }

    fn with_draft<R>(&self, f: impl FnOnce(&mut Draft) -> R) -> R {
        let mut draft = self.draft.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut draft)
    }
}

fn generation_failed(err: GenerateError) -> SessionError {
    tracing::warn!(error = %err, "Generation failed");
    SessionError::Generation(err.to_string())
}

fn persist_failed(message: String) -> SessionError {
    tracing::warn!(error = %message, "Saving post failed");
    SessionError::Persist(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeGenerator, FakeIdentity, FakePosts};

    struct Fixture {
        identity: Arc<FakeIdentity>,
        posts: Arc<FakePosts>,
        generator: Arc<FakeGenerator>,
        session: EditorSession,
    }

    fn fixture(generator: FakeGenerator) -> Fixture {
        let identity = Arc::new(FakeIdentity::signed_in());
        let posts = Arc::new(FakePosts::new());
        let generator = Arc::new(generator);
        let session = EditorSession::new(identity.clone(), posts.clone(), generator.clone());
        Fixture {
            identity,
            posts,
            generator,
            session,
        }
    }

    #[tokio::test]
    async fn test_generate_fills_empty_draft() {
        let f = fixture(FakeGenerator::replying("# Rust Ownership\n\nBody text..."));

        f.session.generate("rust ownership").await.unwrap();

        let draft = f.session.draft();
        assert_eq!(draft.title, "Rust Ownership");
        assert_eq!(draft.topic, "rust ownership");
        assert_eq!(draft.content, "# Rust Ownership\n\nBody text...");
        assert_eq!(f.generator.prompts(), vec!["rust ownership".to_string()]);
    }

    #[tokio::test]
    async fn test_generate_keeps_existing_title_and_topic() {
        let f = fixture(FakeGenerator::replying("# Something Else\nnew body"));
        f.session.set_title("My title");
        f.session.set_topic("my topic");
        f.session.set_content("old body");

        f.session.generate("rust ownership").await.unwrap();

        let draft = f.session.draft();
        assert_eq!(draft.title, "My title");
        assert_eq!(draft.topic, "my topic");
        assert_eq!(draft.content, "# Something Else\nnew body");
    }

    #[tokio::test]
    async fn test_generate_blank_prompt_makes_no_call() {
        let f = fixture(FakeGenerator::replying("unused"));

        for prompt in ["", "   ", "\n\t"] {
            let result = f.session.generate(prompt).await;
            assert!(matches!(result, Err(SessionError::Validation(_))));
        }
        assert_eq!(f.generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_generate_failure_leaves_draft_unchanged() {
        let f = fixture(FakeGenerator::failing("model overloaded"));
        f.session.set_content("hand written");

        let err = f.session.generate("rust ownership").await.unwrap_err();

        assert!(matches!(&err, SessionError::Generation(msg) if msg == "model overloaded"));
        assert_eq!(f.session.draft().content, "hand written");
        assert!(f.session.draft().title.is_empty());
        assert_eq!(f.session.generation_state(), OpState::Idle);
    }

    #[tokio::test]
    async fn test_generate_empty_response_is_an_error() {
        let f = fixture(FakeGenerator::replying("   \n"));

        let err = f.session.generate("rust ownership").await.unwrap_err();

        assert!(matches!(&err, SessionError::Generation(msg) if msg == "no content received"));
        assert!(f.session.draft().is_empty());
    }

    #[tokio::test]
    async fn test_generate_rejects_reentry_while_in_flight() {
        let f = fixture(FakeGenerator::gated("# Title\nbody"));
        let gate = f.generator.gate();

        let first = f.session.generate("rust ownership");
        let second = async {
            gate.wait_started().await;
            assert_eq!(f.session.generation_state(), OpState::InFlight);
            let result = f.session.generate("another prompt").await;
            gate.open();
            result
        };
        let (first, second) = tokio::join!(first, second);

        assert!(first.is_ok());
        assert!(matches!(second, Err(SessionError::Busy(Operation::Generate))));
        assert_eq!(f.generator.calls(), 1);
        assert_eq!(f.session.generation_state(), OpState::Idle);
    }

    #[tokio::test]
    async fn test_generation_overwrites_edit_made_while_in_flight() {
        let f = fixture(FakeGenerator::gated("generated body"));
        let gate = f.generator.gate();

        let generate = f.session.generate("topic words here");
        let edit = async {
            gate.wait_started().await;
            f.session.set_content("typed while waiting");
            f.session.set_title("Typed title");
            gate.open();
        };
        let (result, ()) = tokio::join!(generate, edit);

        result.unwrap();
        let draft = f.session.draft();
        assert_eq!(draft.content, "generated body");
        assert_eq!(draft.title, "Typed title");
        assert_eq!(draft.topic, "topic words");
    }

    #[tokio::test]
    async fn test_save_creates_post_and_clears_draft() {
        let f = fixture(FakeGenerator::replying("unused"));
        let mut saved_rx = f.session.subscribe();
        f.session.set_title("Hello");
        f.session.set_content("World\nsecond line");
        f.session.set_topic("  ");
        f.session.set_ai_prompt("leftover prompt");

        let saved = f.session.save().await.unwrap();

        assert!(saved.created);
        assert_eq!(saved.post.owner_id, f.identity.user_id());
        assert_eq!(saved.post.content, "World\nsecond line");
        assert_eq!(saved.post.topic, None);
        assert_eq!(f.posts.len(), 1);
        assert!(f.session.draft().is_empty());
        assert_eq!(f.session.mode(), EditorMode::New);

        let signal = saved_rx.try_recv().unwrap();
        assert_eq!(signal.post.id, saved.post.id);
    }

    #[tokio::test]
    async fn test_save_updates_bound_post_in_place() {
        let f = fixture(FakeGenerator::replying("unused"));
        let existing = f.posts.seed(f.identity.user_id(), "Old", 0);
        f.session.load(&existing);
        assert_eq!(f.session.mode(), EditorMode::Editing(existing.id));

        f.session.set_title("New title");
        f.session.set_topic("rust");
        let saved = f.session.save().await.unwrap();

        assert!(!saved.created);
        assert_eq!(saved.post.id, existing.id);
        assert_eq!(saved.post.title, "New title");
        assert_eq!(saved.post.topic.as_deref(), Some("rust"));
        assert!(saved.post.updated_at > existing.updated_at);
        assert_eq!(f.posts.len(), 1);
        assert_eq!(f.session.mode(), EditorMode::New);
    }

    #[tokio::test]
    async fn test_save_validation_makes_no_call() {
        let f = fixture(FakeGenerator::replying("unused"));
        f.session.set_title("   ");
        f.session.set_content("body");

        let result = f.session.save().await;

        assert!(matches!(result, Err(SessionError::Validation(_))));
        assert_eq!(f.posts.calls(), 0);
        assert_eq!(f.identity.lookups(), 0);

        f.session.set_title("Title");
        f.session.set_content(" \n ");
        assert!(matches!(
            f.session.save().await,
            Err(SessionError::Validation(_))
        ));
        assert_eq!(f.posts.calls(), 0);
    }

    #[tokio::test]
    async fn test_save_requires_identity_at_call_time() {
        let f = fixture(FakeGenerator::replying("unused"));
        f.session.set_title("Title");
        f.session.set_content("Body");
        f.identity.sign_out_now();

        let result = f.session.save().await;

        assert!(matches!(result, Err(SessionError::AuthRequired)));
        assert_eq!(f.posts.calls(), 0);
        assert_eq!(f.session.draft().title, "Title");

        f.identity.sign_in_now();
        assert!(f.session.save().await.is_ok());
    }

    #[tokio::test]
    async fn test_save_failure_keeps_draft_and_emits_nothing() {
        let f = fixture(FakeGenerator::replying("unused"));
        let mut saved_rx = f.session.subscribe();
        f.session.set_title("Title");
        f.session.set_content("Body");
        f.posts.fail_with("connection reset");

        let result = f.session.save().await;

        assert!(matches!(&result, Err(SessionError::Persist(msg)) if msg.contains("connection reset")));
        assert_eq!(f.session.draft().title, "Title");
        assert_eq!(f.session.draft().content, "Body");
        assert!(saved_rx.try_recv().is_err());
        assert_eq!(f.session.save_state(), OpState::Idle);
    }

    #[tokio::test]
    async fn test_save_rejects_reentry_while_in_flight() {
        let f = fixture(FakeGenerator::replying("unused"));
        let gate = f.posts.gate();
        f.session.set_title("Title");
        f.session.set_content("Body");

        let first = f.session.save();
        let second = async {
            gate.wait_started().await;
            let result = f.session.save().await;
            gate.open();
            result
        };
        let (first, second) = tokio::join!(first, second);

        assert!(first.is_ok());
        assert!(matches!(second, Err(SessionError::Busy(Operation::Save))));
        assert_eq!(f.posts.len(), 1);
    }

    #[tokio::test]
    async fn test_generate_and_save_may_overlap() {
        let f = fixture(FakeGenerator::gated("# Later\nlate body"));
        let gate = f.generator.gate();
        f.session.set_title("Title");
        f.session.set_content("Body");

        let generate = f.session.generate("rust ownership");
        let save = async {
            gate.wait_started().await;
            let saved = f.session.save().await;
            gate.open();
            saved
        };
        let (generated, saved) = tokio::join!(generate, save);

        assert!(saved.is_ok());
        generated.unwrap();
        // The draft was cleared by the save, so the late result fills everything.
        let draft = f.session.draft();
        assert_eq!(draft.title, "Later");
        assert_eq!(draft.content, "# Later\nlate body");
    }
}
