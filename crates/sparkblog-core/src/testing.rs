//! Hand-written fakes for every port, shared by the unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::Notify;
use uuid::Uuid;

use crate::domain::{Post, PostInput};
use crate::error::RepoError;
use crate::ports::{
    AuthError, Confirmation, GenerateError, Identity, IdentityProvider, Notification, Notifier,
    PostRepository, TextGenerator,
};

/// Holds a call in flight until the test opens it.
#[derive(Default)]
pub(crate) struct Gate {
    started: Notify,
    release: Notify,
}

impl Gate {
    async fn pass(&self) {
        self.started.notify_one();
        self.release.notified().await;
    }

    pub(crate) async fn wait_started(&self) {
        self.started.notified().await;
    }

    pub(crate) fn open(&self) {
        self.release.notify_one();
    }
}

pub(crate) struct FakeIdentity {
    identity: Identity,
    signed_in: AtomicBool,
    lookups: AtomicUsize,
    sign_outs: AtomicUsize,
}

impl FakeIdentity {
    pub(crate) fn signed_in() -> Self {
        Self {
            identity: Identity {
                user_id: Uuid::new_v4(),
                email: "writer@example.com".to_string(),
            },
            signed_in: AtomicBool::new(true),
            lookups: AtomicUsize::new(0),
            sign_outs: AtomicUsize::new(0),
        }
    }

    pub(crate) fn user_id(&self) -> Uuid {
        self.identity.user_id
    }

    pub(crate) fn sign_out_now(&self) {
        self.signed_in.store(false, Ordering::SeqCst);
    }

    pub(crate) fn sign_in_now(&self) {
        self.signed_in.store(true, Ordering::SeqCst);
    }

    pub(crate) fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub(crate) fn sign_outs(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn current_identity(&self) -> Option<Identity> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.signed_in
            .load(Ordering::SeqCst)
            .then(|| self.identity.clone())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        self.sign_out_now();
        Ok(())
    }
}

/// In-memory store that returns rows in insertion order, so ordering is
/// left to the caller.
pub(crate) struct FakePosts {
    rows: Mutex<Vec<Post>>,
    calls: AtomicUsize,
    failure: Mutex<Option<String>>,
    fetch_failure: Mutex<Option<String>>,
    gate: Mutex<Option<Arc<Gate>>>,
}

impl FakePosts {
    pub(crate) fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            failure: Mutex::new(None),
            fetch_failure: Mutex::new(None),
            gate: Mutex::new(None),
        }
    }

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    /// Insert a row directly, `created_at` = base time + `minutes`.
    pub(crate) fn seed(&self, owner_id: Uuid, title: &str, minutes: i64) -> Post {
        let at = Self::base_time() + Duration::minutes(minutes);
        let post = Post {
            id: Uuid::new_v4(),
            owner_id,
            title: title.to_string(),
            content: format!("{title} body"),
            topic: None,
            created_at: at,
            updated_at: at,
        };
        self.rows.lock().unwrap().push(post.clone());
        post
    }

    /// Make every following call fail until [`FakePosts::recover`].
    pub(crate) fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    /// Fail only `find_by_owner`; writes keep working.
    pub(crate) fn fail_fetches_with(&self, message: &str) {
        *self.fetch_failure.lock().unwrap() = Some(message.to_string());
    }

    pub(crate) fn recover(&self) {
        *self.failure.lock().unwrap() = None;
        *self.fetch_failure.lock().unwrap() = None;
    }

    /// Hold every following call until the returned gate opens.
    pub(crate) fn gate(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub(crate) fn ungate(&self) {
        *self.gate.lock().unwrap() = None;
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub(crate) fn remove_behind_the_scenes(&self, id: Uuid) {
        self.rows.lock().unwrap().retain(|p| p.id != id);
    }

    async fn enter(&self) -> Result<(), RepoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        match self.failure.lock().unwrap().clone() {
            Some(message) => Err(RepoError::Query(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PostRepository for FakePosts {
    async fn insert(&self, owner_id: Uuid, input: PostInput) -> Result<Post, RepoError> {
        self.enter().await?;
        let post = Post::new(owner_id, input);
        self.rows.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn update(&self, owner_id: Uuid, id: Uuid, input: PostInput) -> Result<Post, RepoError> {
        self.enter().await?;
        let mut rows = self.rows.lock().unwrap();
        let post = rows
            .iter_mut()
            .find(|p| p.id == id && p.owner_id == owner_id)
            .ok_or(RepoError::NotFound)?;
        post.apply(input);
        Ok(post.clone())
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<(), RepoError> {
        self.enter().await?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| !(p.id == id && p.owner_id == owner_id));
        if rows.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    /// Rows are read before the gate, so a held call answers with the
    /// store as it was when the call started.
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let rows: Vec<Post> = {
            let rows = self.rows.lock().unwrap();
            rows.iter().filter(|p| p.owner_id == owner_id).cloned().collect()
        };
        self.enter().await?;
        if let Some(message) = self.fetch_failure.lock().unwrap().clone() {
            return Err(RepoError::Query(message));
        }
        Ok(rows)
    }
}

pub(crate) struct FakeGenerator {
    replies: Mutex<VecDeque<Result<String, GenerateError>>>,
    fallback: Result<String, String>,
    prompts: Mutex<Vec<String>>,
    gate: Arc<Gate>,
    gated: bool,
}

impl FakeGenerator {
    fn with(fallback: Result<String, String>, gated: bool) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback,
            prompts: Mutex::new(Vec::new()),
            gate: Arc::new(Gate::default()),
            gated,
        }
    }

    pub(crate) fn replying(text: &str) -> Self {
        Self::with(Ok(text.to_string()), false)
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self::with(Err(message.to_string()), false)
    }

    /// Every call waits on [`FakeGenerator::gate`] before answering `text`.
    pub(crate) fn gated(text: &str) -> Self {
        Self::with(Ok(text.to_string()), true)
    }

    /// Queue a one-off reply ahead of the fallback.
    pub(crate) fn then(self, reply: Result<String, GenerateError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub(crate) fn gate(&self) -> Arc<Gate> {
        self.gate.clone()
    }

    pub(crate) fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.gated {
            self.gate.pass().await;
        }
        let queued = self.replies.lock().unwrap().pop_front();
        match queued {
            Some(reply) => reply,
            None => self.fallback.clone().map_err(GenerateError::Upstream),
        }
    }
}

pub(crate) struct FakeConfirm {
    answer: AtomicBool,
    questions: Mutex<Vec<String>>,
}

impl FakeConfirm {
    pub(crate) fn answering(answer: bool) -> Self {
        Self {
            answer: AtomicBool::new(answer),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn set_answer(&self, answer: bool) {
        self.answer.store(answer, Ordering::SeqCst);
    }

    pub(crate) fn asked(&self) -> usize {
        self.questions.lock().unwrap().len()
    }
}

#[async_trait]
impl Confirmation for FakeConfirm {
    async fn confirm(&self, question: &str) -> bool {
        self.questions.lock().unwrap().push(question.to_string());
        self.answer.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub(crate) fn titles(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.title.clone())
            .collect()
    }

    pub(crate) fn last(&self) -> Option<Notification> {
        self.seen.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}
