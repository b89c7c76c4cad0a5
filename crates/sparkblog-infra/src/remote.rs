//! HTTP client for the SparkBlog API server.
//!
//! [`RemoteBackend`] plays all three remote roles for the editor and the post
//! list: identity, post store and text generator. The server enforces
//! ownership from the bearer token, so the owner ids passed in by the core
//! are not sent over the wire.

use std::env;

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use uuid::Uuid;

use sparkblog_core::domain::{Post, PostInput};
use sparkblog_core::error::RepoError;
use sparkblog_core::ports::{
    AuthError, GenerateError, Identity, IdentityProvider, PostRepository, TextGenerator,
};
use sparkblog_shared::dto::{
    AuthResponse, GenerateRequest, GenerateResponse, LoginRequest, PostRequest, PostResponse,
    RegisterUserRequest, UserResponse,
};
use sparkblog_shared::{ApiResponse, ErrorResponse};

const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";

#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl RemoteConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("SPARKBLOG_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Api(ErrorResponse),

    #[error("Response carried no data")]
    MissingData,
}

impl RemoteError {
    fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Api(problem) => Some(problem.status),
            _ => None,
        }
    }
}

impl From<RemoteError> for RepoError {
    fn from(err: RemoteError) -> Self {
        match err.status() {
            Some(404) => RepoError::NotFound,
            Some(409) => RepoError::Constraint(err.to_string()),
            _ => match err {
                RemoteError::Http(e) => RepoError::Connection(e.to_string()),
                other => RepoError::Query(other.to_string()),
            },
        }
    }
}

impl From<RemoteError> for GenerateError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Api(ErrorResponse {
                detail: Some(detail),
                ..
            }) => GenerateError::Upstream(detail),
            RemoteError::MissingData => GenerateError::EmptyResponse,
            other => GenerateError::Upstream(other.to_string()),
        }
    }
}

pub(crate) fn post_from_response(response: PostResponse) -> Post {
    Post {
        id: response.id,
        owner_id: response.user_id,
        title: response.title,
        content: response.content,
        topic: response.topic,
        created_at: response.created_at,
        updated_at: response.updated_at,
    }
}

fn post_request(input: PostInput) -> PostRequest {
    PostRequest {
        title: input.title,
        content: input.content,
        topic: input.topic,
    }
}

pub struct RemoteBackend {
    client: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl RemoteBackend {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        }
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<Identity, RemoteError> {
        let body = RegisterUserRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth: AuthResponse = self
            .send(self.client.post(self.url("/api/auth/register")).json(&body))
            .await?;
        self.adopt(auth).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, RemoteError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth: AuthResponse = self
            .send(self.client.post(self.url("/api/auth/login")).json(&body))
            .await?;
        self.adopt(auth).await
    }

    async fn adopt(&self, auth: AuthResponse) -> Result<Identity, RemoteError> {
        *self.token.write().await = Some(auth.access_token);
        let identity = self.me().await?;
        tracing::info!(user_id = %identity.user_id, "Signed in to API server");
        Ok(identity)
    }

    async fn me(&self) -> Result<Identity, RemoteError> {
        let user: UserResponse = self.send(self.client.get(self.url("/api/auth/me"))).await?;
        Ok(Identity {
            user_id: user.id,
            email: user.email,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token.read().await.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn dispatch(&self, request: RequestBuilder) -> Result<reqwest::Response, RemoteError> {
        let response = self.authorize(request).await.send().await?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        Err(RemoteError::Api(problem_from_body(status, &text)))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, RemoteError> {
        let envelope: ApiResponse<T> = self.dispatch(request).await?.json().await?;
        envelope.into_data().ok_or(RemoteError::MissingData)
    }
}

fn problem_from_body(status: StatusCode, body: &str) -> ErrorResponse {
    serde_json::from_str(body).unwrap_or_else(|_| {
        let problem = ErrorResponse::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or("Error"),
        );
        if body.trim().is_empty() {
            problem
        } else {
            problem.with_detail(body.trim())
        }
    })
}

#[async_trait]
impl IdentityProvider for RemoteBackend {
    async fn current_identity(&self) -> Option<Identity> {
        if self.token.read().await.is_none() {
            return None;
        }
        match self.me().await {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::debug!(error = %e, "Session rejected by API server");
                None
            }
        }
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.token.write().await.take();
        Ok(())
    }
}

#[async_trait]
impl PostRepository for RemoteBackend {
    async fn insert(&self, _owner_id: Uuid, input: PostInput) -> Result<Post, RepoError> {
        let request = self
            .client
            .post(self.url("/api/posts"))
            .json(&post_request(input));
        let post: PostResponse = self.send(request).await?;
        Ok(post_from_response(post))
    }

    async fn update(&self, _owner_id: Uuid, id: Uuid, input: PostInput) -> Result<Post, RepoError> {
        let request = self
            .client
            .put(self.url(&format!("/api/posts/{id}")))
            .json(&post_request(input));
        let post: PostResponse = self.send(request).await?;
        Ok(post_from_response(post))
    }

    async fn delete(&self, _owner_id: Uuid, id: Uuid) -> Result<(), RepoError> {
        let request = self.client.delete(self.url(&format!("/api/posts/{id}")));
        self.dispatch(request).await?;
        Ok(())
    }

    async fn find_by_owner(&self, _owner_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let posts: Vec<PostResponse> = self.send(self.client.get(self.url("/api/posts"))).await?;
        Ok(posts.into_iter().map(post_from_response).collect())
    }
}

#[async_trait]
impl TextGenerator for RemoteBackend {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let body = GenerateRequest {
            prompt: prompt.to_string(),
        };
        let response: GenerateResponse = self
            .send(self.client.post(self.url("/api/generate")).json(&body))
            .await?;
        Ok(response.content)
    }
}
