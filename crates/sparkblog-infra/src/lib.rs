//! # SparkBlog Infrastructure
//!
//! Concrete implementations of the ports defined in `sparkblog-core`.
//! This crate contains post storage, accounts, text generation and the
//! HTTP client for talking to a running API server.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory store and template generator only
//! - `postgres` - PostgreSQL post and user storage via SeaORM
//! - `auth` - JWT + Argon2 accounts and sessions
//! - `remote` - reqwest clients for the API server and OpenAI-compatible generation

pub mod confirm;
pub mod database;
pub mod generation;
pub mod notify;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "remote")]
pub mod remote;


// Re-exports - In-Memory
pub use confirm::{AlwaysConfirm, NeverConfirm, TerminalConfirm};
pub use database::{DatabaseConfig, InMemoryPostRepository, InMemoryUserRepository};
pub use generation::{GenerationConfig, TemplateGenerator, build_generator};
pub use notify::TracingNotifier;

#[cfg(feature = "auth")]
pub use auth::{
    AccountError, AccountService, Argon2PasswordService, JwtConfig, JwtTokenService,
    SessionIdentityProvider, SignedIn,
};

// Re-exports - PostgreSQL
#[cfg(feature = "postgres")]
pub use database::{PostgresPostRepository, PostgresUserRepository, connect};

// Re-exports - HTTP
#[cfg(feature = "remote")]
pub use generation::OpenAiGenerator;
#[cfg(feature = "remote")]
pub use remote::{RemoteBackend, RemoteConfig, RemoteError};
