//! Application state - shared across all handlers.

use std::sync::Arc;

use sparkblog_core::ports::{PostRepository, TextGenerator, TokenService, UserRepository};
use sparkblog_infra::{
    AccountService, Argon2PasswordService, InMemoryPostRepository, InMemoryUserRepository,
    JwtConfig, JwtTokenService, build_generator,
};

#[cfg(feature = "postgres")]
use sparkblog_infra::{PostgresPostRepository, PostgresUserRepository, connect};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub accounts: Arc<AccountService>,
    pub tokens: Arc<dyn TokenService>,
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (posts, users) = Self::storage(config).await;
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let generator = build_generator(&config.generation);

        tracing::info!("Application state initialized");

        Self::assemble(posts, users, tokens, generator)
    }

    /// In-memory state, used when no database is configured and by tests.
    pub fn in_memory(generator: Arc<dyn TextGenerator>) -> Self {
        Self::assemble(
            Arc::new(InMemoryPostRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(JwtTokenService::new(JwtConfig::default())),
            generator,
        )
    }

    fn assemble(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenService>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let accounts = Arc::new(AccountService::new(
            users,
            Arc::new(Argon2PasswordService::new()),
            tokens.clone(),
        ));
        Self {
            posts,
            accounts,
            tokens,
            generator,
        }
    }

    #[cfg(feature = "postgres")]
    async fn storage(config: &AppConfig) -> (Arc<dyn PostRepository>, Arc<dyn UserRepository>) {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::memory_storage();
        };

        match connect(db_config).await {
            Ok(db) => (
                Arc::new(PostgresPostRepository::new(db.clone())),
                Arc::new(PostgresUserRepository::new(db)),
            ),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Self::memory_storage()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn storage(config: &AppConfig) -> (Arc<dyn PostRepository>, Arc<dyn UserRepository>) {
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL ignored - built without the postgres feature");
        }
        tracing::info!("Running without postgres feature - using in-memory repositories");
        Self::memory_storage()
    }

    fn memory_storage() -> (Arc<dyn PostRepository>, Arc<dyn UserRepository>) {
        (
            Arc::new(InMemoryPostRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
        )
    }
}
