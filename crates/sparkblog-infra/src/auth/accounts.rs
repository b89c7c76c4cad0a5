//! Registration and sign-in.

use std::sync::Arc;

use sparkblog_core::domain::User;
use sparkblog_core::error::RepoError;
use sparkblog_core::ports::{AuthError, PasswordService, TokenService, UserRepository};

const MIN_PASSWORD_LEN: usize = 8;

/// Result of a successful registration or sign-in.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user: User,
    pub token: String,
    pub expires_in: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Password must be at least 8 characters")]
    WeakPassword,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<SignedIn, AccountError> {
        let email = User::parse_email(email).ok_or(AccountError::InvalidEmail)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AccountError::WeakPassword);
        }
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AccountError::EmailTaken);
        }

        let hash = self.passwords.hash(password)?;
        let user = match self.users.save(User::new(email, hash)).await {
            Err(RepoError::Constraint(_)) => return Err(AccountError::EmailTaken),
            other => other?,
        };
        tracing::info!(user_id = %user.id, "Account registered");
        self.issue(user)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, AccountError> {
        let user = self
            .users
            .find_by_email(email.trim())
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !self.passwords.verify(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(AccountError::InvalidCredentials);
        }
        self.issue(user)
    }

    fn issue(&self, user: User) -> Result<SignedIn, AccountError> {
        let token = self.tokens.generate_token(user.id, &user.email)?;
        Ok(SignedIn {
            user,
            token,
            expires_in: self.tokens.expiration_seconds(),
        })
    }
}
