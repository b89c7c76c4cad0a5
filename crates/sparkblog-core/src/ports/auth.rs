//! Authentication and identity ports.

use async_trait::async_trait;
use uuid::Uuid;

/// The signed-in user as seen by the editor and the post list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
}

/// Source of the current identity.
///
/// Callers ask on every operation; the answer is never cached on their side.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The signed-in identity, or `None` when nobody is signed in.
    async fn current_identity(&self) -> Option<Identity>;

    /// End the current session.
    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// Claims stored in session tokens.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub email: String,
    pub exp: i64,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
        }
    }
}

/// Token service for session tokens.
pub trait TokenService: Send + Sync {
    /// Issue a session token for a user.
    fn generate_token(&self, user_id: Uuid, email: &str) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of issued tokens.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Auth backend error: {0}")]
    Backend(String),
}
