//! Identity backed by a session token held in memory.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use sparkblog_core::ports::{AuthError, Identity, IdentityProvider, TokenService};

/// Holds the session token of the signed-in user.
///
/// The token is re-validated on every lookup, so an expired session reads
/// as "nobody signed in" without any background timer.
pub struct SessionIdentityProvider {
    tokens: Arc<dyn TokenService>,
    token: RwLock<Option<String>>,
}

impl SessionIdentityProvider {
    pub fn new(tokens: Arc<dyn TokenService>) -> Self {
        Self {
            tokens,
            token: RwLock::new(None),
        }
    }

    /// Adopt a token issued by [`super::AccountService`] or the API server.
    pub async fn sign_in_with_token(&self, token: String) -> Result<Identity, AuthError> {
        let claims = self.tokens.validate_token(&token)?;
        *self.token.write().await = Some(token);
        tracing::info!(user_id = %claims.user_id, "Session started");
        Ok(claims.into())
    }
}

#[async_trait]
impl IdentityProvider for SessionIdentityProvider {
    async fn current_identity(&self) -> Option<Identity> {
        let token = self.token.read().await;
        let token = token.as_deref()?;
        match self.tokens.validate_token(token) {
            Ok(claims) => Some(claims.into()),
            Err(e) => {
                tracing::debug!(error = %e, "Session token no longer valid");
                None
            }
        }
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.token.write().await.take();
        tracing::info!("Signed out");
        Ok(())
    }
}
