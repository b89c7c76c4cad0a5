//! JWT session tokens.
//!
//! A SparkBlog session is a signed token naming the account (`sub`) and its
//! email. Nothing is stored server-side; expiry is the only way a session
//! ends besides the client discarding it.

use std::env;

use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sparkblog_core::ports::{AuthError, TokenClaims, TokenService};

const DEFAULT_SECRET: &str = "change-me-in-production";
const DEFAULT_ISSUER: &str = "sparkblog";
const DEFAULT_EXPIRATION_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: DEFAULT_EXPIRATION_HOURS,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }
}

impl JwtConfig {
    /// Read `JWT_SECRET`, `JWT_EXPIRATION_HOURS` and `JWT_ISSUER`.
    pub fn from_env() -> Self {
        let config = Self {
            secret: env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_SECRET.to_string()),
            expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_EXPIRATION_HOURS),
            issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string()),
        };
        if config.uses_default_secret() {
            tracing::warn!("JWT_SECRET not set; session tokens are signed with the default secret");
        }
        config
    }

    fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

/// Claims as they travel inside the token.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: Uuid,
    email: String,
    iss: String,
    iat: i64,
    exp: i64,
}

impl From<SessionClaims> for TokenClaims {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            exp: claims.exp,
        }
    }
}

fn rejected(err: JwtError) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken(err.to_string()),
    }
}

/// HS256 signer/verifier for session tokens.
pub struct JwtTokenService {
    signing: EncodingKey,
    verifying: DecodingKey,
    validation: Validation,
    issuer: String,
    lifetime: TimeDelta,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::default();
        validation.set_issuer(&[&config.issuer]);

        Self {
            signing: EncodingKey::from_secret(config.secret.as_bytes()),
            verifying: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer,
            lifetime: TimeDelta::hours(config.expiration_hours),
        }
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(&self, user_id: Uuid, email: &str) -> Result<String, AuthError> {
        let issued = Utc::now();
        let claims = SessionClaims {
            sub: user_id,
            email: email.to_string(),
            iss: self.issuer.clone(),
            iat: issued.timestamp(),
            exp: (issued + self.lifetime).timestamp(),
        };

        encode(&Header::default(), &claims, &self.signing).map_err(rejected)
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<SessionClaims>(token, &self.verifying, &self.validation)
            .map(|data| data.claims.into())
            .map_err(rejected)
    }

    fn expiration_seconds(&self) -> i64 {
        self.lifetime.num_seconds()
    }
}
