use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registered account. Posts point back here through `owner_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let joined = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password_hash: password_hash.into(),
            created_at: joined,
            updated_at: joined,
        }
    }

    /// The trimmed address, or `None` when it has no `@`.
    pub fn parse_email(raw: &str) -> Option<&str> {
        let email = raw.trim();
        email.contains('@').then_some(email)
    }
}
