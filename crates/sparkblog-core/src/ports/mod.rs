//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod confirm;
mod generation;
mod notify;
mod repository;

pub use auth::{AuthError, Identity, IdentityProvider, PasswordService, TokenClaims, TokenService};
pub use confirm::Confirmation;
pub use generation::{GenerateError, TextGenerator};
pub use notify::{Notification, NotificationLevel, Notifier};
pub use repository::{BaseRepository, PostRepository, UserRepository};
