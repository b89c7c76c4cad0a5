//! Accounts, password hashing and session tokens.

mod accounts;
mod jwt;
mod password;
mod session;

pub use accounts::{AccountError, AccountService, SignedIn};
pub use jwt::{JwtConfig, JwtTokenService};
pub use password::Argon2PasswordService;
pub use session::SessionIdentityProvider;
