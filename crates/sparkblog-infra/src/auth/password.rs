//! Argon2id hashing for account passwords.

use argon2::Argon2;
use argon2::password_hash::{
    self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};

use sparkblog_core::ports::{AuthError, PasswordService};

fn hashing_error(e: password_hash::Error) -> AuthError {
    AuthError::HashingError(e.to_string())
}

/// Salted PHC-string hashes with the crate's default Argon2id parameters.
#[derive(Default)]
pub struct Argon2PasswordService {
    hasher: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = self
            .hasher
            .hash_password(password.as_bytes(), &salt)
            .map_err(hashing_error)?;
        Ok(phc.to_string())
    }

    /// A wrong password is `Ok(false)`; an unreadable stored hash is an error.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let stored = PasswordHash::new(hash).map_err(hashing_error)?;
        match self.hasher.verify_password(password.as_bytes(), &stored) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(hashing_error(e)),
        }
    }
}
