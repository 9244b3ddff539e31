//! Password hashing behind a pluggable [`CredentialHasher`].
//!
//! The default hasher is Argon2id with a random salt per password, stored in
//! PHC string format so parameters and salt travel with the hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Minimum accepted password length at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Hashes and verifies user passwords.
///
/// Held in `AppState` as `Arc<dyn CredentialHasher>` so deployments (and
/// tests) can swap the scheme without touching handlers.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password for storage.
    fn hash(&self, password: &str) -> Result<String, argon2::password_hash::Error>;

    /// Check a plaintext password against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch; `Err` only for malformed hashes.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error>;
}

/// Argon2id with default parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Credentials;

impl CredentialHasher for Argon2Credentials {
    fn hash(&self, password: &str) -> Result<String, argon2::password_hash::Error> {
        hash_password(password)
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
        verify_password(password, hash)
    }
}

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted Argon2id hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Validate that a password meets the minimum length.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.chars().count() < min_length {
        return Err(format!(
            "Password must be at least {min_length} characters long"
        ));
    }
    Ok(())
}
