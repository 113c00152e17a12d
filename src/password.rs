//! Password hashing and verification using Argon2id.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

/// Errors that can occur during password operations.
#[derive(Debug)]
pub enum PasswordError {
    /// Hashing the plaintext failed
    Hashing(argon2::password_hash::Error),
    /// The stored digest is not a valid PHC string
    InvalidDigest,
}

impl std::fmt::Display for PasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasswordError::Hashing(e) => write!(f, "Failed to hash password: {}", e),
            PasswordError::InvalidDigest => write!(f, "Invalid password digest format"),
        }
    }
}

impl std::error::Error for PasswordError {}

/// Hash a plaintext password with Argon2id and a random salt.
/// Returns a PHC string that embeds algorithm, parameters, and salt.
pub fn hash(plaintext: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let digest = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(PasswordError::Hashing)?;
    Ok(digest.to_string())
}

/// Verify a plaintext password against a stored digest.
/// A mismatch is `Ok(false)`, not an error.
pub fn verify(plaintext: &str, digest: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(digest).map_err(|_| PasswordError::InvalidDigest)?;
    match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(_) => Err(PasswordError::InvalidDigest),
    }
}
