//! Password hashing and verification using Argon2id

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::OnceLock;
use thiserror::Error;

/// Error types for password operations
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),
}

/// Hash a password using Argon2id
///
/// Every call draws a fresh 16-byte salt from the OS RNG, so hashing the same
/// password twice yields two different PHC strings. Both verify.
///
/// # Returns
/// * `Ok(String)` - PHC-formatted hash string (suitable for storage)
/// * `Err(PasswordError)` - If hashing fails
///
/// # Example
/// ```
/// use taskly_auth::password::hash_password;
///
/// let hash = hash_password("MySecurePassword123!").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(password_hash.to_string())
}

/// Verify a password against a stored hash
///
/// Returns `true` only when `hash` is a well-formed PHC string produced from
/// `password`. A malformed or foreign hash is a mismatch, not an error.
///
/// # Example
/// ```
/// use taskly_auth::password::{hash_password, verify_password};
///
/// let hash = hash_password("MyPassword123!").unwrap();
/// assert!(verify_password("MyPassword123!", &hash));
/// assert!(!verify_password("WrongPassword", &hash));
/// assert!(!verify_password("MyPassword123!", "not-a-hash"));
/// ```
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// A real Argon2id hash of a random password, computed once
///
/// Verifying against it costs the same as verifying a stored hash, so a
/// sign-in for an unknown account takes as long as one with a wrong password.
/// Empty if hashing failed, which `verify_password` treats as a mismatch.
pub fn placeholder_hash() -> &'static str {
    static PLACEHOLDER: OnceLock<String> = OnceLock::new();

    PLACEHOLDER.get_or_init(|| {
        let secret = SaltString::generate(&mut OsRng);
        hash_password(secret.as_str()).unwrap_or_default()
    })
}
