//! Credential hashing and session tokens for Taskly

pub mod jwt;
pub mod password;

pub use jwt::{JwtError, SessionClaims, TokenCodec, SESSION_TOKEN_VALIDITY_DAYS};
pub use password::{hash_password, placeholder_hash, verify_password, PasswordError};
