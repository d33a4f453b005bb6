//! Password hashing and reset tokens.
//!
//! Argon2id for stored passwords. Reset tokens are random bytes handed to the
//! user in hex while only their SHA-256 digest is persisted.

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

use crate::error::ApiError;

/// How long a reset token stays redeemable.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 10;

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

/// False for a wrong password and for a malformed stored hash alike.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("stored password hash is malformed: {e}");
            false
        }
    }
}

/// ResetToken
///
/// `raw` goes to the user; `digest` goes to the database.
#[derive(Debug, Clone)]
pub struct ResetToken {
    pub raw: String,
    pub digest: String,
}

pub fn generate_reset_token() -> ResetToken {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    let raw = hex::encode(bytes);
    let digest = digest_reset_token(&raw);
    ResetToken { raw, digest }
}

pub fn digest_reset_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}
