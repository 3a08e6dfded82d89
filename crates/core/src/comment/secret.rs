//! Hashing of comment passwords for the shared-secret policy.
//!
//! Stored form is `base64(salt):base64(hash)` with an argon2 hash over a
//! random per-comment salt.

use argon2::{Argon2, Params};
use base64::{prelude::BASE64_STANDARD, Engine};
use thiserror::Error;

pub const SECRET_SALT_LEN: usize = 16;
pub const SECRET_HASH_LEN: usize = Params::DEFAULT_OUTPUT_LEN;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SecretError {
    #[error("Hashing secret failed: {0}")]
    Hash(String),
    #[error("Stored secret is malformed: {0}")]
    Malformed(&'static str),
    #[error("Decoding base64 failed: {0}")]
    Decode(#[from] base64::DecodeError),
}

fn derive(secret: &str, salt: &[u8]) -> Result<[u8; SECRET_HASH_LEN], SecretError> {
    let mut hash = [0u8; SECRET_HASH_LEN];
    Argon2::default()
        .hash_password_into(secret.as_bytes(), salt, &mut hash)
        .map_err(|e| SecretError::Hash(e.to_string()))?;
    Ok(hash)
}

/// Hashes `secret` with a fresh random salt.
pub fn hash_secret(secret: &str) -> Result<String, SecretError> {
    let salt: [u8; SECRET_SALT_LEN] = rand::random();
    let hash = derive(secret, &salt)?;

    Ok(format!(
        "{}:{}",
        BASE64_STANDARD.encode(salt),
        BASE64_STANDARD.encode(hash)
    ))
}

/// Checks `secret` against a value produced by [`hash_secret`].
pub fn verify_secret(secret: &str, stored: &str) -> Result<bool, SecretError> {
    let (salt_part, hash_part) = stored
        .split_once(':')
        .ok_or(SecretError::Malformed("missing ':' separator"))?;

    let salt = BASE64_STANDARD.decode(salt_part)?;
    let expected: [u8; SECRET_HASH_LEN] = BASE64_STANDARD
        .decode(hash_part)?
        .try_into()
        .map_err(|_| SecretError::Malformed("hash has the wrong length"))?;

    Ok(derive(secret, &salt)? == expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let stored = hash_secret("hunter2").unwrap();
        assert!(verify_secret("hunter2", &stored).unwrap());
        assert!(!verify_secret("hunter3", &stored).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_secret("same").unwrap();
        let second = hash_secret("same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_rejects_malformed_values() {
        assert_eq!(
            verify_secret("x", "no-separator"),
            Err(SecretError::Malformed("missing ':' separator"))
        );
        assert!(matches!(
            verify_secret("x", "!!!:???"),
            Err(SecretError::Decode(_))
        ));
        assert_eq!(
            verify_secret("x", "c2FsdHNhbHRzYWx0c2FsdA==:c2hvcnQ="),
            Err(SecretError::Malformed("hash has the wrong length"))
        );
    }
}
