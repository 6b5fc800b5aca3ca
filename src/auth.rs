//! Password hashing and bearer session tokens.
//!
//! Passwords are stored as `salt$digest` where both halves are hex and
//! the digest is SHA-256 over `salt$password`. Session tokens are 256
//! random bits handed to the client as hex; the database only ever sees
//! the token's SHA-256 fingerprint, so a leaked table cannot be replayed.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt = to_hex(&salt);
    let digest = salted_digest(&salt, password);
    format!("{salt}${digest}")
}

/// Check a password against a stored `salt$digest` hash.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, digest)) = stored.split_once('$') else {
        return false;
    };
    salted_digest(salt, password) == digest
}

/// Generate a new opaque session token for a client.
pub fn new_session_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    to_hex(&bytes)
}

/// The SHA-256 fingerprint under which a token is stored and looked up.
pub fn token_fingerprint(token: &str) -> String {
    to_hex(&Sha256::digest(token.as_bytes()))
}

fn salted_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b"$");
    hasher.update(password.as_bytes());
    to_hex(&hasher.finalize())
}

fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        write!(out, "{byte:02x}").expect("writing to a String cannot fail");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_password_verifies() {
        let hash = hash_password("correct horse");
        assert!(verify_password("correct horse", &hash));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let hash = hash_password("correct horse");
        assert!(!verify_password("battery staple", &hash));
    }

    #[test]
    fn malformed_stored_hash_is_rejected() {
        assert!(!verify_password("anything", "no-dollar-separator"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("password");
        let b = hash_password("password");
        assert_ne!(a, b);
        assert!(verify_password("password", &a));
        assert!(verify_password("password", &b));
    }

    #[test]
    fn token_fingerprint_is_stable_and_not_the_token() {
        let token = new_session_token();
        assert_eq!(token.len(), 64);
        assert_eq!(token_fingerprint(&token), token_fingerprint(&token));
        assert_ne!(token_fingerprint(&token), token);
    }
}
