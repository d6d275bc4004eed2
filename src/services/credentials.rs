//! Password hashing and verification.
//!
//! Hashes are Argon2id in PHC string form, so the random salt and the derived
//! key travel together in one stored value. Verification is constant-time and
//! fails closed: a stored value that does not parse verifies as `false`
//! rather than erroring.
//!
//! Both functions are CPU-heavy and synchronous; async call sites must wrap
//! them in `tokio::task::spawn_blocking`.

use anyhow::Result;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_round_trip() {
        let hash = hash_password("admin123").unwrap();
        assert!(verify_password("admin123", &hash));
        assert!(!verify_password("admin124", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn test_fresh_salt_per_hash() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("same-password", &a));
        assert!(verify_password("same-password", &b));
    }

    #[test]
    fn test_malformed_hash_fails_closed() {
        assert!(!verify_password("admin123", ""));
        assert!(!verify_password("admin123", "not-a-phc-string"));
        assert!(!verify_password("admin123", "$argon2id$v=19$garbage"));
    }
}
