//! Password hashing with Argon2id. Stateless; each hash carries its
//! own random salt, so hashing the same plaintext twice yields
//! different digests.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::error::ServiceError;

pub fn hash(plaintext: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ServiceError::Internal(format!("password hashing failed: {e}")))
}

/// Constant-time verification via the argon2 verifier. A malformed
/// digest verifies false rather than erroring.
pub fn verify(plaintext: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_correct_password() {
        let digest = hash("hunter2hunter2").unwrap();
        assert!(verify("hunter2hunter2", &digest));
        assert!(!verify("hunter3hunter3", &digest));
    }

    #[test]
    fn hashing_is_salted() {
        let a = hash("same-password").unwrap();
        let b = hash("same-password").unwrap();
        assert_ne!(a, b);
        assert!(verify("same-password", &a));
        assert!(verify("same-password", &b));
    }

    #[test]
    fn malformed_digest_verifies_false() {
        assert!(!verify("whatever", "not-a-phc-string"));
    }
}
