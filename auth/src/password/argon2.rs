use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// One-way salted password hashing (internally Argon2id).
///
/// Each call to [`hash`](PasswordHasher::hash) draws a fresh random salt, so
/// hashing the same plaintext twice yields two different digests that both
/// verify against the original password.
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher with secure defaults.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password for storage.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format digest (algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a candidate password against a stored digest.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored digest in PHC string format
    ///
    /// # Returns
    /// True if the password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Digest format is invalid
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        let argon2 = Argon2::default();

        Ok(argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "Secret1!";

        let digest = hasher.hash(password).expect("Failed to hash password");

        assert!(hasher
            .verify(password, &digest)
            .expect("Failed to verify password"));

        assert!(!hasher
            .verify("wrong_password", &digest)
            .expect("Failed to verify password"));
    }

    #[test]
    fn test_same_plaintext_yields_different_digests() {
        let hasher = PasswordHasher::new();
        let password = "Employee@123";

        let first = hasher.hash(password).expect("Failed to hash password");
        let second = hasher.hash(password).expect("Failed to hash password");

        // Fresh salt per call, but both digests verify.
        assert_ne!(first, second);
        assert!(hasher.verify(password, &first).unwrap());
        assert!(hasher.verify(password, &second).unwrap());
    }

    #[test]
    fn test_verify_invalid_digest() {
        let hasher = PasswordHasher::new();
        let result = hasher.verify("password", "not_a_phc_string");
        assert!(result.is_err());
    }
}
