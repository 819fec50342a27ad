use serde::Serialize;

use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token
/// minting.
///
/// The identity service's login pipeline calls [`authenticate`] after it has
/// explicitly loaded the stored digest: the password is verified first, and
/// a signed token is minted only on a match.
///
/// [`authenticate`]: Authenticator::authenticate
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
}

/// Result of successful authentication.
pub struct AuthenticationResult {
    /// Signed bearer token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Signing secret, read once from configuration
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
        }
    }

    /// Hash a password for storage.
    ///
    /// Call this exactly once per new password value, at the call site that
    /// sets it. Digests are opaque; re-hashing a digest is never correct.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a candidate password against a stored digest.
    ///
    /// # Returns
    /// True if the password matches
    ///
    /// # Errors
    /// * `PasswordError` - Digest format is invalid
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify credentials and mint a bearer token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password digest
    /// * `claims` - Claims to encode into the token
    ///
    /// # Returns
    /// AuthenticationResult with the access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Password verification failed
    /// * `JwtError` - Token minting failed
    pub fn authenticate<T: Serialize>(
        &self,
        password: &str,
        stored_hash: &str,
        claims: &T,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.jwt_handler.encode(claims)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Mint a token without password verification.
    ///
    /// For flows where the caller has already established identity by other
    /// means (e.g. token refresh).
    ///
    /// # Errors
    /// * `JwtError` - Token minting failed
    pub fn generate_token<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        self.jwt_handler.encode(claims)
    }

    /// Validate and decode a bearer token.
    ///
    /// # Errors
    /// * `JwtError` - Token validation or decoding failed
    pub fn validate_token<T: for<'de> serde::Deserialize<'de>>(
        &self,
        token: &str,
    ) -> Result<T, JwtError> {
        self.jwt_handler.decode(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::Claims;

    #[test]
    fn test_authenticate_success() {
        let authenticator = Authenticator::new(b"test_secret_key_at_least_32_bytes!");

        let password = "Secret1!";
        let digest = authenticator
            .hash_password(password)
            .expect("Failed to hash password");

        let claims = Claims::for_principal(
            "principal-1",
            "a@x.com".to_string(),
            "employee".to_string(),
            7,
        );
        let result = authenticator
            .authenticate(password, &digest, &claims)
            .expect("Authentication failed");

        assert!(!result.access_token.is_empty());

        let decoded: Claims = authenticator
            .validate_token(&result.access_token)
            .expect("Token validation failed");
        assert_eq!(decoded.sub, Some("principal-1".to_string()));
        assert_eq!(decoded.role, Some("employee".to_string()));
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = Authenticator::new(b"test_secret_key_at_least_32_bytes!");

        let digest = authenticator
            .hash_password("Secret1!")
            .expect("Failed to hash password");

        let claims = Claims::new().with_subject("principal-1");

        let result = authenticator.authenticate("wrong_password", &digest, &claims);
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_password() {
        let authenticator = Authenticator::new(b"test_secret_key_at_least_32_bytes!");

        let digest = authenticator
            .hash_password("Secret1!")
            .expect("Failed to hash password");

        assert!(authenticator.verify_password("Secret1!", &digest).unwrap());
        assert!(!authenticator.verify_password("Secret2!", &digest).unwrap());
    }

    #[test]
    fn test_generate_and_validate_token() {
        let authenticator = Authenticator::new(b"test_secret_key_at_least_32_bytes!");

        let claims = Claims::new()
            .with_subject("company-1")
            .with_issuer("identity-service".to_string());

        let token = authenticator
            .generate_token(&claims)
            .expect("Failed to generate token");

        let decoded: Claims = authenticator
            .validate_token(&token)
            .expect("Failed to validate token");

        assert_eq!(decoded.sub, Some("company-1".to_string()));
        assert_eq!(decoded.iss, Some("identity-service".to_string()));
    }

    #[test]
    fn test_validate_invalid_token() {
        let authenticator = Authenticator::new(b"test_secret_key_at_least_32_bytes!");

        let result = authenticator.validate_token::<Claims>("invalid.token.here");
        assert!(result.is_err());
    }
}
