use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// JWT issuer/verifier, HS256.
///
/// The token is opaque to every other component; only this handler
/// understands its internal structure. The signing secret is supplied once
/// at construction, from configuration. Rotating the secret invalidates all
/// outstanding tokens.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler with a signing secret.
    ///
    /// # Arguments
    /// * `secret` - Signing secret; at least 256 bits (32 bytes) for HS256
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Encode claims into a signed token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a token.
    ///
    /// # Errors
    /// * `TokenExpired` - Token has expired (if an exp claim is present)
    /// * `DecodingFailed` - Signature is invalid or the token is malformed
    pub fn decode<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        // Allow tokens without 'exp' claim for flexibility
        validation.required_spec_claims.clear();

        let token_data = decode::<T>(token, &self.decoding_key, &validation).map_err(|e| {
            if e.to_string().contains("ExpiredSignature") {
                JwtError::TokenExpired
            } else {
                JwtError::DecodingFailed(e.to_string())
            }
        })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::Claims;

    #[test]
    fn test_encode_and_decode() {
        let handler = JwtHandler::new(b"my_secret_key_at_least_32_bytes_long!");

        let claims = Claims::for_principal(
            "principal-1",
            "a@x.com".to_string(),
            "employee".to_string(),
            7,
        );

        let token = handler.encode(&claims).expect("Failed to encode token");
        assert!(!token.is_empty());

        let decoded: Claims = handler.decode(&token).expect("Failed to decode token");
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_decode_invalid_token() {
        let handler = JwtHandler::new(b"my_secret_key_at_least_32_bytes_long!");

        let result = handler.decode::<Claims>("invalid.token.here");
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let handler1 = JwtHandler::new(b"secret1_at_least_32_bytes_long_key!");
        let handler2 = JwtHandler::new(b"secret2_at_least_32_bytes_long_key!");

        let claims = Claims::new().with_subject("principal-1");

        let token = handler1.encode(&claims).expect("Failed to encode token");

        let result = handler2.decode::<Claims>(&token);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_expired_token() {
        let handler = JwtHandler::new(b"my_secret_key_at_least_32_bytes_long!");

        let claims = Claims::new()
            .with_subject("principal-1")
            .with_expiration(chrono::Utc::now().timestamp() - 3600);

        let token = handler.encode(&claims).expect("Failed to encode token");

        let result = handler.decode::<Claims>(&token);
        assert!(matches!(result, Err(JwtError::TokenExpired)));
    }
}
