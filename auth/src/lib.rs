//! Authentication infrastructure for the HR identity platform
//!
//! Provides the credential primitives the identity service builds on:
//! - Password hashing (Argon2id)
//! - JWT issuing and validation for principals and companies
//! - Authentication coordination (verify a password, then mint a token)
//!
//! The identity service defines its own domain ports and adapts these
//! implementations, which keeps this crate free of storage and HTTP concerns.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let digest = hasher.hash("Secret1!").unwrap();
//! let is_valid = hasher.verify("Secret1!", &digest).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{JwtHandler, Claims};
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let claims = Claims::new().with_subject("principal-1").with_role("employee".to_string());
//! let token = handler.encode(&claims).unwrap();
//! let decoded: Claims = handler.decode(&token).unwrap();
//! assert_eq!(decoded.role, Some("employee".to_string()));
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Claims};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Registration: hash the password once, at the call site that sets it.
//! let digest = auth.hash_password("Secret1!").unwrap();
//!
//! // Login: verify the password, then mint a token.
//! let claims = Claims::for_principal("principal-1", "a@x.com".to_string(), "employee".to_string(), 7);
//! let result = auth.authenticate("Secret1!", &digest, &claims).unwrap();
//!
//! // Later: validate the bearer token.
//! let decoded: Claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(decoded.sub, Some("principal-1".to_string()));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
