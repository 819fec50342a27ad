use thiserror::Error;

use crate::domain::principal::errors::EmailError;
use crate::domain::principal::errors::IdParseError;
use crate::domain::principal::errors::PasswordPolicyError;

/// Top-level error for all company-account operations
#[derive(Debug, Clone, Error)]
pub enum CompanyError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid identifier: {0}")]
    InvalidId(#[from] IdParseError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Weak password: {0}")]
    WeakPassword(#[from] PasswordPolicyError),

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] auth::JwtError),

    // Domain-level errors
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("Company not found: {0}")]
    NotFound(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("GST number already exists: {0}")]
    GstNumberAlreadyExists(String),

    // Infrastructure errors
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for CompanyError {
    fn from(err: anyhow::Error) -> Self {
        CompanyError::Unknown(err.to_string())
    }
}

impl From<auth::AuthenticationError> for CompanyError {
    fn from(err: auth::AuthenticationError) -> Self {
        match err {
            auth::AuthenticationError::InvalidCredentials => CompanyError::InvalidCredentials,
            auth::AuthenticationError::PasswordError(e) => CompanyError::Password(e),
            auth::AuthenticationError::JwtError(e) => CompanyError::Token(e),
        }
    }
}
