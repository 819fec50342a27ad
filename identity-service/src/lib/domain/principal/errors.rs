use thiserror::Error;

/// Error for identifier parsing failures (principal, role-entity, company ids)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdParseError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for password strength validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,

    #[error("Password must contain at least one number")]
    MissingNumber,

    #[error("Password must contain at least one symbol")]
    MissingSymbol,
}

/// Top-level error for all principal-related operations
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid identifier: {0}")]
    InvalidId(#[from] IdParseError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Weak password: {0}")]
    WeakPassword(#[from] PasswordPolicyError),

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] auth::JwtError),

    // Domain-level errors
    //
    // Unknown email and wrong password share this single variant: callers
    // must not be able to tell which one occurred.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("Principal carries unknown role tag: {0}")]
    UnknownRole(String),

    #[error("Principal not found: {0}")]
    NotFound(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Username already exists: {0}")]
    UsernameAlreadyExists(String),

    // Infrastructure errors
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for IdentityError {
    fn from(err: anyhow::Error) -> Self {
        IdentityError::Unknown(err.to_string())
    }
}

impl From<auth::AuthenticationError> for IdentityError {
    fn from(err: auth::AuthenticationError) -> Self {
        match err {
            auth::AuthenticationError::InvalidCredentials => IdentityError::InvalidCredentials,
            auth::AuthenticationError::PasswordError(e) => IdentityError::Password(e),
            auth::AuthenticationError::JwtError(e) => IdentityError::Token(e),
        }
    }
}
