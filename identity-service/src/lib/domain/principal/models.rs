use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::company::models::CompanyId;
use crate::domain::principal::errors::EmailError;
use crate::domain::principal::errors::IdParseError;
use crate::domain::principal::errors::PasswordPolicyError;
use crate::domain::principal::errors::UsernameError;

/// Principal aggregate entity.
///
/// A generic user record that can authenticate. Note the deliberate absence
/// of a password field: the digest lives behind the repository's explicit
/// [`load_password_hash`](crate::domain::principal::ports::PrincipalRepository::load_password_hash)
/// capability and is never part of the default read projection, so it can
/// never leak into a serialized response.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: PrincipalId,
    pub user_name: Username,
    pub email: EmailAddress,
    pub first_name: String,
    pub last_name: String,
    pub mobile: String,
    /// Raw role tag as stored. Only the entity resolver interprets it;
    /// everything else carries it opaquely.
    pub role: RoleTag,
    /// Weak reference into the collection owned by `role`. Lookup key only:
    /// no ownership, no cascading delete, dangling is tolerated.
    pub role_entity_ref: RoleEntityId,
    pub company_id: CompanyId,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Principal unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrincipalId(pub Uuid);

impl PrincipalId {
    /// Generate a new random principal ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a principal ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, IdParseError> {
        Uuid::parse_str(s)
            .map(PrincipalId)
            .map_err(|e| IdParseError::InvalidFormat(e.to_string()))
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a role-specific entity record (weak reference target)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoleEntityId(pub Uuid);

impl RoleEntityId {
    /// Generate a new random role-entity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a role-entity ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, IdParseError> {
        Uuid::parse_str(s)
            .map(RoleEntityId)
            .map_err(|e| IdParseError::InvalidFormat(e.to_string()))
    }
}

impl fmt::Display for RoleEntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures the username is 3-30 characters of alphanumeric, underscore, or
/// hyphen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 30;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 30 characters
    /// * `InvalidCharacters` - Contains non-alphanumeric characters (except _ and -)
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = username.trim().to_string();
        let length = username.len();
        if length < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        if !username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            return Err(UsernameError::InvalidCharacters);
        }
        Ok(Self(username))
    }

    /// Get username as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address value type.
///
/// Construction normalizes (trim, lower-case) before validating, so every
/// `EmailAddress` in the system is already in canonical form and lookups are
/// case-insensitive by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated, normalized email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let email = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque password digest as produced by the hasher.
///
/// Deliberately not serializable, and its Debug output is redacted. The only
/// producers are the hasher (new passwords) and the store (persisted
/// digests); the only consumer is password verification.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    pub fn new(digest: String) -> Self {
        Self(digest)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}

/// Raw role tag as persisted on a principal record.
///
/// Carried opaquely so that a corrupt tag survives loading and is rejected
/// loudly at resolution time, after credential verification, rather than
/// breaking the read path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTag(String);

impl RoleTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Role> for RoleTag {
    fn from(role: Role) -> Self {
        RoleTag::new(role.as_str())
    }
}

/// Closed set of roles a principal can carry.
///
/// The entity resolver dispatches exhaustively over this set; a tag outside
/// it is data corruption and is rejected explicitly, never defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Employee,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Interpret a stored role tag.
    ///
    /// # Returns
    /// None if the tag is outside the closed set
    pub fn from_tag(tag: &RoleTag) -> Option<Role> {
        match tag.as_str() {
            "employee" => Some(Role::Employee),
            "admin" => Some(Role::Admin),
            "super_admin" => Some(Role::SuperAdmin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role-specific profile record for an employee.
#[derive(Debug, Clone)]
pub struct Employee {
    pub id: RoleEntityId,
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
    pub emp_code: String,
    pub department: Option<String>,
    pub designation: Option<String>,
}

/// Role-specific profile record for an admin.
#[derive(Debug, Clone)]
pub struct Admin {
    pub id: RoleEntityId,
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub email: EmailAddress,
    pub permissions: Vec<String>,
}

/// Role-specific profile record for a super admin.
#[derive(Debug, Clone)]
pub struct SuperAdmin {
    pub id: RoleEntityId,
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub email: EmailAddress,
}

/// Closed tagged union over the role-specific profile records.
///
/// Each variant is an independent record from its own collection; which
/// variant a principal resolves to is decided by its role tag alone.
#[derive(Debug, Clone)]
pub enum RoleEntity {
    Employee(Employee),
    Admin(Admin),
    SuperAdmin(SuperAdmin),
}

impl RoleEntity {
    /// Identifier of the underlying record.
    pub fn id(&self) -> RoleEntityId {
        match self {
            RoleEntity::Employee(e) => e.id,
            RoleEntity::Admin(a) => a.id,
            RoleEntity::SuperAdmin(s) => s.id,
        }
    }

    /// Role this record belongs to.
    pub fn role(&self) -> Role {
        match self {
            RoleEntity::Employee(_) => Role::Employee,
            RoleEntity::Admin(_) => Role::Admin,
            RoleEntity::SuperAdmin(_) => Role::SuperAdmin,
        }
    }
}

/// Validate password strength for new passwords.
///
/// At least 8 characters with one uppercase letter, one number, and one
/// symbol.
///
/// # Errors
/// * `TooShort` / `MissingUppercase` / `MissingNumber` / `MissingSymbol`
pub fn validate_password_strength(password: &str) -> Result<(), PasswordPolicyError> {
    const MIN_LENGTH: usize = 8;

    let length = password.chars().count();
    if length < MIN_LENGTH {
        return Err(PasswordPolicyError::TooShort {
            min: MIN_LENGTH,
            actual: length,
        });
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PasswordPolicyError::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordPolicyError::MissingNumber);
    }
    if !password.chars().any(|c| c.is_ascii_punctuation()) {
        return Err(PasswordPolicyError::MissingSymbol);
    }
    Ok(())
}

/// Command to register a new principal with domain types.
///
/// Takes a [`Role`], not a raw tag: the closed set is enforced at creation,
/// so unknown tags can only ever enter the system through external writes to
/// the store.
#[derive(Debug)]
pub struct RegisterPrincipalCommand {
    pub user_name: Username,
    pub email: EmailAddress,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub mobile: String,
    pub role: Role,
    pub role_entity_ref: RoleEntityId,
    pub company_id: CompanyId,
}

/// Command to update a principal's profile with optional validated fields.
///
/// There is deliberately no password field here: profile edits can never
/// touch the stored digest, which moves only through the dedicated
/// change-password path.
#[derive(Debug)]
pub struct UpdateProfileCommand {
    pub user_name: Option<Username>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub mobile: Option<String>,
}

/// Command to change a principal's password.
#[derive(Debug)]
pub struct ChangePasswordCommand {
    pub current_password: String,
    pub new_password: String,
}

/// Result of a successful authentication: the principal, the best-effort
/// role-specific profile, and a freshly minted bearer token.
#[derive(Debug)]
pub struct AuthenticatedPrincipal {
    pub principal: Principal,
    pub role_entity: Option<RoleEntity>,
    pub token: String,
}

/// A principal together with its best-effort role-specific profile.
#[derive(Debug)]
pub struct PrincipalProfile {
    pub principal: Principal,
    pub role_entity: Option<RoleEntity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_normalized_on_construction() {
        let email = EmailAddress::new("  A@X.Com ".to_string()).unwrap();
        assert_eq!(email.as_str(), "a@x.com");
    }

    #[test]
    fn test_email_rejects_invalid_format() {
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
    }

    #[test]
    fn test_username_bounds() {
        assert!(matches!(
            Username::new("ab".to_string()),
            Err(UsernameError::TooShort { .. })
        ));
        assert!(matches!(
            Username::new("a".repeat(31)),
            Err(UsernameError::TooLong { .. })
        ));
        assert!(matches!(
            Username::new("bad name!".to_string()),
            Err(UsernameError::InvalidCharacters)
        ));
        assert!(Username::new("jdoe_01".to_string()).is_ok());
    }

    #[test]
    fn test_role_tag_round_trip() {
        for role in [Role::Employee, Role::Admin, Role::SuperAdmin] {
            let tag = RoleTag::from(role);
            assert_eq!(Role::from_tag(&tag), Some(role));
        }
    }

    #[test]
    fn test_role_rejects_unknown_tag() {
        assert_eq!(Role::from_tag(&RoleTag::new("ghost")), None);
    }

    #[test]
    fn test_password_strength() {
        assert!(validate_password_strength("Secret1!").is_ok());
        assert!(matches!(
            validate_password_strength("Sh0rt!"),
            Err(PasswordPolicyError::TooShort { .. })
        ));
        assert!(matches!(
            validate_password_strength("secret1!password"),
            Err(PasswordPolicyError::MissingUppercase)
        ));
        assert!(matches!(
            validate_password_strength("SecretPassword!"),
            Err(PasswordPolicyError::MissingNumber)
        ));
        assert!(matches!(
            validate_password_strength("Secret1Password"),
            Err(PasswordPolicyError::MissingSymbol)
        ));
    }

    #[test]
    fn test_password_digest_debug_is_redacted() {
        let digest = PasswordDigest::new("$argon2id$v=19$secret".to_string());
        assert_eq!(format!("{:?}", digest), "PasswordDigest(<redacted>)");
    }
}
