use async_trait::async_trait;

use chrono::DateTime;
use chrono::Utc;

use crate::domain::principal::errors::IdentityError;
use crate::domain::principal::models::Admin;
use crate::domain::principal::models::AuthenticatedPrincipal;
use crate::domain::principal::models::ChangePasswordCommand;
use crate::domain::principal::models::EmailAddress;
use crate::domain::principal::models::Employee;
use crate::domain::principal::models::PasswordDigest;
use crate::domain::principal::models::Principal;
use crate::domain::principal::models::PrincipalId;
use crate::domain::principal::models::PrincipalProfile;
use crate::domain::principal::models::RegisterPrincipalCommand;
use crate::domain::principal::models::RoleEntityId;
use crate::domain::principal::models::SuperAdmin;
use crate::domain::principal::models::UpdateProfileCommand;

/// Port for identity domain service operations.
#[async_trait]
pub trait IdentityServicePort: Send + Sync + 'static {
    /// Authenticate a login attempt.
    ///
    /// The single entry point other layers call: lookup by normalized
    /// email, explicit digest load, password verification, token minting,
    /// best-effort entity resolution, best-effort last-login update.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Email not found or password mismatch
    ///   (indistinguishable by design)
    /// * `UnknownRole` - Principal carries a role tag outside the closed set
    /// * `StoreUnavailable` - Store call failed or timed out
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedPrincipal, IdentityError>;

    /// Register a new principal.
    ///
    /// # Errors
    /// * `WeakPassword` - Password fails the strength policy
    /// * `EmailAlreadyExists` / `UsernameAlreadyExists` - Unique constraint
    ///   violation
    /// * `StoreUnavailable` - Store call failed or timed out
    async fn register(
        &self,
        command: RegisterPrincipalCommand,
    ) -> Result<Principal, IdentityError>;

    /// Fetch a principal together with its best-effort role entity.
    ///
    /// # Errors
    /// * `NotFound` - Principal does not exist
    /// * `UnknownRole` - Principal carries a role tag outside the closed set
    /// * `StoreUnavailable` - Store call failed or timed out
    async fn get_profile(&self, id: &PrincipalId) -> Result<PrincipalProfile, IdentityError>;

    /// Update a principal's profile fields.
    ///
    /// Never touches the password digest.
    ///
    /// # Errors
    /// * `NotFound` - Principal does not exist
    /// * `UsernameAlreadyExists` - New username is already taken
    /// * `StoreUnavailable` - Store call failed or timed out
    async fn update_profile(
        &self,
        id: &PrincipalId,
        command: UpdateProfileCommand,
    ) -> Result<Principal, IdentityError>;

    /// Change a principal's password after verifying the current one.
    ///
    /// # Errors
    /// * `NotFound` - Principal does not exist
    /// * `InvalidCredentials` - Current password does not match
    /// * `WeakPassword` - New password fails the strength policy
    /// * `StoreUnavailable` - Store call failed or timed out
    async fn change_password(
        &self,
        id: &PrincipalId,
        command: ChangePasswordCommand,
    ) -> Result<(), IdentityError>;
}

/// Persistence operations for the principal collection.
///
/// The default read projection excludes the password digest; reading it is
/// an explicit capability ([`load_password_hash`]), and writing it is a
/// dedicated operation ([`update_password_hash`]) so that a plain profile
/// save can never re-hash or clobber an existing digest.
///
/// [`load_password_hash`]: PrincipalRepository::load_password_hash
/// [`update_password_hash`]: PrincipalRepository::update_password_hash
#[async_trait]
pub trait PrincipalRepository: Send + Sync + 'static {
    /// Persist a new principal and its password digest.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` / `UsernameAlreadyExists` - Unique constraint
    ///   violation
    /// * `StoreUnavailable` - Store call failed or timed out
    async fn create(
        &self,
        principal: Principal,
        digest: PasswordDigest,
    ) -> Result<Principal, IdentityError>;

    /// Retrieve a principal by identifier (digest excluded).
    async fn find_by_id(&self, id: &PrincipalId) -> Result<Option<Principal>, IdentityError>;

    /// Retrieve a principal by normalized email (digest excluded).
    async fn find_by_email(&self, email: &EmailAddress)
        -> Result<Option<Principal>, IdentityError>;

    /// Explicitly load the stored password digest.
    async fn load_password_hash(
        &self,
        id: &PrincipalId,
    ) -> Result<Option<PasswordDigest>, IdentityError>;

    /// Persist profile fields. Must not write the password digest.
    ///
    /// # Errors
    /// * `NotFound` - Principal does not exist
    /// * `UsernameAlreadyExists` - New username is already taken
    async fn update_profile(&self, principal: Principal) -> Result<Principal, IdentityError>;

    /// Replace the stored password digest. The only write path for it.
    async fn update_password_hash(
        &self,
        id: &PrincipalId,
        digest: &PasswordDigest,
    ) -> Result<(), IdentityError>;

    /// Record a successful login.
    async fn record_login(
        &self,
        id: &PrincipalId,
        at: DateTime<Utc>,
    ) -> Result<(), IdentityError>;
}

/// Lookups into the role-specific collections.
///
/// Each role owns an independent collection; a missing record is an
/// ordinary `None`, not an error, because the referencing side holds only a
/// weak reference.
#[async_trait]
pub trait RoleEntityRepository: Send + Sync + 'static {
    async fn find_employee(&self, id: &RoleEntityId) -> Result<Option<Employee>, IdentityError>;

    async fn find_admin(&self, id: &RoleEntityId) -> Result<Option<Admin>, IdentityError>;

    async fn find_super_admin(
        &self,
        id: &RoleEntityId,
    ) -> Result<Option<SuperAdmin>, IdentityError>;
}
