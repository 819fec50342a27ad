use async_trait::async_trait;

use crate::domain::company::errors::CompanyError;
use crate::domain::company::models::AuthenticatedCompany;
use crate::domain::company::models::Company;
use crate::domain::company::models::CompanyId;
use crate::domain::company::models::RegisterCompanyCommand;
use crate::domain::principal::models::EmailAddress;
use crate::domain::principal::models::PasswordDigest;

/// Port for company-account service operations.
#[async_trait]
pub trait CompanyServicePort: Send + Sync + 'static {
    /// Register a new company account.
    ///
    /// # Errors
    /// * `WeakPassword` - Password fails the strength policy
    /// * `EmailAlreadyExists` / `GstNumberAlreadyExists` - Unique
    ///   constraint violation
    /// * `StoreUnavailable` - Store call failed or timed out
    async fn register_company(
        &self,
        command: RegisterCompanyCommand,
    ) -> Result<Company, CompanyError>;

    /// Authenticate a company login attempt.
    ///
    /// Same pipeline as principal authentication, minus entity resolution:
    /// normalized lookup, explicit digest load, verify, mint.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Email not found or password mismatch
    ///   (indistinguishable by design)
    /// * `StoreUnavailable` - Store call failed or timed out
    async fn authenticate_company(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedCompany, CompanyError>;

    /// Retrieve a company by identifier.
    ///
    /// # Errors
    /// * `NotFound` - Company does not exist
    async fn get_company(&self, id: &CompanyId) -> Result<Company, CompanyError>;
}

/// Persistence operations for the company collection.
///
/// Mirrors the principal repository's digest handling: the default read
/// projection excludes the password digest, loading it is explicit.
#[async_trait]
pub trait CompanyRepository: Send + Sync + 'static {
    /// Persist a new company and its password digest.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` / `GstNumberAlreadyExists` - Unique
    ///   constraint violation
    async fn create(
        &self,
        company: Company,
        digest: PasswordDigest,
    ) -> Result<Company, CompanyError>;

    /// Retrieve a company by identifier (digest excluded).
    async fn find_by_id(&self, id: &CompanyId) -> Result<Option<Company>, CompanyError>;

    /// Retrieve a company by normalized email (digest excluded).
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Company>, CompanyError>;

    /// Explicitly load the stored password digest.
    async fn load_password_hash(
        &self,
        id: &CompanyId,
    ) -> Result<Option<PasswordDigest>, CompanyError>;
}
