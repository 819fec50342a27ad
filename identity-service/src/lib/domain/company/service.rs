use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Claims;
use chrono::Utc;

use crate::domain::company::errors::CompanyError;
use crate::domain::company::models::AuthenticatedCompany;
use crate::domain::company::models::Company;
use crate::domain::company::models::CompanyId;
use crate::domain::company::models::RegisterCompanyCommand;
use crate::domain::company::ports::CompanyRepository;
use crate::domain::company::ports::CompanyServicePort;
use crate::domain::principal::models::EmailAddress;
use crate::domain::principal::models::PasswordDigest;
use crate::domain::principal::models::validate_password_strength;

/// Domain service for company onboarding and authentication.
pub struct CompanyService<CR>
where
    CR: CompanyRepository,
{
    companies: Arc<CR>,
    authenticator: Arc<Authenticator>,
    token_ttl_days: i64,
}

impl<CR> CompanyService<CR>
where
    CR: CompanyRepository,
{
    /// Create a new company service with injected dependencies.
    pub fn new(companies: Arc<CR>, authenticator: Arc<Authenticator>, token_ttl_days: i64) -> Self {
        Self {
            companies,
            authenticator,
            token_ttl_days,
        }
    }
}

#[async_trait]
impl<CR> CompanyServicePort for CompanyService<CR>
where
    CR: CompanyRepository,
{
    async fn register_company(
        &self,
        command: RegisterCompanyCommand,
    ) -> Result<Company, CompanyError> {
        validate_password_strength(&command.password)?;

        // Hash exactly once, where the password value is set.
        let digest = PasswordDigest::new(self.authenticator.hash_password(&command.password)?);

        let company = Company {
            id: CompanyId::new(),
            company_name: command.company_name,
            email: command.email,
            phone: command.phone,
            address: command.address,
            gst_number: command.gst_number,
            module_permissions: command.module_permissions,
            is_active: true,
            created_at: Utc::now(),
        };

        self.companies.create(company, digest).await
    }

    async fn authenticate_company(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedCompany, CompanyError> {
        let email =
            EmailAddress::new(email.to_string()).map_err(|_| CompanyError::InvalidCredentials)?;

        let company = self
            .companies
            .find_by_email(&email)
            .await?
            .ok_or(CompanyError::InvalidCredentials)?;

        let digest = self
            .companies
            .load_password_hash(&company.id)
            .await?
            .ok_or(CompanyError::InvalidCredentials)?;

        let claims = Claims::for_company(
            company.id,
            company.email.as_str().to_string(),
            self.token_ttl_days,
        );
        let token = self
            .authenticator
            .authenticate(password, digest.as_str(), &claims)
            .map_err(CompanyError::from)?
            .access_token;

        Ok(AuthenticatedCompany { company, token })
    }

    async fn get_company(&self, id: &CompanyId) -> Result<Company, CompanyError> {
        self.companies
            .find_by_id(id)
            .await?
            .ok_or(CompanyError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::company::models::ModulePermissions;

    mock! {
        pub TestCompanyRepository {}

        #[async_trait]
        impl CompanyRepository for TestCompanyRepository {
            async fn create(&self, company: Company, digest: PasswordDigest) -> Result<Company, CompanyError>;
            async fn find_by_id(&self, id: &CompanyId) -> Result<Option<Company>, CompanyError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Company>, CompanyError>;
            async fn load_password_hash(&self, id: &CompanyId) -> Result<Option<PasswordDigest>, CompanyError>;
        }
    }

    fn test_authenticator() -> Arc<Authenticator> {
        Arc::new(Authenticator::new(b"test_secret_key_at_least_32_bytes!"))
    }

    fn stored_company() -> Company {
        Company {
            id: CompanyId::new(),
            company_name: "Acme Industries".to_string(),
            email: EmailAddress::new("hr@acme.com".to_string()).unwrap(),
            phone: "5550001234".to_string(),
            address: "12 Industrial Estate".to_string(),
            gst_number: "22AAAAA0000A1Z5".to_string(),
            module_permissions: ModulePermissions::default(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_company_hashes_password() {
        let mut companies = MockTestCompanyRepository::new();
        companies
            .expect_create()
            .withf(|company, digest| {
                company.company_name == "Acme Industries"
                    && digest.as_str().starts_with("$argon2")
            })
            .times(1)
            .returning(|company, _| Ok(company));

        let service = CompanyService::new(Arc::new(companies), test_authenticator(), 7);

        let command = RegisterCompanyCommand {
            company_name: "Acme Industries".to_string(),
            email: EmailAddress::new("hr@acme.com".to_string()).unwrap(),
            phone: "5550001234".to_string(),
            address: "12 Industrial Estate".to_string(),
            gst_number: "22AAAAA0000A1Z5".to_string(),
            password: "Secret1!".to_string(),
            module_permissions: ModulePermissions::default(),
        };

        let company = service.register_company(command).await.unwrap();
        assert!(company.is_active);
    }

    #[tokio::test]
    async fn test_register_company_duplicate_gst() {
        let mut companies = MockTestCompanyRepository::new();
        companies.expect_create().times(1).returning(|company, _| {
            Err(CompanyError::GstNumberAlreadyExists(company.gst_number))
        });

        let service = CompanyService::new(Arc::new(companies), test_authenticator(), 7);

        let command = RegisterCompanyCommand {
            company_name: "Acme Industries".to_string(),
            email: EmailAddress::new("hr@acme.com".to_string()).unwrap(),
            phone: "5550001234".to_string(),
            address: "12 Industrial Estate".to_string(),
            gst_number: "22AAAAA0000A1Z5".to_string(),
            password: "Secret1!".to_string(),
            module_permissions: ModulePermissions::default(),
        };

        let result = service.register_company(command).await;
        assert!(matches!(
            result,
            Err(CompanyError::GstNumberAlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_authenticate_company_success() {
        let company = stored_company();
        let company_id = company.id;
        let digest = test_authenticator().hash_password("Secret1!").unwrap();

        let mut companies = MockTestCompanyRepository::new();
        let returned = company.clone();
        companies
            .expect_find_by_email()
            .withf(|email| email.as_str() == "hr@acme.com")
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));
        companies
            .expect_load_password_hash()
            .withf(move |id| *id == company_id)
            .times(1)
            .returning(move |_| Ok(Some(PasswordDigest::new(digest.clone()))));

        let service = CompanyService::new(Arc::new(companies), test_authenticator(), 7);

        let result = service
            .authenticate_company("HR@Acme.com", "Secret1!")
            .await
            .unwrap();
        assert_eq!(result.company.id, company_id);
        assert!(!result.token.is_empty());
    }

    #[tokio::test]
    async fn test_authenticate_company_wrong_password() {
        let company = stored_company();
        let digest = test_authenticator().hash_password("Secret1!").unwrap();

        let mut companies = MockTestCompanyRepository::new();
        let returned = company.clone();
        companies
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));
        companies
            .expect_load_password_hash()
            .times(1)
            .returning(move |_| Ok(Some(PasswordDigest::new(digest.clone()))));

        let service = CompanyService::new(Arc::new(companies), test_authenticator(), 7);

        let result = service.authenticate_company("hr@acme.com", "wrong").await;
        assert!(matches!(result, Err(CompanyError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_authenticate_company_unknown_email() {
        let mut companies = MockTestCompanyRepository::new();
        companies
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = CompanyService::new(Arc::new(companies), test_authenticator(), 7);

        let result = service
            .authenticate_company("nobody@acme.com", "Secret1!")
            .await;
        assert!(matches!(result, Err(CompanyError::InvalidCredentials)));
    }
}
