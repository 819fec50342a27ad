use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::company::errors::CompanyError;
use crate::domain::company::models::Company;
use crate::domain::company::models::CompanyId;
use crate::domain::company::models::ModulePermissions;
use crate::domain::company::ports::CompanyRepository;
use crate::domain::principal::models::EmailAddress;
use crate::domain::principal::models::PasswordDigest;

/// Postgres adapter for the company collection.
pub struct PostgresCompanyRepository {
    pool: PgPool,
    query_timeout: Duration,
}

#[derive(sqlx::FromRow)]
struct CompanyRow {
    id: Uuid,
    company_name: String,
    email: String,
    phone: String,
    address: String,
    gst_number: String,
    hrm_enabled: bool,
    crm_enabled: bool,
    recruitment_enabled: bool,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<CompanyRow> for Company {
    type Error = CompanyError;

    fn try_from(row: CompanyRow) -> Result<Self, Self::Error> {
        Ok(Company {
            id: CompanyId(row.id),
            company_name: row.company_name,
            email: EmailAddress::new(row.email)?,
            phone: row.phone,
            address: row.address,
            gst_number: row.gst_number,
            module_permissions: ModulePermissions {
                hrm: row.hrm_enabled,
                crm: row.crm_enabled,
                recruitment: row.recruitment_enabled,
            },
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

fn store_unavailable(e: sqlx::Error) -> CompanyError {
    CompanyError::StoreUnavailable(e.to_string())
}

fn map_write_error(e: sqlx::Error, company: &Company) -> CompanyError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            if db_err.constraint() == Some("companies_email_key") {
                return CompanyError::EmailAlreadyExists(company.email.as_str().to_string());
            }
            if db_err.constraint() == Some("companies_gst_number_key") {
                return CompanyError::GstNumberAlreadyExists(company.gst_number.clone());
            }
        }
    }
    CompanyError::StoreUnavailable(e.to_string())
}

impl PostgresCompanyRepository {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn with_timeout<T, F, M>(&self, fut: F, map_err: M) -> Result<T, CompanyError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
        M: FnOnce(sqlx::Error) -> CompanyError,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result.map_err(map_err),
            Err(_) => Err(CompanyError::StoreUnavailable(format!(
                "query exceeded {}s deadline",
                self.query_timeout.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl CompanyRepository for PostgresCompanyRepository {
    async fn create(
        &self,
        company: Company,
        digest: PasswordDigest,
    ) -> Result<Company, CompanyError> {
        let insert = sqlx::query(
            r#"
            INSERT INTO companies (id, company_name, email, phone, address, gst_number,
                                   password_hash, hrm_enabled, crm_enabled, recruitment_enabled,
                                   is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(company.id.0)
        .bind(&company.company_name)
        .bind(company.email.as_str())
        .bind(&company.phone)
        .bind(&company.address)
        .bind(&company.gst_number)
        .bind(digest.as_str())
        .bind(company.module_permissions.hrm)
        .bind(company.module_permissions.crm)
        .bind(company.module_permissions.recruitment)
        .bind(company.is_active)
        .bind(company.created_at)
        .execute(&self.pool);

        self.with_timeout(insert, |e| map_write_error(e, &company))
            .await?;

        Ok(company)
    }

    async fn find_by_id(&self, id: &CompanyId) -> Result<Option<Company>, CompanyError> {
        let query = sqlx::query_as::<_, CompanyRow>(
            r#"
            SELECT id, company_name, email, phone, address, gst_number,
                   hrm_enabled, crm_enabled, recruitment_enabled, is_active, created_at
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool);

        let row = self.with_timeout(query, store_unavailable).await?;
        row.map(Company::try_from).transpose()
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Company>, CompanyError> {
        let query = sqlx::query_as::<_, CompanyRow>(
            r#"
            SELECT id, company_name, email, phone, address, gst_number,
                   hrm_enabled, crm_enabled, recruitment_enabled, is_active, created_at
            FROM companies
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool);

        let row = self.with_timeout(query, store_unavailable).await?;
        row.map(Company::try_from).transpose()
    }

    async fn load_password_hash(
        &self,
        id: &CompanyId,
    ) -> Result<Option<PasswordDigest>, CompanyError> {
        let query =
            sqlx::query_scalar::<_, String>("SELECT password_hash FROM companies WHERE id = $1")
                .bind(id.0)
                .fetch_optional(&self.pool);

        let digest = self.with_timeout(query, store_unavailable).await?;
        Ok(digest.map(PasswordDigest::new))
    }
}
