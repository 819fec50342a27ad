use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::company::models::CompanyId;
use crate::domain::principal::errors::IdentityError;
use crate::domain::principal::models::EmailAddress;
use crate::domain::principal::models::PasswordDigest;
use crate::domain::principal::models::Principal;
use crate::domain::principal::models::PrincipalId;
use crate::domain::principal::models::RoleEntityId;
use crate::domain::principal::models::RoleTag;
use crate::domain::principal::models::Username;
use crate::domain::principal::ports::PrincipalRepository;

/// Postgres adapter for the principal collection.
///
/// Read queries project every column except `password_hash`; the digest
/// moves only through [`load_password_hash`] and [`update_password_hash`].
/// Every query runs under a deadline, and an elapsed deadline surfaces as
/// `StoreUnavailable`.
///
/// [`load_password_hash`]: PrincipalRepository::load_password_hash
/// [`update_password_hash`]: PrincipalRepository::update_password_hash
pub struct PostgresPrincipalRepository {
    pool: PgPool,
    query_timeout: Duration,
}

#[derive(sqlx::FromRow)]
struct PrincipalRow {
    id: Uuid,
    user_name: String,
    email: String,
    first_name: String,
    last_name: String,
    mobile: String,
    role: String,
    role_entity_ref: Uuid,
    company_id: Uuid,
    is_active: bool,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PrincipalRow> for Principal {
    type Error = IdentityError;

    fn try_from(row: PrincipalRow) -> Result<Self, Self::Error> {
        Ok(Principal {
            id: PrincipalId(row.id),
            user_name: Username::new(row.user_name)?,
            email: EmailAddress::new(row.email)?,
            first_name: row.first_name,
            last_name: row.last_name,
            mobile: row.mobile,
            role: RoleTag::new(row.role),
            role_entity_ref: RoleEntityId(row.role_entity_ref),
            company_id: CompanyId(row.company_id),
            is_active: row.is_active,
            last_login_at: row.last_login_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn store_unavailable(e: sqlx::Error) -> IdentityError {
    IdentityError::StoreUnavailable(e.to_string())
}

fn map_write_error(e: sqlx::Error, email: &EmailAddress, user_name: &Username) -> IdentityError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            if db_err.constraint() == Some("principals_email_key") {
                return IdentityError::EmailAlreadyExists(email.as_str().to_string());
            }
            if db_err.constraint() == Some("principals_user_name_key") {
                return IdentityError::UsernameAlreadyExists(user_name.as_str().to_string());
            }
        }
    }
    IdentityError::StoreUnavailable(e.to_string())
}

impl PostgresPrincipalRepository {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Run a store call under the configured deadline.
    async fn with_timeout<T, F, M>(&self, fut: F, map_err: M) -> Result<T, IdentityError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
        M: FnOnce(sqlx::Error) -> IdentityError,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result.map_err(map_err),
            Err(_) => Err(IdentityError::StoreUnavailable(format!(
                "query exceeded {}s deadline",
                self.query_timeout.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl PrincipalRepository for PostgresPrincipalRepository {
    async fn create(
        &self,
        principal: Principal,
        digest: PasswordDigest,
    ) -> Result<Principal, IdentityError> {
        let insert = sqlx::query(
            r#"
            INSERT INTO principals (id, user_name, email, first_name, last_name, mobile,
                                    password_hash, role, role_entity_ref, company_id,
                                    is_active, last_login_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(principal.id.0)
        .bind(principal.user_name.as_str())
        .bind(principal.email.as_str())
        .bind(&principal.first_name)
        .bind(&principal.last_name)
        .bind(&principal.mobile)
        .bind(digest.as_str())
        .bind(principal.role.as_str())
        .bind(principal.role_entity_ref.0)
        .bind(principal.company_id.0)
        .bind(principal.is_active)
        .bind(principal.last_login_at)
        .bind(principal.created_at)
        .bind(principal.updated_at)
        .execute(&self.pool);

        self.with_timeout(insert, |e| {
            map_write_error(e, &principal.email, &principal.user_name)
        })
        .await?;

        Ok(principal)
    }

    async fn find_by_id(&self, id: &PrincipalId) -> Result<Option<Principal>, IdentityError> {
        let query = sqlx::query_as::<_, PrincipalRow>(
            r#"
            SELECT id, user_name, email, first_name, last_name, mobile, role,
                   role_entity_ref, company_id, is_active, last_login_at, created_at, updated_at
            FROM principals
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool);

        let row = self.with_timeout(query, store_unavailable).await?;
        row.map(Principal::try_from).transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Principal>, IdentityError> {
        let query = sqlx::query_as::<_, PrincipalRow>(
            r#"
            SELECT id, user_name, email, first_name, last_name, mobile, role,
                   role_entity_ref, company_id, is_active, last_login_at, created_at, updated_at
            FROM principals
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool);

        let row = self.with_timeout(query, store_unavailable).await?;
        row.map(Principal::try_from).transpose()
    }

    async fn load_password_hash(
        &self,
        id: &PrincipalId,
    ) -> Result<Option<PasswordDigest>, IdentityError> {
        let query = sqlx::query_scalar::<_, String>(
            "SELECT password_hash FROM principals WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool);

        let digest = self.with_timeout(query, store_unavailable).await?;
        Ok(digest.map(PasswordDigest::new))
    }

    async fn update_profile(&self, principal: Principal) -> Result<Principal, IdentityError> {
        // password_hash is deliberately absent from the statement: a profile
        // save cannot clobber the stored digest.
        let update = sqlx::query(
            r#"
            UPDATE principals
            SET user_name = $2, first_name = $3, last_name = $4, mobile = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(principal.id.0)
        .bind(principal.user_name.as_str())
        .bind(&principal.first_name)
        .bind(&principal.last_name)
        .bind(&principal.mobile)
        .bind(principal.updated_at)
        .execute(&self.pool);

        let result = self
            .with_timeout(update, |e| {
                map_write_error(e, &principal.email, &principal.user_name)
            })
            .await?;

        if result.rows_affected() == 0 {
            return Err(IdentityError::NotFound(principal.id.to_string()));
        }

        Ok(principal)
    }

    async fn update_password_hash(
        &self,
        id: &PrincipalId,
        digest: &PasswordDigest,
    ) -> Result<(), IdentityError> {
        let update = sqlx::query(
            "UPDATE principals SET password_hash = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(id.0)
        .bind(digest.as_str())
        .bind(Utc::now())
        .execute(&self.pool);

        let result = self.with_timeout(update, store_unavailable).await?;

        if result.rows_affected() == 0 {
            return Err(IdentityError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn record_login(
        &self,
        id: &PrincipalId,
        at: DateTime<Utc>,
    ) -> Result<(), IdentityError> {
        let update = sqlx::query("UPDATE principals SET last_login_at = $2 WHERE id = $1")
            .bind(id.0)
            .bind(at)
            .execute(&self.pool);

        let result = self.with_timeout(update, store_unavailable).await?;

        if result.rows_affected() == 0 {
            return Err(IdentityError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
