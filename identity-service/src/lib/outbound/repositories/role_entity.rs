use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::principal::errors::IdentityError;
use crate::domain::principal::models::Admin;
use crate::domain::principal::models::EmailAddress;
use crate::domain::principal::models::Employee;
use crate::domain::principal::models::RoleEntityId;
use crate::domain::principal::models::SuperAdmin;
use crate::domain::principal::ports::RoleEntityRepository;

/// Postgres adapter for the role-specific collections.
///
/// One table per role; a missing row is an ordinary `None` because the
/// referencing side only holds a weak reference.
pub struct PostgresRoleEntityRepository {
    pool: PgPool,
    query_timeout: Duration,
}

#[derive(sqlx::FromRow)]
struct EmployeeRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    emp_code: String,
    department: Option<String>,
    designation: Option<String>,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = IdentityError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        Ok(Employee {
            id: RoleEntityId(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: EmailAddress::new(row.email)?,
            emp_code: row.emp_code,
            department: row.department,
            designation: row.designation,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AdminRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    user_name: String,
    email: String,
    permissions: Vec<String>,
}

impl TryFrom<AdminRow> for Admin {
    type Error = IdentityError;

    fn try_from(row: AdminRow) -> Result<Self, Self::Error> {
        Ok(Admin {
            id: RoleEntityId(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            user_name: row.user_name,
            email: EmailAddress::new(row.email)?,
            permissions: row.permissions,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SuperAdminRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    user_name: String,
    email: String,
}

impl TryFrom<SuperAdminRow> for SuperAdmin {
    type Error = IdentityError;

    fn try_from(row: SuperAdminRow) -> Result<Self, Self::Error> {
        Ok(SuperAdmin {
            id: RoleEntityId(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            user_name: row.user_name,
            email: EmailAddress::new(row.email)?,
        })
    }
}

impl PostgresRoleEntityRepository {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn with_timeout<T, F>(&self, fut: F) -> Result<T, IdentityError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result.map_err(|e| IdentityError::StoreUnavailable(e.to_string())),
            Err(_) => Err(IdentityError::StoreUnavailable(format!(
                "query exceeded {}s deadline",
                self.query_timeout.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl RoleEntityRepository for PostgresRoleEntityRepository {
    async fn find_employee(&self, id: &RoleEntityId) -> Result<Option<Employee>, IdentityError> {
        let query = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, first_name, last_name, email, emp_code, department, designation
            FROM employees
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool);

        let row = self.with_timeout(query).await?;
        row.map(Employee::try_from).transpose()
    }

    async fn find_admin(&self, id: &RoleEntityId) -> Result<Option<Admin>, IdentityError> {
        let query = sqlx::query_as::<_, AdminRow>(
            r#"
            SELECT id, first_name, last_name, user_name, email, permissions
            FROM admins
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool);

        let row = self.with_timeout(query).await?;
        row.map(Admin::try_from).transpose()
    }

    async fn find_super_admin(
        &self,
        id: &RoleEntityId,
    ) -> Result<Option<SuperAdmin>, IdentityError> {
        let query = sqlx::query_as::<_, SuperAdminRow>(
            r#"
            SELECT id, first_name, last_name, user_name, email
            FROM super_admins
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool);

        let row = self.with_timeout(query).await?;
        row.map(SuperAdmin::try_from).transpose()
    }
}
