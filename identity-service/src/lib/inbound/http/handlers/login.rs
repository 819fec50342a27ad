use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::principal::models::Principal;
use crate::domain::principal::models::RoleEntity;
use crate::domain::principal::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

/// Authenticate a principal and mint a bearer token.
///
/// Both "email not found" and "wrong password" surface as the same 401 with
/// the same message.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let authenticated = state
        .identity_service
        .authenticate(&body.email, &body.password)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            user: (&authenticated.principal).into(),
            role_entity: authenticated.role_entity.as_ref().map(RoleEntityData::from),
            token: authenticated.token,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginResponseData {
    pub user: PrincipalData,
    pub role_entity: Option<RoleEntityData>,
    pub token: String,
}

/// Serializable projection of a principal.
///
/// Built from the domain model, which carries no password digest, so there
/// is nothing sensitive to strip here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrincipalData {
    pub id: String,
    pub user_name: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub mobile: String,
    pub role: String,
    pub company_id: String,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&Principal> for PrincipalData {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id.to_string(),
            user_name: principal.user_name.as_str().to_string(),
            email: principal.email.as_str().to_string(),
            first_name: principal.first_name.clone(),
            last_name: principal.last_name.clone(),
            mobile: principal.mobile.clone(),
            role: principal.role.as_str().to_string(),
            company_id: principal.company_id.to_string(),
            is_active: principal.is_active,
            last_login_at: principal.last_login_at,
            created_at: principal.created_at,
        }
    }
}

/// Serializable projection of a role-specific profile record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoleEntityData {
    Employee {
        id: String,
        first_name: String,
        last_name: String,
        email: String,
        emp_code: String,
        department: Option<String>,
        designation: Option<String>,
    },
    Admin {
        id: String,
        first_name: String,
        last_name: String,
        user_name: String,
        email: String,
        permissions: Vec<String>,
    },
    SuperAdmin {
        id: String,
        first_name: String,
        last_name: String,
        user_name: String,
        email: String,
    },
}

impl From<&RoleEntity> for RoleEntityData {
    fn from(entity: &RoleEntity) -> Self {
        match entity {
            RoleEntity::Employee(e) => RoleEntityData::Employee {
                id: e.id.to_string(),
                first_name: e.first_name.clone(),
                last_name: e.last_name.clone(),
                email: e.email.as_str().to_string(),
                emp_code: e.emp_code.clone(),
                department: e.department.clone(),
                designation: e.designation.clone(),
            },
            RoleEntity::Admin(a) => RoleEntityData::Admin {
                id: a.id.to_string(),
                first_name: a.first_name.clone(),
                last_name: a.last_name.clone(),
                user_name: a.user_name.clone(),
                email: a.email.as_str().to_string(),
                permissions: a.permissions.clone(),
            },
            RoleEntity::SuperAdmin(s) => RoleEntityData::SuperAdmin {
                id: s.id.to_string(),
                first_name: s.first_name.clone(),
                last_name: s.last_name.clone(),
                user_name: s.user_name.clone(),
                email: s.email.as_str().to_string(),
            },
        }
    }
}
