use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::login::PrincipalData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::company::models::CompanyId;
use crate::domain::principal::errors::IdentityError;
use crate::domain::principal::models::EmailAddress;
use crate::domain::principal::models::RegisterPrincipalCommand;
use crate::domain::principal::models::Role;
use crate::domain::principal::models::RoleEntityId;
use crate::domain::principal::models::RoleTag;
use crate::domain::principal::models::Username;
use crate::domain::principal::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

/// Register a new principal.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequestBody>,
) -> Result<ApiSuccess<PrincipalData>, ApiError> {
    let user_name = Username::new(body.user_name)
        .map_err(IdentityError::InvalidUsername)
        .map_err(ApiError::from)?;
    let email = EmailAddress::new(body.email)
        .map_err(IdentityError::InvalidEmail)
        .map_err(ApiError::from)?;

    // Registration only accepts tags from the closed role set.
    let role_tag = RoleTag::new(body.role);
    let role = Role::from_tag(&role_tag)
        .ok_or_else(|| ApiError::UnprocessableEntity(format!("Unknown role: {}", role_tag)))?;

    let role_entity_ref = RoleEntityId::from_string(&body.role_entity_ref)
        .map_err(IdentityError::InvalidId)
        .map_err(ApiError::from)?;
    let company_id = CompanyId::from_string(&body.company_id)
        .map_err(IdentityError::InvalidId)
        .map_err(ApiError::from)?;

    let command = RegisterPrincipalCommand {
        user_name,
        email,
        password: body.password,
        first_name: body.first_name,
        last_name: body.last_name,
        mobile: body.mobile,
        role,
        role_entity_ref,
        company_id,
    };

    let principal = state
        .identity_service
        .register(command)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(StatusCode::CREATED, (&principal).into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequestBody {
    user_name: String,
    email: String,
    password: String,
    first_name: String,
    last_name: String,
    mobile: String,
    role: String,
    role_entity_ref: String,
    company_id: String,
}
