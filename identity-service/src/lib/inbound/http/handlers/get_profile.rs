use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::login::PrincipalData;
use super::login::RoleEntityData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::principal::ports::IdentityServicePort;
use crate::inbound::http::middleware::CurrentPrincipal;
use crate::inbound::http::router::AppState;

/// Fetch the authenticated principal's profile, enriched with its
/// role-specific record when one resolves.
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentPrincipal>,
) -> Result<ApiSuccess<ProfileResponseData>, ApiError> {
    let profile = state
        .identity_service
        .get_profile(&current.principal_id)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ProfileResponseData {
            user: (&profile.principal).into(),
            role_entity: profile.role_entity.as_ref().map(RoleEntityData::from),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileResponseData {
    pub user: PrincipalData,
    pub role_entity: Option<RoleEntityData>,
}
