use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::login::PrincipalData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::principal::errors::IdentityError;
use crate::domain::principal::models::UpdateProfileCommand;
use crate::domain::principal::models::Username;
use crate::domain::principal::ports::IdentityServicePort;
use crate::inbound::http::middleware::CurrentPrincipal;
use crate::inbound::http::router::AppState;

/// Update the authenticated principal's profile fields.
///
/// Partial update: only provided fields change. The password digest is not
/// reachable from this path.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentPrincipal>,
    Json(body): Json<UpdateProfileRequestBody>,
) -> Result<ApiSuccess<PrincipalData>, ApiError> {
    let user_name = body
        .user_name
        .map(Username::new)
        .transpose()
        .map_err(IdentityError::InvalidUsername)
        .map_err(ApiError::from)?;

    let command = UpdateProfileCommand {
        user_name,
        first_name: body.first_name,
        last_name: body.last_name,
        mobile: body.mobile,
    };

    let principal = state
        .identity_service
        .update_profile(&current.principal_id, command)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(StatusCode::OK, (&principal).into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateProfileRequestBody {
    user_name: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    mobile: Option<String>,
}
