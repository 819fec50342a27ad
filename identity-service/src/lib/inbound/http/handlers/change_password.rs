use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::principal::models::ChangePasswordCommand;
use crate::domain::principal::ports::IdentityServicePort;
use crate::inbound::http::middleware::CurrentPrincipal;
use crate::inbound::http::router::AppState;

/// Change the authenticated principal's password.
pub async fn change_password(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentPrincipal>,
    Json(body): Json<ChangePasswordRequestBody>,
) -> Result<ApiSuccess<ChangePasswordResponseData>, ApiError> {
    if body.new_password != body.confirm_new_password {
        return Err(ApiError::BadRequest(
            "New passwords do not match".to_string(),
        ));
    }

    let command = ChangePasswordCommand {
        current_password: body.current_password,
        new_password: body.new_password,
    };

    state
        .identity_service
        .change_password(&current.principal_id, command)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ChangePasswordResponseData {
            message: "Password changed successfully".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangePasswordRequestBody {
    current_password: String,
    new_password: String,
    confirm_new_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangePasswordResponseData {
    pub message: String,
}
