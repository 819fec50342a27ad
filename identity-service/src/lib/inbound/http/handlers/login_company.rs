use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::register_company::CompanyData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::company::ports::CompanyServicePort;
use crate::inbound::http::router::AppState;

/// Authenticate a company account and mint a bearer token.
pub async fn login_company(
    State(state): State<AppState>,
    Json(body): Json<LoginCompanyRequestBody>,
) -> Result<ApiSuccess<LoginCompanyResponseData>, ApiError> {
    let authenticated = state
        .company_service
        .authenticate_company(&body.email, &body.password)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginCompanyResponseData {
            company: (&authenticated.company).into(),
            token: authenticated.token,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginCompanyRequestBody {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginCompanyResponseData {
    pub company: CompanyData,
    pub token: String,
}
