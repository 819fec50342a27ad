use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::company::errors::CompanyError;
use crate::domain::company::models::Company;
use crate::domain::company::models::ModulePermissions;
use crate::domain::company::models::RegisterCompanyCommand;
use crate::domain::company::ports::CompanyServicePort;
use crate::domain::principal::models::EmailAddress;
use crate::inbound::http::router::AppState;

/// Onboard a new company account.
pub async fn register_company(
    State(state): State<AppState>,
    Json(body): Json<RegisterCompanyRequestBody>,
) -> Result<ApiSuccess<CompanyData>, ApiError> {
    let email = EmailAddress::new(body.email)
        .map_err(CompanyError::InvalidEmail)
        .map_err(ApiError::from)?;

    let module_permissions = body
        .module_permissions
        .map(|p| ModulePermissions {
            hrm: p.hrm,
            crm: p.crm,
            recruitment: p.recruitment,
        })
        .unwrap_or_default();

    let command = RegisterCompanyCommand {
        company_name: body.company_name,
        email,
        phone: body.phone,
        address: body.address,
        gst_number: body.gst_number,
        password: body.password,
        module_permissions,
    };

    let company = state
        .company_service
        .register_company(command)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(StatusCode::CREATED, (&company).into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterCompanyRequestBody {
    company_name: String,
    email: String,
    phone: String,
    address: String,
    gst_number: String,
    password: String,
    module_permissions: Option<ModulePermissionsBody>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ModulePermissionsBody {
    pub hrm: bool,
    pub crm: bool,
    pub recruitment: bool,
}

/// Serializable projection of a company account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyData {
    pub id: String,
    pub company_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub gst_number: String,
    pub module_permissions: ModulePermissionsData,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModulePermissionsData {
    pub hrm: bool,
    pub crm: bool,
    pub recruitment: bool,
}

impl From<&Company> for CompanyData {
    fn from(company: &Company) -> Self {
        Self {
            id: company.id.to_string(),
            company_name: company.company_name.clone(),
            email: company.email.as_str().to_string(),
            phone: company.phone.clone(),
            address: company.address.clone(),
            gst_number: company.gst_number.clone(),
            module_permissions: ModulePermissionsData {
                hrm: company.module_permissions.hrm,
                crm: company.module_permissions.crm,
                recruitment: company.module_permissions.recruitment,
            },
            is_active: company.is_active,
            created_at: company.created_at,
        }
    }
}
