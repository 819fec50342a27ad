use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::company::errors::CompanyError;
use crate::domain::principal::errors::IdentityError;

pub mod change_password;
pub mod get_profile;
pub mod login;
pub mod login_company;
pub mod register;
pub mod register_company;
pub mod update_profile;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    ServiceUnavailable(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            IdentityError::NotFound(_) => ApiError::NotFound(err.to_string()),
            IdentityError::EmailAlreadyExists(_) | IdentityError::UsernameAlreadyExists(_) => {
                ApiError::Conflict(err.to_string())
            }
            IdentityError::InvalidId(_)
            | IdentityError::InvalidUsername(_)
            | IdentityError::InvalidEmail(_)
            | IdentityError::WeakPassword(_) => ApiError::UnprocessableEntity(err.to_string()),
            // Transient store failures are retryable by the caller.
            IdentityError::StoreUnavailable(_) => ApiError::ServiceUnavailable(err.to_string()),
            // An unknown role tag is data corruption; it surfaces as a server
            // error, never as a silently degraded response.
            IdentityError::UnknownRole(_)
            | IdentityError::Password(_)
            | IdentityError::Token(_)
            | IdentityError::Unknown(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<CompanyError> for ApiError {
    fn from(err: CompanyError) -> Self {
        match err {
            CompanyError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            CompanyError::NotFound(_) => ApiError::NotFound(err.to_string()),
            CompanyError::EmailAlreadyExists(_) | CompanyError::GstNumberAlreadyExists(_) => {
                ApiError::Conflict(err.to_string())
            }
            CompanyError::InvalidId(_)
            | CompanyError::InvalidEmail(_)
            | CompanyError::WeakPassword(_) => ApiError::UnprocessableEntity(err.to_string()),
            CompanyError::StoreUnavailable(_) => ApiError::ServiceUnavailable(err.to_string()),
            CompanyError::Password(_) | CompanyError::Token(_) | CompanyError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}
