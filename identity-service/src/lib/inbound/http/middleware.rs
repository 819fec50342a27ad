use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::principal::models::PrincipalId;
use crate::inbound::http::router::AppState;

/// Extension type carrying the authenticated principal's identity through
/// request extensions.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal {
    pub principal_id: PrincipalId,
    pub role: Option<String>,
}

/// Middleware that validates the bearer token and attaches the caller's
/// identity to the request.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    let claims: auth::Claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!("JWT validation failed: {}", e);
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid or expired token"
            })),
        )
            .into_response()
    })?;

    let principal_id_str = claims.sub.as_ref().ok_or_else(|| {
        tracing::error!("Missing 'sub' claim in token");
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid token format"
            })),
        )
            .into_response()
    })?;

    let principal_id = PrincipalId::from_string(principal_id_str).map_err(|e| {
        tracing::error!("Failed to parse principal ID from token: {}", e);
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid token format"
            })),
        )
            .into_response()
    })?;

    req.extensions_mut().insert(CurrentPrincipal {
        principal_id,
        role: claims.role.clone(),
    });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Missing Authorization header"
                })),
            )
                .into_response()
        })?;

    let auth_str = auth_header.to_str().map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid Authorization header"
            })),
        )
            .into_response()
    })?;

    if !auth_str.starts_with("Bearer ") {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid Authorization header format. Expected: Bearer <token>"
            })),
        )
            .into_response());
    }

    Ok(auth_str.trim_start_matches("Bearer "))
}
