use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::Json;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::change_password::change_password;
use super::handlers::get_profile::get_profile;
use super::handlers::login::login;
use super::handlers::login_company::login_company;
use super::handlers::register::register;
use super::handlers::register_company::register_company;
use super::handlers::update_profile::update_profile;
use super::middleware::authenticate as auth_middleware;
use crate::domain::company::service::CompanyService;
use crate::domain::principal::service::IdentityService;
use crate::outbound::repositories::PostgresCompanyRepository;
use crate::outbound::repositories::PostgresPrincipalRepository;
use crate::outbound::repositories::PostgresRoleEntityRepository;

#[derive(Clone)]
pub struct AppState {
    pub identity_service:
        Arc<IdentityService<PostgresPrincipalRepository, PostgresRoleEntityRepository>>,
    pub company_service: Arc<CompanyService<PostgresCompanyRepository>>,
    pub authenticator: Arc<Authenticator>,
}

pub fn create_router(
    identity_service: Arc<
        IdentityService<PostgresPrincipalRepository, PostgresRoleEntityRepository>,
    >,
    company_service: Arc<CompanyService<PostgresCompanyRepository>>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let state = AppState {
        identity_service,
        company_service,
        authenticator,
    };

    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/companies/register", post(register_company))
        .route("/api/companies/login", post(login_company));

    let protected_routes = Router::new()
        .route("/api/auth/profile", get(get_profile))
        .route("/api/auth/profile", patch(update_profile))
        .route("/api/auth/change-password", post(change_password))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "OK",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
