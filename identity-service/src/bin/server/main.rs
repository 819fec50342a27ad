use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use identity_service::config::Config;
use identity_service::domain::company::service::CompanyService;
use identity_service::domain::principal::service::IdentityService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::PostgresCompanyRepository;
use identity_service::outbound::repositories::PostgresPrincipalRepository;
use identity_service::outbound::repositories::PostgresRoleEntityRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        query_timeout_seconds = config.database.query_timeout_seconds,
        token_ttl_days = config.jwt.expiration_days,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let query_timeout = Duration::from_secs(config.database.query_timeout_seconds);

    // The signing secret is read once here and threaded explicitly; there is
    // no process-wide configuration singleton.
    let authenticator = Arc::new(Authenticator::new(config.jwt.secret.as_bytes()));

    let principal_repository = Arc::new(PostgresPrincipalRepository::new(
        pg_pool.clone(),
        query_timeout,
    ));
    let role_entity_repository = Arc::new(PostgresRoleEntityRepository::new(
        pg_pool.clone(),
        query_timeout,
    ));
    let company_repository = Arc::new(PostgresCompanyRepository::new(pg_pool, query_timeout));

    let identity_service = Arc::new(IdentityService::new(
        principal_repository,
        role_entity_repository,
        Arc::clone(&authenticator),
        config.jwt.expiration_days,
    ));
    let company_service = Arc::new(CompanyService::new(
        company_repository,
        Arc::clone(&authenticator),
        config.jwt.expiration_days,
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(identity_service, company_service, authenticator);
    axum::serve(http_listener, http_application).await?;

    Ok(())
}
