/// Auth Service - Main entry point
/// Exposes the authentication endpoint group over REST
use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use auth_service::{
    clock::{Clock, SystemClock},
    config::Config,
    db::PgUserStore,
    routes,
    security::rate_limit::RateLimitConfig,
    AppState, AuthService, RateLimiter, RevocationRegistry, TokenCodec,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    tracing::info!(
        "Starting auth service on {}:{}",
        config.server_host,
        config.server_port
    );

    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Database connection pool initialized");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let codec = TokenCodec::new(
        &config.jwt_secret,
        &config.jwt_algorithm,
        Duration::minutes(config.access_token_ttl_minutes),
        Duration::minutes(config.refresh_token_ttl_minutes),
        clock.clone(),
    )?;

    let revoked = RevocationRegistry::new(
        Duration::seconds(config.revocation_sweep_interval_seconds),
        clock.clone(),
    );

    let auth = Arc::new(AuthService::new(
        Arc::new(PgUserStore::new(db_pool)),
        codec,
        revoked,
    ));

    let limiter = Arc::new(RateLimiter::new(
        RateLimitConfig {
            max_requests: config.rate_limit_max_requests,
            window_seconds: config.rate_limit_window_seconds,
        },
        clock,
    ));

    let router = routes::build_router(AppState { auth, limiter });

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("REST API listening on {}", addr);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
