use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod config;
mod crypto;
mod error;
mod middleware;
mod models;
mod rate_limiter;
mod repositories;
mod routes;
mod token;
mod validation;

use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::crypto::SsnCipher;
use crate::rate_limiter::{RateLimiter, RateLimiterConfig};
use crate::repositories::{AccountRepository, SessionRepository, UserRepository};
use crate::token::TokenService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub token_service: TokenService,
    pub ssn_cipher: SsnCipher,
    pub user_repository: UserRepository,
    pub session_repository: SessionRepository,
    pub account_repository: AccountRepository,
    pub rate_limiter: RateLimiter,
    pub session_expiry_buffer_minutes: i64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting banking service");

    // Configuration is required up front: missing secrets abort startup
    // instead of falling back to insecure defaults.
    let app_config = AppConfig::from_env()?;

    // Initialize database connection pool
    let db_config = common::database::DatabaseConfig::from_env()?;
    let pool = common::database::init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    let token_service = TokenService::new(&app_config.session_signing_secret);
    let ssn_cipher = SsnCipher::new(&app_config.ssn_encryption_key);
    let user_repository = UserRepository::new(pool.clone());
    let session_repository = SessionRepository::new(pool.clone());
    let account_repository = AccountRepository::new(pool.clone());
    let rate_limiter = RateLimiter::new(RateLimiterConfig::default());

    let app_state = AppState {
        token_service,
        ssn_cipher,
        user_repository,
        session_repository,
        account_repository,
        rate_limiter,
        session_expiry_buffer_minutes: app_config.session_expiry_buffer_minutes,
    };

    info!("Banking service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&app_config.bind_addr).await?;
    info!("Banking service listening on {}", app_config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
