pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod router;
pub mod service;
pub mod validation;

use harmony_db::{AppState, DatabaseConfig};
use harmony_migration::Migrator;
use sea_orm::{DbErr, TransactionTrait};
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use std::sync::Arc;

pub use router::{build_router, RouterOptions};

use config::{AdminBootstrap, ConfigError, ServerConfig};
use error::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("database: {0}")]
    Database(#[from] DbErr),

    #[error("superuser bootstrap failed: {0}")]
    Bootstrap(#[from] ApiError),

    #[error("server i/o: {0}")]
    Io(#[from] std::io::Error),
}

/// Create the configured superuser when no account holds that email.
pub async fn bootstrap_superuser(
    state: &AppState,
    admin: &AdminBootstrap,
) -> Result<(), ApiError> {
    let txn = state.db.begin().await?;
    let created =
        service::identity::create_superuser(&txn, &admin.email, &admin.password).await?;
    txn.commit().await?;
    if created.is_none() {
        tracing::debug!("superuser {} already present", admin.email);
    }
    Ok(())
}

/// Connect, migrate, bootstrap and serve until shutdown.
pub async fn run() -> Result<(), StartupError> {
    let config = ServerConfig::from_env()?;

    let db_config = DatabaseConfig::from_env();
    tracing::info!("connecting to database...");
    let db = harmony_db::connect(&db_config).await?;

    tracing::info!("running database migrations...");
    Migrator::up(&db, None).await?;
    tracing::info!("migrations complete");

    let state = Arc::new(AppState {
        db,
        jwt_secret: config.jwt_secret.clone(),
        token_ttl_hours: config.token_ttl_hours,
    });

    if let Some(admin) = &config.admin {
        bootstrap_superuser(&state, admin).await?;
    }

    let app = build_router(state, &RouterOptions::from(&config));

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!(addr = %config.bind, "server started");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
