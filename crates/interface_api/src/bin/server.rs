//! Lifecycle API Server Binary
//!
//! Starts the HTTP API for the policy and claims lifecycle engine.
//!
//! # Usage
//!
//! ```bash
//! API_JWT_SECRET=... API_DATABASE__URL=postgres://... cargo run --bin lifecycle-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_JWT_SECRET` - JWT signing secret (required)
//! * `API_JWT_EXPIRATION_SECS` - JWT token expiration in seconds (default: 3600)
//! * `API_LOG_LEVEL` - trace, debug, info, warn, error (default: info); `RUST_LOG` wins
//! * `API_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! * `API_DATABASE__URL`, `API_DATABASE__MAX_CONNECTIONS`, `API_DATABASE__RUN_MIGRATIONS`, ...
//! * `API_LIFECYCLE__RENEWAL_WINDOW_DAYS`, `API_LIFECYCLE__TIMEZONE`, ...

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use app_lifecycle::LifecycleService;
use infra_db::{create_pool, PostgresLifecycleStore};
use interface_api::config::{ApiConfig, LogFormat};
use interface_api::create_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("invalid API configuration")?;
    init_tracing(&config.log_level, config.log_format);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        timezone = config.lifecycle.timezone.0.name(),
        "Starting lifecycle API server"
    );

    // Applies migrations too unless `database.run_migrations` is off
    let pool = create_pool(&config.database)
        .await
        .context("failed to prepare the database")?;

    let store = Arc::new(PostgresLifecycleStore::new(pool));
    let service = LifecycleService::new(store, config.lifecycle.clone())?;
    let app = create_router(Arc::new(service), config.clone());

    let addr: SocketAddr = config.server_addr().parse()?;
    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging
fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
    }
}

/// Waits for Ctrl+C or SIGTERM so in-flight requests can finish
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
