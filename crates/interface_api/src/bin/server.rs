//! Bill Splitting API Server Binary
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin split-api
//!
//! # Run with environment variables
//! SPLIT_PORT=9000 SPLIT_LOG_FORMAT=json cargo run --bin split-api
//! ```
//!
//! # Environment Variables
//!
//! * `SPLIT_HOST` - Server host (default: 0.0.0.0)
//! * `SPLIT_PORT` - Server port (default: 8080)
//! * `SPLIT_LOG_LEVEL` - Log level or filter directive (default: info); `RUST_LOG` wins if set
//! * `SPLIT_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! * `SPLIT_DEFAULT_CURRENCY` - Currency for requests that name none (default: USD)
//! * `SPLIT_STRATEGY` - `greedy` or `minimal_transfers` (default: greedy)
//! * `SPLIT_EPSILON` - Settled-balance tolerance (default: 0.01)

use std::net::SocketAddr;

use anyhow::Context;
use interface_api::{
    config::{ApiConfig, LogFormat},
    create_router,
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let (config, config_error) = match ApiConfig::from_env() {
        Ok(config) => (config, None),
        Err(err) => (ApiConfig::default(), Some(err)),
    };

    init_tracing(&config.log_level, config.log_format);

    if let Some(err) = config_error {
        tracing::warn!(error = %err, "Invalid environment configuration, using defaults");
    }

    config
        .settlement_config(None)
        .validate()
        .context("invalid settlement configuration")?;

    tracing::info!(
        host = %config.host,
        port = %config.port,
        currency = %config.default_currency,
        strategy = ?config.strategy,
        "Starting bill splitting API server"
    );

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    let app = create_router(config);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
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

/// Waits for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
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
