//! Crafting API server.
//!
//! Run from repo root: `cargo run -p crafting-server`
//! `STORAGE=memory` runs without a database.

use crafting_api::config::load_dotenv;
use crafting_api::{app, connect, ensure_database_exists, ensure_schema, AppConfig, AppState, HttpOptions, StorageBackend};
use std::net::SocketAddr;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = load_dotenv()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("crafting_api=info,crafting_server=info,tower_http=info")
            }),
        )
        .init();

    match dotenv {
        Some(path) => tracing::info!(path = %path.display(), "loaded .env"),
        None => tracing::debug!(".env not found, using environment and defaults"),
    }
    let config = AppConfig::from_env()?;

    let state = match config.storage {
        StorageBackend::Postgres => {
            ensure_database_exists(&config.database_url).await?;
            let pool = connect(&config).await?;
            ensure_schema(&pool).await?;
            tracing::info!(max_connections = config.db_max_connections, "database ready");
            AppState::postgres(pool, config.list_limits)
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage, data is lost on exit");
            AppState::in_memory(config.list_limits)
        }
    };

    let router = app(state, &HttpOptions::from(&config));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("crafting API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
