//! MediBuddy Server
//!
//! HTTP API for accounts, health records, images and the health chatbot.

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medibuddy_server::{
    config::{AppConfig, AuthConfig, DatabaseConfig, UpstreamConfig},
    db::create_pool,
    routes::{build_router, Services},
    state::AppState,
    ResultExt,
};

/// Initialize tracing/logging.
fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,medibuddy_server=debug,tower_http=debug".into());

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let app_config = AppConfig::from_env().unwrap_or_default();
    init_tracing(app_config.log_json);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting MediBuddy server"
    );

    let db_config = DatabaseConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load database config, using defaults");
        DatabaseConfig::default()
    });

    let auth_config = AuthConfig::from_env().log("loading auth config")?;
    let secret = auth_config
        .signing_secret(app_config.debug)
        .log("resolving token signing secret")?;

    let upstream_config = UpstreamConfig::from_env().log("loading upstream config")?;

    tracing::info!(
        host = %app_config.host,
        port = app_config.port,
        debug = app_config.debug,
        retrieval_url = %upstream_config.retrieval_url,
        generation_url = %upstream_config.generation_url,
        "Configuration loaded"
    );

    // Create database connection pool
    let db_pool = create_pool(&db_config)
        .await
        .log("connecting to postgres")?;

    let services = Services::build(db_pool.clone(), &secret, &auth_config, &upstream_config)
        .log("wiring services")?;

    let state = AppState::new(db_pool, app_config.clone());
    let app = build_router(state, services);

    // Bind to address
    let addr: SocketAddr = app_config.bind_address().parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(address = %addr, "Server listening");

    // Run the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
