// HiringHelper API server
// Decision: All configuration comes from the environment (.env loaded first)
// Decision: STORAGE_BACKEND=memory runs without MongoDB for local development

use anyhow::{Context, Result};
use hiringhelper_control_plane::{
    auth::{AuthConfig, AuthState},
    build_app,
    config::{ServerConfig, StorageKind},
    shutdown::shutdown_signal,
    storage::StorageBackend,
};
use hiringhelper_core::telemetry::{init_telemetry, TelemetryConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let dotenv = dotenvy::dotenv();

    // Initialize telemetry
    // Configure via environment variables:
    // - SERVICE_NAME: Service name (default: "hiringhelper-control-plane")
    // - RUST_LOG / LOG_LEVEL: Log filter (default: "hiringhelper_control_plane=debug,tower_http=debug")
    // - LOG_FORMAT=json: structured output
    let mut telemetry_config = TelemetryConfig::from_env();
    if telemetry_config.service_name == "hiringhelper" {
        telemetry_config.service_name = "hiringhelper-control-plane".to_string();
    }
    if telemetry_config.log_filter.is_none() {
        telemetry_config.log_filter =
            Some("hiringhelper_control_plane=debug,tower_http=debug".to_string());
    }
    telemetry_config.service_version = Some(env!("CARGO_PKG_VERSION").to_string());
    init_telemetry(telemetry_config);

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    tracing::info!("hiringhelper-control-plane starting...");

    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    let auth_config =
        AuthConfig::from_env(config.environment).context("Invalid authentication configuration")?;
    tracing::info!(
        environment = ?config.environment,
        secure_cookie = auth_config.cookie.secure,
        token_lifetime_secs = auth_config.jwt.token_lifetime.as_secs(),
        "Authentication configured"
    );

    // Initialize storage
    let db = match config.storage.kind {
        StorageKind::MongoDb => StorageBackend::mongodb(
            &config.storage.mongodb_uri,
            &config.storage.mongodb_database,
        )
        .await
        .context("Failed to connect to MongoDB")?,
        StorageKind::Memory => {
            tracing::warn!("Using in-memory storage; accounts are lost on restart");
            StorageBackend::in_memory()
        }
    };
    let user_count = db.count_users().await.context("Failed to count users")?;
    tracing::info!(backend = db.kind(), users = user_count, "Storage ready");

    // Owned handle for closing connections after the server stops
    let shutdown_db = db.clone();
    let db = Arc::new(db);

    if !config.api_prefix.is_empty() {
        tracing::info!(prefix = %config.api_prefix, "API prefix configured");
    }
    if config.cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?config.cors_origins, "CORS origins configured");
    }
    match &config.ui_dist_dir {
        Some(dir) => tracing::info!(dir = %dir.display(), "Serving front-end bundle"),
        None => tracing::info!("UI_DIST_DIR not set, page requests return 404"),
    }

    let auth_state = AuthState::new(auth_config, db);
    let app = build_app(&config, auth_state);

    // Start HTTP server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to address {}", config.bind_addr))?;
    tracing::info!("HTTP server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    shutdown_db.shutdown().await;
    tracing::info!("Server stopped");

    Ok(())
}
