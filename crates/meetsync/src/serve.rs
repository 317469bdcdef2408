// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `meetsync serve` command implementation.
//!
//! Opens the SQLite key-value substrate, installs the bridge configuration
//! snapshot, and serves the webhook surface until interrupted.

use std::sync::Arc;

use meetsync_config::{ConfigStore, MeetsyncConfig};
use meetsync_core::MeetsyncError;
use meetsync_storage::SqliteKv;
use meetsync_store::EphemeralStore;
use meetsync_webhook::WebhookPipeline;
use tracing::{info, warn};

use crate::collaborators::DetachedPostApi;

/// Runs the `meetsync serve` command.
pub async fn run_serve(mut config: MeetsyncConfig) -> Result<(), MeetsyncError> {
    init_tracing();

    info!("starting meetsync serve");

    if config.bridge.set_defaults()? {
        info!("generated missing secrets for this run; persist them in the config file");
    }

    let config_store = Arc::new(ConfigStore::new());
    if let Err(errors) = config_store.on_change(config.bridge.clone()) {
        for error in &errors {
            warn!(%error, "bridge configuration invalid");
        }
        warn!("webhook surface will answer 501 until a valid configuration is installed");
    }

    let kv = Arc::new(SqliteKv::open(&config.server.database_path).await?);
    let pipeline = Arc::new(WebhookPipeline::new(
        config_store,
        EphemeralStore::new(kv.clone()),
        Arc::new(DetachedPostApi),
    ));
    let app = meetsync_webhook::router(pipeline)
        .layer(tower_http::trace::TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MeetsyncError::Internal(format!("failed to bind to {addr}: {e}")))?;

    info!("webhook server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MeetsyncError::Internal(format!("server error: {e}")))?;

    kv.database().checkpoint().await?;
    info!("meetsync serve stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("meetsync=info,warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
