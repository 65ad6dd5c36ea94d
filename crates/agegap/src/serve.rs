// SPDX-FileCopyrightText: 2026 Agegap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `agegap serve` command implementation.
//!
//! Loads the dataset, opens SQLite storage when enabled, and runs the HTTP
//! gateway until SIGINT or SIGTERM.

use std::path::Path;
use std::sync::Arc;

use agegap_config::model::AgegapConfig;
use agegap_core::{AgegapError, StorageAdapter};
use agegap_game::PersonDataset;
use agegap_gateway::{AppState, start_server};
use agegap_storage::SqliteStorage;
use tracing::{info, warn};

/// Runs the `agegap serve` command.
pub async fn run_serve(config: AgegapConfig) -> Result<(), AgegapError> {
    init_tracing(&config.server.log_level);

    info!("starting agegap serve");
    if config.game.uses_dev_secret() {
        warn!("game.secret is not set, signing with the development secret");
    }

    let dataset = PersonDataset::load(config.game.dataset_path.as_deref().map(Path::new))?;
    info!(people = dataset.len(), "dataset loaded");

    let storage: Option<Arc<dyn StorageAdapter>> = if config.storage.enabled {
        let storage = SqliteStorage::new(config.storage.clone());
        storage.initialize().await?;
        info!(path = %config.storage.database_path, "storage initialized");
        let storage: Arc<dyn StorageAdapter> = Arc::new(storage);
        Some(storage)
    } else {
        warn!("storage disabled, streaks and rate limits will not persist");
        None
    };

    let state = AppState::from_config(&config, Arc::new(dataset), storage.clone())?;
    let served = start_server(&config.server, state, shutdown_signal()).await;

    if let Some(storage) = storage {
        if let Err(e) = storage.close().await {
            warn!(error = %e, "storage close failed");
        }
    }

    served?;
    info!("agegap serve shutdown complete");
    Ok(())
}

/// Resolves on SIGINT or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
                    _ = sigterm.recv() => info!("received SIGTERM, initiating shutdown"),
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                ctrl_c.await;
                info!("received SIGINT (Ctrl+C), initiating shutdown");
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await;
        info!("received Ctrl+C, initiating shutdown");
    }
}

/// Initializes the tracing subscriber. `RUST_LOG` takes precedence.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("agegap={log_level},tower_http=info,warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
