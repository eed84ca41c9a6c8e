//! Signal handling for graceful shutdown and catalog reload.

use crate::config::ConfigLoader;
use crate::state::AppState;
use std::sync::Arc;
use tokio::sync::Notify;

/// Creates a future that completes when a shutdown signal is received.
///
/// Listens for SIGTERM and SIGINT (Ctrl+C). A handler that cannot be
/// installed is logged and never fires.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, initiating graceful shutdown");
        }
    }
}

/// Spawns a task that listens for SIGHUP and reseeds the catalog from the
/// configuration file.
///
/// Listen address, API version and token only change on restart.
/// Returns a Notify that can be used to stop the task.
#[cfg(unix)]
pub fn spawn_reload_handler(state: AppState, config_loader: Arc<ConfigLoader>) -> Arc<Notify> {
    use tokio::signal::unix::{SignalKind, signal};

    let shutdown_notify = Arc::new(Notify::new());
    let shutdown_notify_clone = shutdown_notify.clone();

    tokio::spawn(async move {
        let mut sighup = match signal(SignalKind::hangup()) {
            Ok(sighup) => sighup,
            Err(e) => {
                tracing::error!("Failed to install SIGHUP handler: {}", e);
                return;
            }
        };

        loop {
            tokio::select! {
                _ = sighup.recv() => {
                    tracing::info!("Received SIGHUP, reseeding catalog");
                    match config_loader.load() {
                        Ok(loaded) => {
                            let count = loaded.store.len();
                            *state.store.write().await = loaded.store;
                            tracing::info!(objects = count, "Catalog reseeded");
                        }
                        Err(e) => {
                            tracing::error!("Failed to reload configuration: {}", e);
                        }
                    }
                }
                _ = shutdown_notify_clone.notified() => {
                    tracing::debug!("Reload handler shutting down");
                    break;
                }
            }
        }
    });

    shutdown_notify
}

#[cfg(not(unix))]
pub fn spawn_reload_handler(_state: AppState, _config_loader: Arc<ConfigLoader>) -> Arc<Notify> {
    Arc::new(Notify::new())
}
