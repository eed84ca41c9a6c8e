//! Preservation Catalog stub server
//!
//! Runs the in-memory catalog over HTTP for local development.

use clap::Parser;
use prescat_stub::config::ConfigLoader;
use prescat_stub::shutdown::spawn_reload_handler;
use prescat_stub::{AppState, build_router, run_server};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Preservation Catalog stub - in-memory catalog API for tests and development
#[derive(Parser, Debug)]
#[command(name = "prescat-stub")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file with server settings and seeded objects
    #[arg(short, long, env = "PRESCAT_STUB_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen address (e.g., 0.0.0.0:3003)
    #[arg(short, long)]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting prescat-stub v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = Arc::new(ConfigLoader::new(args.config.as_ref(), args.listen));
    let loaded = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    match &args.config {
        Some(path) => tracing::info!("Configuration loaded from {:?}", path),
        None => tracing::info!("No configuration file given, starting with an empty catalog"),
    }
    tracing::info!(
        objects = loaded.store.len(),
        api_version = %loaded.api_version,
        auth = loaded.token.is_some(),
        "Catalog ready"
    );

    let listen_addr = loaded.listen;
    let state = AppState::new(loaded.store, loaded.token);

    // Spawn reload handler (listens for SIGHUP)
    let shutdown_notify = spawn_reload_handler(state.clone(), config_loader);

    // Build the router
    let router = build_router(state, &loaded.api_version);

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Signal the reload handler to stop
    shutdown_notify.notify_one();
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,prescat_stub=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
