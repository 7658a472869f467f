//! Endure Sync Server
//!
//! Serves the plan document to the display, the browser and the CLI, and
//! wakes long-polling viewers when it changes.
//!
//! # Configuration
//!
//! Environment variables:
//! - `ENDURE_PORT`: Port to listen on (default: 5000)
//! - `ENDURE_BIND`: Address to bind (default: 0.0.0.0)
//! - `ENDURE_DOCUMENT`: Plan file (default: ~/.local/share/endure/reminders.txt)
//! - `ENDURE_POLL_TIMEOUT`: Long-poll timeout in seconds (default: 30)
//! - `ENDURE_SERVER_CONFIG`: Path to config file (default: ~/.config/endure/server.yaml)
//!
//! # Config File Format
//!
//! ```yaml
//! port: 5000
//! document_path: /var/lib/endure/reminders.txt
//! poll_timeout_secs: 30
//! ```
//!
//! # Endpoints
//!
//! - `GET /health`: Health check endpoint
//! - `GET /api/reminders`: Current document and hash
//! - `POST /api/reminders`: Conditional write (409 on stale hash)
//! - `GET /api/poll?hash=`: Long-poll for changes
//! - `GET /api/plan`: Parsed plan

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use endure::config::ServerConfig;
use endure::server::{router, ContentStore, SyncService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "endure-server")]
#[command(version)]
#[command(about = "Sync server for the shared daily plan", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "endure=info,endure_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = ServerConfig::load(cli.config)?;

    if let Some(path) = &config.config_file {
        tracing::info!("Config file: {}", path.display());
    }
    tracing::info!(
        "Document: {} ({})",
        config.document_path.value.display(),
        config.document_path.source
    );
    tracing::info!("Poll timeout: {}s", config.poll_timeout_secs.value);

    let store = ContentStore::new(config.document_path.value.clone());
    let service = Arc::new(SyncService::with_poll_timeout(
        store,
        config.poll_timeout(),
    ));

    let app = router(service);

    // Start server
    let ip = config.bind.value.parse()?;
    let addr = SocketAddr::new(ip, config.port.value);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
