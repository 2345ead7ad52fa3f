//! DevonRex token node.
//!
//! Serves a fixed-supply token ledger whose holders can name a backup
//! address. The backup can later sign an EIP-712 authorization that any
//! relayer submits to sweep the account into a rescue address; the swept
//! account is blacklisted for good.
//!
//! ```text
//!     Client / relayer
//!     ──────────────▶  http (axum)  ──▶  token::Token  ──▶  ledger + recovery
//!                          │                  │
//!                          ▼                  ▼
//!                   admin routes        events / logs / metrics
//!                                             │
//!                                   lifecycle (snapshots, shutdown)
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use devon_rex::config::{load_config, NodeConfig};
use devon_rex::http::HttpServer;
use devon_rex::lifecycle::{
    bootstrap_token, persist_snapshot, spawn_snapshot_task, wait_for_signal, Shutdown,
};
use devon_rex::observability::{logging, metrics};
use devon_rex::token::SystemClock;

#[derive(Parser)]
#[command(name = "devon-rex")]
#[command(about = "DevonRex token ledger with backup-address recovery", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => NodeConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "devon-rex starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        chain_id = config.domain.chain_id,
        contract = %config.domain.verifying_contract,
        snapshot = ?config.persistence.snapshot_path,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let token = Arc::new(bootstrap_token(&config, Arc::new(SystemClock))?);
    let config = Arc::new(config);
    let shutdown = Shutdown::new();

    let snapshot_path = config.persistence.snapshot_path.as_ref().map(PathBuf::from);
    let snapshot_task = snapshot_path.clone().map(|path| {
        spawn_snapshot_task(
            token.clone(),
            path,
            Duration::from_secs(config.persistence.snapshot_interval_secs),
            shutdown.subscribe(),
        )
    });

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(token.clone(), config.clone());
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    wait_for_signal().await;
    shutdown.trigger();

    match server_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "HTTP server failed"),
        Err(e) => tracing::error!(error = %e, "HTTP server task panicked"),
    }
    if let Some(task) = snapshot_task {
        let _ = task.await;
    }

    if let Some(path) = snapshot_path {
        persist_snapshot(token, path).await?;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
