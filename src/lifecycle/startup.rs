//! Startup orchestration.
//!
//! # Responsibilities
//! - Deploy the token from configuration, or restore it from a snapshot
//! - Run the periodic snapshot task
//! - Write the final snapshot on the way out
//!
//! # Design Decisions
//! - Fail fast: a corrupt or foreign snapshot is fatal, never silently
//!   replaced by a fresh mint
//! - Snapshots are written off the async runtime

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::config::NodeConfig;
use crate::ledger::snapshot::{load_snapshot, save_snapshot, SnapshotError};
use crate::token::{Clock, DeployError, Token};

/// Errors that abort node startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Token deployment failed: {0}")]
    Deploy(#[from] DeployError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Build the token: restore the configured snapshot if it exists,
/// otherwise deploy with the initial mint.
pub fn bootstrap_token(config: &NodeConfig, clock: Arc<dyn Clock>) -> Result<Token, StartupError> {
    if let Some(path) = &config.persistence.snapshot_path {
        if let Some(snapshot) = load_snapshot(Path::new(path))? {
            let token = Token::restore(config, snapshot, clock)?;
            tracing::info!(path = %path, "Token restored from snapshot");
            return Ok(token);
        }
        tracing::info!(path = %path, "No snapshot found, deploying fresh ledger");
    }

    Ok(Token::from_config(config, clock)?)
}

/// Save a snapshot of `token` to `path` on the blocking pool.
pub async fn persist_snapshot(token: Arc<Token>, path: PathBuf) -> Result<(), SnapshotError> {
    let snapshot = token.snapshot();
    match tokio::task::spawn_blocking(move || save_snapshot(&path, &snapshot)).await {
        Ok(result) => result,
        Err(e) => Err(SnapshotError::Io(std::io::Error::other(e))),
    }
}

/// Save a snapshot every `interval` until `shutdown` fires.
pub fn spawn_snapshot_task(
    token: Arc<Token>,
    path: PathBuf,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // First tick fires immediately; the ledger was just loaded.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = persist_snapshot(token.clone(), path.clone()).await {
                        tracing::error!(error = %e, path = %path.display(), "Periodic snapshot failed");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::debug!("Snapshot task stopping");
                    break;
                }
            }
        }
    })
}
