use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::ledger::snapshot::save_snapshot;

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemStatus {
    pub version: String,
    pub status: String,
    pub symbol: String,
    pub chain_id: u64,
    pub total_supply: String,
    pub holders: usize,
    pub backups: usize,
    pub blacklisted: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotStatus {
    pub path: String,
    pub holders: usize,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let stats = state.token.stats();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "operational".to_string(),
        symbol: state.token.metadata().symbol.clone(),
        chain_id: state.token.verifier().chain_id(),
        total_supply: stats.total_supply.to_string(),
        holders: stats.holders,
        backups: stats.backups,
        blacklisted: stats.blacklisted,
    })
}

/// Write a snapshot to the configured path now.
pub async fn post_snapshot(State(state): State<AppState>) -> Result<Json<SnapshotStatus>, ApiError> {
    let path = state
        .config
        .persistence
        .snapshot_path
        .clone()
        .ok_or(ApiError::Unavailable("snapshot persistence is not configured"))?;

    let snapshot = state.token.snapshot();
    let holders = snapshot.store.balances.holders();
    let target = PathBuf::from(&path);

    tokio::task::spawn_blocking(move || save_snapshot(&target, &snapshot))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    tracing::info!(path = %path, holders, "Snapshot written on admin request");
    Ok(Json(SnapshotStatus { path, holders }))
}
