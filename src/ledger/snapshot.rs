//! Snapshot persistence of the ledger store.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

use crate::ledger::store::LedgerStore;

/// Current on-disk format version.
pub const SNAPSHOT_VERSION: u32 = 1;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Errors raised while reading or writing snapshots.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported snapshot version {0}")]
    UnsupportedVersion(u32),

    /// The snapshot was taken under a different signing domain.
    #[error("Snapshot belongs to chain {chain_id} contract {contract}")]
    DomainMismatch { chain_id: u64, contract: Address },
}

/// Serialized ledger state, tagged with the domain it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub chain_id: u64,
    pub verifying_contract: Address,
    pub store: LedgerStore,
}

impl Snapshot {
    pub fn new(chain_id: u64, verifying_contract: Address, store: LedgerStore) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            chain_id,
            verifying_contract,
            store,
        }
    }
}

/// Write `snapshot` to `path`, replacing any previous file atomically.
///
/// Every call writes its own temp file, so concurrent saves to the same
/// path never share one; the last rename wins.
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), SnapshotError> {
    let tmp = temp_path(path);
    if let Err(e) = write_and_rename(&tmp, path, snapshot) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    tracing::info!(
        path = %path.display(),
        blacklisted = snapshot.store.blacklist.blacklisted_count(),
        "Saved ledger snapshot"
    );
    Ok(())
}

/// Load a snapshot from `path`. Returns `None` when the file does not exist.
pub fn load_snapshot(path: &Path) -> Result<Option<Snapshot>, SnapshotError> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)?;
    let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(snapshot.version));
    }

    tracing::info!(
        path = %path.display(),
        holders = snapshot.store.balances.holders(),
        "Loaded ledger snapshot"
    );
    Ok(Some(snapshot))
}

fn write_and_rename(tmp: &Path, path: &Path, snapshot: &Snapshot) -> Result<(), SnapshotError> {
    {
        let file = File::create(tmp)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, snapshot)?;
        writer.flush()?;
    }
    fs::rename(tmp, path)?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}.{}.tmp", std::process::id(), seq));
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_persistence() {
        let path = scratch_path("devon-rex-snapshot");
        let holder = Address::repeat_byte(1);

        let mut store = LedgerStore::with_initial_mint(holder, U256::from(1_000)).unwrap();
        store
            .balances
            .transfer(holder, Address::repeat_byte(2), U256::from(250))
            .unwrap();
        store
            .registry
            .set_backup(&store.blacklist, holder, Address::repeat_byte(3))
            .unwrap();
        store.blacklist.mark_blacklisted(Address::repeat_byte(4));

        let snapshot = Snapshot::new(31337, Address::repeat_byte(0xc0), store);
        save_snapshot(&path, &snapshot).unwrap();

        let loaded = load_snapshot(&path).unwrap().unwrap();
        assert_eq!(loaded, snapshot);
        assert_eq!(loaded.store.balances.balance_of(&holder), U256::from(750));

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_temp_paths_are_unique() {
        let path = Path::new("/var/lib/devon-rex/ledger.json");
        let a = temp_path(path);
        let b = temp_path(path);

        assert_ne!(a, b);
        assert_eq!(a.parent(), path.parent());
    }

    #[test]
    fn test_concurrent_saves_to_same_path() {
        let path = scratch_path("devon-rex-concurrent");
        let holder = Address::repeat_byte(1);

        let writers: Vec<_> = (1u64..=4)
            .map(|supply| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let store =
                        LedgerStore::with_initial_mint(holder, U256::from(supply)).unwrap();
                    let snapshot = Snapshot::new(31337, Address::repeat_byte(0xc0), store);
                    for _ in 0..25 {
                        save_snapshot(&path, &snapshot).unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let loaded = load_snapshot(&path).unwrap().unwrap();
        let balance = loaded.store.balances.balance_of(&holder);
        assert!(balance >= U256::from(1) && balance <= U256::from(4));

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_missing_file_is_none() {
        let path = scratch_path("devon-rex-missing");
        assert!(load_snapshot(&path).unwrap().is_none());
    }

    #[test]
    fn test_unsupported_version() {
        let path = scratch_path("devon-rex-version");
        let mut snapshot = Snapshot::new(1, Address::ZERO, LedgerStore::new());
        snapshot.version = 99;
        std::fs::write(&path, serde_json::to_vec(&snapshot).unwrap()).unwrap();

        let err = load_snapshot(&path).unwrap_err();
        assert!(matches!(err, SnapshotError::UnsupportedVersion(99)));

        std::fs::remove_file(&path).unwrap_or_default();
    }
}
