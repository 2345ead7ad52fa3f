//! Ledger change notifications.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// A committed state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Tokens moved between accounts.
    Transfer { from: Address, to: Address, value: U256 },
    /// An allowance was set.
    Approval {
        owner: Address,
        spender: Address,
        value: U256,
    },
    /// An account registered or replaced its backup address.
    BackupChanged {
        account: Address,
        previous: Option<Address>,
        backup: Address,
    },
    /// A recovery swept `from` into `to` and blacklisted `from`.
    EmergencyTransfer {
        from: Address,
        to: Address,
        amount: U256,
    },
}

impl LedgerEvent {
    /// Short name for the event, as logged on commit.
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerEvent::Transfer { .. } => "transfer",
            LedgerEvent::Approval { .. } => "approval",
            LedgerEvent::BackupChanged { .. } => "backup_changed",
            LedgerEvent::EmergencyTransfer { .. } => "emergency_transfer",
        }
    }
}
