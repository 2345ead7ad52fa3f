//! Token ledger subsystem.
//!
//! # Data Flow
//! ```text
//! Token entry point (holds the store lock)
//!     → store.rs (LedgerStore: balances + registry + blacklist)
//!     → balances.rs (validate, then write balances/allowances)
//!     → events.rs (LedgerEvent published after commit)
//!
//! Startup / shutdown:
//!     snapshot.rs (JSON load at boot, save periodically and on exit)
//! ```
//!
//! # Design Decisions
//! - All state lives in one explicit store, never in globals
//! - Every write is preceded by all of its checks, so failures leave no trace
//! - Supply is fixed at deployment; there is no mint after construction

pub mod balances;
pub mod events;
pub mod snapshot;
pub mod store;

pub use balances::Balances;
pub use events::LedgerEvent;
pub use snapshot::{load_snapshot, save_snapshot, Snapshot, SnapshotError};
pub use store::LedgerStore;
