//! Social recovery subsystem.
//!
//! # Data Flow
//! ```text
//! Account owner
//!     → registry.rs (set_backup, gated by guard.rs)
//!
//! Backup key holder (off-chain)
//!     → signs EIP-712 digest from verifier.rs
//!
//! Any relayer
//!     → protocol.rs (emergency_transfer)
//!         → guard.rs     (reject recovered source)
//!         → verifier.rs  (digest + signer recovery)
//!         → registry.rs  (signer must be the backup)
//!         → ledger       (move full balance)
//!         → guard.rs     (blacklist source, terminal)
//! ```
//!
//! # Security Constraints
//! - One backup per account; one recovery per account
//! - Signatures are bound to chain id and verifying contract
//! - Only canonical low-s signatures are accepted

pub mod guard;
pub mod protocol;
pub mod registry;
pub mod types;
pub mod verifier;

pub use guard::BlacklistGuard;
pub use protocol::{EmergencyTransferProtocol, EmergencyTransferRequest, RecoveryReceipt};
pub use registry::AccountRegistry;
pub use types::{EmergencyTransferMessage, RecoverySignature};
pub use verifier::{SignatureVerifier, EMERGENCY_TRANSFER_TYPE};
