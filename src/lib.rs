//! DevonRex token ledger library.
//!
//! A fixed-supply ERC-20 style ledger extended with backup-address social
//! recovery: an account owner registers a backup, and the backup's EIP-712
//! signature lets any relayer sweep the account into a rescue address once,
//! after which the account is permanently blacklisted.

// Core ledger
pub mod ledger;
pub mod recovery;
pub mod token;

// Off-chain signing
pub mod signing;

// Service surfaces
pub mod admin;
pub mod http;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::schema::NodeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use recovery::{EmergencyTransferMessage, RecoverySignature, SignatureVerifier};
pub use token::{Token, TokenError, TokenResult};
