//! Off-chain signing of recovery authorizations.
//!
//! # Data Flow
//! ```text
//! Environment variable (backup private key)
//!     → wallet.rs (key loading)
//!     → recovery::verifier (EIP-712 digest for the deployment)
//!     → RecoverySignature (v, r, s) handed to any relayer
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data

pub mod wallet;

pub use wallet::{Wallet, WalletError, PRIVATE_KEY_ENV_VAR};
