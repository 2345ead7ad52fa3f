//! Public token façade.
//!
//! # Data Flow
//! ```text
//! HTTP handler / library caller
//!     → service.rs (Token: lock store, sample clock)
//!         → recovery (guard, registry, protocol)
//!         → ledger (balances)
//!     → unlock
//!     → events, logs, metrics
//! ```

pub mod clock;
pub mod service;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use service::Token;
pub use types::{AccountView, DeployError, LedgerStats, TokenError, TokenMetadata, TokenResult};
