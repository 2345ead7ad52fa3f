//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → NodeConfig (validated, immutable)
//!     → token deployment + HTTP server
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the token supply and signing domain
//!   are fixed at deployment, so there is no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AdminConfig, ApiConfig, DomainConfig, ListenerConfig, LogFormat, NodeConfig,
    ObservabilityConfig, PersistenceConfig, TokenConfig,
};
pub use validation::{validate_config, ValidationError};
