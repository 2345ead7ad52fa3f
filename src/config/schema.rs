//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the node.
//! All types derive Serde traits for deserialization from config files.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Root configuration for the ledger node.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct NodeConfig {
    /// Listener configuration (bind address, request limits).
    pub listener: ListenerConfig,

    /// Token metadata and the deployment-time mint.
    pub token: TokenConfig,

    /// EIP-712 signing domain for recovery authorizations.
    pub domain: DomainConfig,

    /// Public API authentication.
    pub api: ApiConfig,

    /// Admin endpoints.
    pub admin: AdminConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Snapshot persistence.
    pub persistence: PersistenceConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8545").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8545".to_string(),
            request_timeout_secs: 30,
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Token deployment parameters. Fixed for the lifetime of the ledger.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,

    /// Initial supply in base units, as a decimal string.
    pub initial_supply: String,

    /// Account credited with the initial supply.
    pub initial_holder: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: "DevonRex".to_string(),
            symbol: "DRX".to_string(),
            decimals: 18,
            // 10 million tokens at 18 decimals
            initial_supply: "10000000000000000000000000".to_string(),
            // Anvil's first test account
            initial_holder: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".to_string(),
        }
    }
}

impl TokenConfig {
    pub fn parsed_initial_supply(&self) -> Result<U256, String> {
        U256::from_str_radix(self.initial_supply.trim(), 10)
            .map_err(|e| format!("invalid initial_supply '{}': {}", self.initial_supply, e))
    }

    pub fn parsed_initial_holder(&self) -> Result<Address, String> {
        self.initial_holder
            .parse()
            .map_err(|e| format!("invalid initial_holder '{}': {}", self.initial_holder, e))
    }
}

/// EIP-712 domain bound into every recovery signature.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DomainConfig {
    pub name: String,
    pub version: String,

    /// Chain ID (e.g., 1 for Ethereum mainnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// Address identifying this ledger deployment.
    pub verifying_contract: String,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            name: "DevonRexBackup".to_string(),
            version: "1".to_string(),
            chain_id: 31337,
            verifying_contract: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
        }
    }
}

impl DomainConfig {
    pub fn parsed_verifying_contract(&self) -> Result<Address, String> {
        self.verifying_contract.parse().map_err(|e| {
            format!(
                "invalid verifying_contract '{}': {}",
                self.verifying_contract, e
            )
        })
    }
}

/// Public API authentication.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ApiConfig {
    /// Bearer token required on mutating routes. Unset disables the check.
    pub api_key: Option<String>,
}

/// Admin endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable admin routes.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Snapshot persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Snapshot file. Unset keeps the ledger in memory only.
    pub snapshot_path: Option<String>,

    /// Interval between periodic snapshots in seconds.
    pub snapshot_interval_secs: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            snapshot_interval_secs: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        let config = NodeConfig::default();
        assert_eq!(
            config.token.parsed_initial_supply().unwrap(),
            U256::from(10_000_000u64) * U256::from(10u64).pow(U256::from(18))
        );
        assert!(config.token.parsed_initial_holder().is_ok());
        assert!(config.domain.parsed_verifying_contract().is_ok());
        assert_eq!(config.domain.name, "DevonRexBackup");
    }

    #[test]
    fn test_minimal_toml() {
        let config: NodeConfig = toml::from_str(
            r#"
            [domain]
            chain_id = 5

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.domain.chain_id, 5);
        assert_eq!(config.domain.version, "1");
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert!(config.api.api_key.is_none());
    }
}
