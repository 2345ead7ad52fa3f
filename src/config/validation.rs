//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Parse addresses and amounts once, before the ledger is deployed
//! - Validate value ranges (timeouts > 0, chain id > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: NodeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::NodeConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check every semantic constraint of `config`.
pub fn validate_config(config: &NodeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "listener.request_timeout_secs",
            "must be greater than 0",
        ));
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::new(
            "listener.max_body_bytes",
            "must be greater than 0",
        ));
    }

    if config.token.name.trim().is_empty() {
        errors.push(ValidationError::new("token.name", "must not be empty"));
    }
    if config.token.symbol.trim().is_empty() {
        errors.push(ValidationError::new("token.symbol", "must not be empty"));
    }
    if let Err(e) = config.token.parsed_initial_supply() {
        errors.push(ValidationError::new("token.initial_supply", e));
    }
    match config.token.parsed_initial_holder() {
        Ok(holder) if holder.is_zero() => {
            errors.push(ValidationError::new(
                "token.initial_holder",
                "must not be the zero address",
            ));
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::new("token.initial_holder", e)),
    }

    if config.domain.name.trim().is_empty() {
        errors.push(ValidationError::new("domain.name", "must not be empty"));
    }
    if config.domain.version.trim().is_empty() {
        errors.push(ValidationError::new("domain.version", "must not be empty"));
    }
    if config.domain.chain_id == 0 {
        errors.push(ValidationError::new("domain.chain_id", "must be greater than 0"));
    }
    if let Err(e) = config.domain.parsed_verifying_contract() {
        errors.push(ValidationError::new("domain.verifying_contract", e));
    }

    if let Some(key) = &config.api.api_key {
        if key.trim().is_empty() {
            errors.push(ValidationError::new("api.api_key", "must not be empty when set"));
        }
    }
    if config.admin.enabled && config.admin.api_key.trim().is_empty() {
        errors.push(ValidationError::new(
            "admin.api_key",
            "must be set when admin is enabled",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if config.persistence.snapshot_path.is_some() && config.persistence.snapshot_interval_secs == 0
    {
        errors.push(ValidationError::new(
            "persistence.snapshot_interval_secs",
            "must be greater than 0 when snapshot_path is set",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&NodeConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = NodeConfig::default();
        config.domain.chain_id = 0;
        config.domain.verifying_contract = "not-an-address".to_string();
        config.token.initial_supply = "12abc".to_string();
        config.token.initial_holder = "0x0000000000000000000000000000000000000000".to_string();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(errors.len(), 4);
        assert!(fields.contains(&"domain.chain_id"));
        assert!(fields.contains(&"domain.verifying_contract"));
        assert!(fields.contains(&"token.initial_supply"));
        assert!(fields.contains(&"token.initial_holder"));
    }

    #[test]
    fn test_snapshot_interval_required() {
        let mut config = NodeConfig::default();
        config.persistence.snapshot_path = Some("ledger.json".to_string());
        config.persistence.snapshot_interval_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "persistence.snapshot_interval_secs");
    }
}
