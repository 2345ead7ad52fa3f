//! Token-level types and error definitions.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by token entry points.
///
/// Every variant is a precondition failure: it is detected before any
/// state is written, so a failed call leaves the ledger untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Source account of a transfer is blacklisted.
    #[error("ERC20_BLACKLISTED_ADDRESS: {0} is blacklisted")]
    BlacklistedAddress(Address),

    /// Caller of a registry update is blacklisted.
    #[error("ERC20_BLACKLISTED_ADDRESS: caller {0} is blacklisted")]
    BlacklistedCaller(Address),

    /// The account was already swept by a previous emergency transfer.
    #[error("ERC20_ALREADY_RECOVERED: {0} has already been recovered")]
    AlreadyRecovered(Address),

    /// The signed authorization is past its deadline.
    #[error("ERC20_DEADLINE_EXPIRED: deadline {deadline} is not after ledger time {now}")]
    DeadlineExpired { deadline: U256, now: u64 },

    /// The signature does not recover to the registered backup address.
    #[error("ERC20_UNAUTHORIZED_SIGNER: {signer} is not the backup of {account}")]
    UnauthorizedSigner { account: Address, signer: Address },

    /// Signature components are out of range or do not recover.
    #[error("ERC20_MALFORMED_SIGNATURE: {0}")]
    MalformedSignature(String),

    /// Balance too low for the requested transfer.
    #[error("ERC20_INSUFFICIENT_BALANCE: {account} holds {balance}, needs {needed}")]
    InsufficientBalance {
        account: Address,
        balance: U256,
        needed: U256,
    },

    /// Allowance too low for a delegated transfer.
    #[error("ERC20_INSUFFICIENT_ALLOWANCE: {spender} may spend {allowance}, needs {needed}")]
    InsufficientAllowance {
        spender: Address,
        allowance: U256,
        needed: U256,
    },

    /// The rescue address of an emergency transfer is the account being recovered.
    #[error("ERC20_SELF_RECOVERY: {0} cannot be its own rescue address")]
    SelfRecovery(Address),

    /// The zero address was used where a real account is required.
    #[error("ERC20_ZERO_ADDRESS: {0} must not be the zero address")]
    ZeroAddress(&'static str),

    /// Minting would overflow the 256-bit supply.
    #[error("ERC20_SUPPLY_OVERFLOW: minting would overflow total supply")]
    SupplyOverflow,
}

impl TokenError {
    /// Stable machine-readable identifier of the failed precondition.
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::BlacklistedAddress(_) | TokenError::BlacklistedCaller(_) => {
                "ERC20_BLACKLISTED_ADDRESS"
            }
            TokenError::AlreadyRecovered(_) => "ERC20_ALREADY_RECOVERED",
            TokenError::DeadlineExpired { .. } => "ERC20_DEADLINE_EXPIRED",
            TokenError::UnauthorizedSigner { .. } => "ERC20_UNAUTHORIZED_SIGNER",
            TokenError::MalformedSignature(_) => "ERC20_MALFORMED_SIGNATURE",
            TokenError::InsufficientBalance { .. } => "ERC20_INSUFFICIENT_BALANCE",
            TokenError::InsufficientAllowance { .. } => "ERC20_INSUFFICIENT_ALLOWANCE",
            TokenError::SelfRecovery(_) => "ERC20_SELF_RECOVERY",
            TokenError::ZeroAddress(_) => "ERC20_ZERO_ADDRESS",
            TokenError::SupplyOverflow => "ERC20_SUPPLY_OVERFLOW",
        }
    }
}

/// Result type for token operations.
pub type TokenResult<T> = Result<T, TokenError>;

/// Errors raised while deploying a token from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeployError {
    /// A deployment parameter in the configuration does not parse.
    #[error("Invalid deployment config: {0}")]
    Config(String),

    /// The initial mint was rejected by the ledger.
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Static token metadata fixed at deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self {
            name: "DevonRex".to_string(),
            symbol: "DRX".to_string(),
            decimals: 18,
        }
    }
}

/// Read-only view of a single account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    pub address: Address,
    pub balance: U256,
    pub backup: Option<Address>,
    pub blacklisted: bool,
}

/// Aggregate ledger counters for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStats {
    pub total_supply: U256,
    pub holders: usize,
    pub backups: usize,
    pub blacklisted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blacklist_errors_share_code() {
        let addr = Address::repeat_byte(0x11);
        assert_eq!(TokenError::BlacklistedAddress(addr).code(), "ERC20_BLACKLISTED_ADDRESS");
        assert_eq!(TokenError::BlacklistedCaller(addr).code(), "ERC20_BLACKLISTED_ADDRESS");
    }

    #[test]
    fn test_error_display_starts_with_code() {
        let err = TokenError::DeadlineExpired {
            deadline: U256::from(10),
            now: 20,
        };
        assert!(err.to_string().starts_with(err.code()));

        let err = TokenError::ZeroAddress("recipient");
        assert!(err.to_string().starts_with("ERC20_ZERO_ADDRESS"));
        assert!(err.to_string().contains("recipient"));
    }

    #[test]
    fn test_deploy_error_wraps_token_error() {
        let err = DeployError::from(TokenError::ZeroAddress("mint recipient"));
        assert!(err.to_string().starts_with("ERC20_ZERO_ADDRESS"));
        assert!(matches!(err, DeployError::Token(_)));
    }

    #[test]
    fn test_self_recovery_code() {
        let err = TokenError::SelfRecovery(Address::repeat_byte(0x11));
        assert_eq!(err.code(), "ERC20_SELF_RECOVERY");
        assert!(err.to_string().starts_with(err.code()));
    }

    #[test]
    fn test_default_metadata() {
        let meta = TokenMetadata::default();
        assert_eq!(meta.symbol, "DRX");
        assert_eq!(meta.decimals, 18);
    }
}
