//! Backup key management and recovery authorization signing.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables or explicit input
//! - Keys are never logged or serialized

use alloy::primitives::{Address, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use thiserror::Error;

use crate::recovery::types::{EmergencyTransferMessage, RecoverySignature};
use crate::recovery::verifier::SignatureVerifier;

/// Environment variable name for the backup private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "DEVON_REX_PRIVATE_KEY";

/// Errors raised by wallet operations.
#[derive(Debug, Error)]
pub enum WalletError {
    /// Invalid private key format or derivation error.
    #[error("Invalid private key format: {0}")]
    InvalidKey(String),

    /// Key not available in the environment.
    #[error("Environment variable {0} not set")]
    MissingEnv(&'static str),

    /// The signer backend failed.
    #[error("Signing failed: {0}")]
    Signing(String),
}

/// A backup key able to authorize emergency transfers.
#[derive(Debug, Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    ///
    /// # Security
    /// The private key is parsed and stored securely. It is never logged.
    pub fn from_private_key(private_key_hex: &str) -> Result<Self, WalletError> {
        let key_hex = private_key_hex
            .trim()
            .strip_prefix("0x")
            .unwrap_or(private_key_hex.trim());

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| WalletError::InvalidKey(format!("{}", e)))?;

        tracing::debug!(address = %signer.address(), "Wallet initialized");
        Ok(Self { signer })
    }

    /// Load wallet from environment variable.
    ///
    /// Reads `DEVON_REX_PRIVATE_KEY` from environment.
    pub fn from_env() -> Result<Self, WalletError> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR)
            .map_err(|_| WalletError::MissingEnv(PRIVATE_KEY_ENV_VAR))?;
        Self::from_private_key(&private_key)
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign a 32-byte digest.
    pub fn sign_hash(&self, hash: &B256) -> Result<RecoverySignature, WalletError> {
        self.signer
            .sign_hash_sync(hash)
            .map(RecoverySignature::from)
            .map_err(|e| WalletError::Signing(e.to_string()))
    }

    /// Authorize sweeping `from` into `to` until `deadline` under `verifier`'s domain.
    pub fn sign_emergency_transfer(
        &self,
        verifier: &SignatureVerifier,
        from: Address,
        to: Address,
        deadline: U256,
    ) -> Result<RecoverySignature, WalletError> {
        let message = EmergencyTransferMessage::new(from, to, deadline);
        self.sign_hash(&verifier.digest(&message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known test private key (Anvil's first account)
    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_wallet_from_private_key() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        // This is the corresponding address for the test key
        assert_eq!(
            wallet.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_wallet_with_0x_prefix() {
        let wallet = Wallet::from_private_key(&format!("0x{}", TEST_PRIVATE_KEY)).unwrap();
        assert_eq!(
            wallet.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_invalid_private_key() {
        let result = Wallet::from_private_key("invalid_key");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid private key"));
    }

    #[test]
    fn test_signed_authorization_recovers_to_wallet() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let verifier =
            SignatureVerifier::new("DevonRexBackup", "1", 31337, Address::repeat_byte(0xc0));
        let from = Address::repeat_byte(0x01);
        let to = Address::repeat_byte(0x02);
        let deadline = U256::from(1_900_000_000u64);

        let signature = wallet
            .sign_emergency_transfer(&verifier, from, to, deadline)
            .unwrap();
        let recovered = verifier
            .recover_signer(&EmergencyTransferMessage::new(from, to, deadline), &signature)
            .unwrap();

        assert_eq!(recovered, wallet.address());
        assert!(signature.v == 27 || signature.v == 28);
    }
}
