//! EIP-712 digest construction and signer recovery.
//!
//! # Digest
//! ```text
//! typeHash    = keccak256("set(address from,address to,uint256 deadline)")
//! structHash  = keccak256(typeHash || from || to || deadline)
//! digest      = keccak256(0x19 0x01 || domainSeparator || structHash)
//! ```
//!
//! The domain separator binds every digest to one chain id and one
//! verifying contract, so an authorization cannot be replayed elsewhere.

use alloy::primitives::{keccak256, uint, Address, Signature, B256, U256};
use alloy::sol_types::Eip712Domain;
use std::borrow::Cow;

use crate::recovery::types::{EmergencyTransferMessage, RecoverySignature};
use crate::token::types::{TokenError, TokenResult};

/// Primary type of the signed recovery message.
pub const EMERGENCY_TRANSFER_TYPE: &str = "set(address from,address to,uint256 deadline)";

/// Order of the secp256k1 group.
const SECP256K1_N: U256 =
    uint!(0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141_U256);

/// Upper bound for `s` in canonical (low-s) signatures.
const SECP256K1_HALF_N: U256 =
    uint!(0x7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0_U256);

/// Computes recovery digests for one deployment and recovers their signers.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    domain: Eip712Domain,
    separator: B256,
    type_hash: B256,
}

impl SignatureVerifier {
    /// Build a verifier for the given deployment domain.
    ///
    /// The separator is computed once here and reused for every digest.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        chain_id: u64,
        verifying_contract: Address,
    ) -> Self {
        let domain = Eip712Domain::new(
            Some(Cow::Owned(name.into())),
            Some(Cow::Owned(version.into())),
            Some(U256::from(chain_id)),
            Some(verifying_contract),
            None,
        );
        let separator = domain.separator();

        Self {
            domain,
            separator,
            type_hash: keccak256(EMERGENCY_TRANSFER_TYPE.as_bytes()),
        }
    }

    pub fn domain(&self) -> &Eip712Domain {
        &self.domain
    }

    pub fn domain_separator(&self) -> B256 {
        self.separator
    }

    /// Chain id bound into the domain.
    pub fn chain_id(&self) -> u64 {
        self.domain
            .chain_id
            .map(|id| id.saturating_to::<u64>())
            .unwrap_or_default()
    }

    pub fn verifying_contract(&self) -> Address {
        self.domain.verifying_contract.unwrap_or_default()
    }

    /// EIP-712 `hashStruct` of the message.
    pub fn struct_hash(&self, message: &EmergencyTransferMessage) -> B256 {
        let mut encoded = [0u8; 128];
        encoded[..32].copy_from_slice(self.type_hash.as_slice());
        encoded[32..64].copy_from_slice(message.from.into_word().as_slice());
        encoded[64..96].copy_from_slice(message.to.into_word().as_slice());
        encoded[96..].copy_from_slice(&message.deadline.to_be_bytes::<32>());
        keccak256(encoded)
    }

    /// Digest the backup key signs for `message`.
    pub fn digest(&self, message: &EmergencyTransferMessage) -> B256 {
        let mut preimage = [0u8; 66];
        preimage[0] = 0x19;
        preimage[1] = 0x01;
        preimage[2..34].copy_from_slice(self.separator.as_slice());
        preimage[34..].copy_from_slice(self.struct_hash(message).as_slice());
        keccak256(preimage)
    }

    /// Recover the address that produced `signature` over `digest`.
    pub fn recover(&self, digest: &B256, signature: &RecoverySignature) -> TokenResult<Address> {
        let y_parity = signature.y_parity().ok_or_else(|| {
            TokenError::MalformedSignature(format!("invalid recovery id {}", signature.v))
        })?;

        let r = U256::from_be_bytes(signature.r.0);
        let s = U256::from_be_bytes(signature.s.0);
        if r.is_zero() || r >= SECP256K1_N {
            return Err(TokenError::MalformedSignature("r out of range".to_string()));
        }
        if s.is_zero() || s > SECP256K1_HALF_N {
            return Err(TokenError::MalformedSignature("s out of range".to_string()));
        }

        let signer = Signature::new(r, s, y_parity)
            .recover_address_from_prehash(digest)
            .map_err(|e| TokenError::MalformedSignature(e.to_string()))?;

        if signer.is_zero() {
            return Err(TokenError::MalformedSignature(
                "recovered the zero address".to_string(),
            ));
        }
        Ok(signer)
    }

    /// Digest `message` and recover its signer in one step.
    pub fn recover_signer(
        &self,
        message: &EmergencyTransferMessage,
        signature: &RecoverySignature,
    ) -> TokenResult<Address> {
        self.recover(&self.digest(message), signature)
    }
}
