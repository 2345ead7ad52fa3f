//! Recovery message and signature types.

use alloy::primitives::{hex, Address, Signature, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::token::types::{TokenError, TokenResult};

/// The typed `(from, to, deadline)` tuple a backup signs to authorize a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyTransferMessage {
    /// Account being recovered.
    pub from: Address,
    /// Rescue account receiving the balance.
    pub to: Address,
    /// Absolute expiry in seconds since the epoch.
    pub deadline: U256,
}

impl EmergencyTransferMessage {
    pub fn new(from: Address, to: Address, deadline: U256) -> Self {
        Self { from, to, deadline }
    }
}

/// An ECDSA signature in `(v, r, s)` form.
///
/// `v` is accepted as either a raw parity bit (0/1) or the legacy 27/28 form.
/// Range checks happen at recovery time, not at construction, so that a
/// malformed signature is reported as `MalformedSignature` by the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecoverySignature {
    pub v: u8,
    pub r: B256,
    pub s: B256,
}

impl RecoverySignature {
    pub fn new(v: u8, r: B256, s: B256) -> Self {
        Self { v, r, s }
    }

    /// Parse the 65-byte `r || s || v` encoding.
    pub fn from_bytes(bytes: &[u8]) -> TokenResult<Self> {
        if bytes.len() != 65 {
            return Err(TokenError::MalformedSignature(format!(
                "expected 65 bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self {
            r: B256::from_slice(&bytes[..32]),
            s: B256::from_slice(&bytes[32..64]),
            v: bytes[64],
        })
    }

    /// The 65-byte `r || s || v` encoding.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(self.r.as_slice());
        out[32..64].copy_from_slice(self.s.as_slice());
        out[64] = self.v;
        out
    }

    /// The y-parity bit encoded in `v`, if `v` is in range.
    pub fn y_parity(&self) -> Option<bool> {
        match self.v {
            0 | 27 => Some(false),
            1 | 28 => Some(true),
            _ => None,
        }
    }
}

impl From<Signature> for RecoverySignature {
    fn from(sig: Signature) -> Self {
        Self {
            v: 27 + sig.v() as u8,
            r: B256::from(sig.r()),
            s: B256::from(sig.s()),
        }
    }
}

impl FromStr for RecoverySignature {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| TokenError::MalformedSignature(format!("invalid hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for RecoverySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_prefixed(self.to_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Signature bytes from a real authorization produced by a browser wallet.
    const SIGNATURE_HEX: &str = "0xcaa612dd7c4c75bf8a5d32856599b437d8fab5c874773aff50313640f88d6cfc771207a87eefa7d7de97ec6ad8f8b81c4946ece2e93e4b2acb49a83e1ffdca4f1c";

    #[test]
    fn test_parse_rsv_hex() {
        let sig: RecoverySignature = SIGNATURE_HEX.parse().unwrap();
        assert_eq!(sig.v, 0x1c);
        assert_eq!(sig.y_parity(), Some(true));
        assert_eq!(
            sig.r,
            "0xcaa612dd7c4c75bf8a5d32856599b437d8fab5c874773aff50313640f88d6cfc"
                .parse::<B256>()
                .unwrap()
        );
        assert_eq!(sig.to_string(), SIGNATURE_HEX);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let err = "0xdeadbeef".parse::<RecoverySignature>().unwrap_err();
        assert_eq!(err.code(), "ERC20_MALFORMED_SIGNATURE");
    }

    #[test]
    fn test_parity_forms() {
        let r = B256::repeat_byte(1);
        let s = B256::repeat_byte(2);
        assert_eq!(RecoverySignature::new(0, r, s).y_parity(), Some(false));
        assert_eq!(RecoverySignature::new(27, r, s).y_parity(), Some(false));
        assert_eq!(RecoverySignature::new(1, r, s).y_parity(), Some(true));
        assert_eq!(RecoverySignature::new(28, r, s).y_parity(), Some(true));
        assert_eq!(RecoverySignature::new(29, r, s).y_parity(), None);
    }
}
