//! Emergency transfer: signature-authorized one-time sweep of an account.
//!
//! # State Machine (per account)
//! ```text
//! Normal ──emergency_transfer──▶ Blacklisted (terminal)
//! ```
//!
//! Checks run in a fixed order and all of them precede the first write:
//! 1. source already blacklisted      → AlreadyRecovered
//! 2. deadline <= ledger time         → DeadlineExpired
//! 3. digest + ECDSA recovery         → MalformedSignature
//! 4. signer != registered backup     → UnauthorizedSigner
//! 5. zero rescue address             → ZeroAddress
//! 6. rescue address == source         → SelfRecovery
//!
//! Then the full balance moves and the source is blacklisted.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::ledger::store::LedgerStore;
use crate::recovery::types::{EmergencyTransferMessage, RecoverySignature};
use crate::recovery::verifier::SignatureVerifier;
use crate::token::types::{TokenError, TokenResult};

/// A relayed recovery request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyTransferRequest {
    pub signature: RecoverySignature,
    pub message: EmergencyTransferMessage,
}

/// Outcome of a successful recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryReceipt {
    pub from: Address,
    pub to: Address,
    pub amount: U256,
    pub signer: Address,
}

/// Runs the recovery state transition against a borrowed store.
#[derive(Debug, Clone, Copy)]
pub struct EmergencyTransferProtocol<'a> {
    verifier: &'a SignatureVerifier,
}

impl<'a> EmergencyTransferProtocol<'a> {
    pub fn new(verifier: &'a SignatureVerifier) -> Self {
        Self { verifier }
    }

    /// Validate `request` against `store` at ledger time `now` and apply it.
    ///
    /// The caller must hold exclusive access to `store` for the whole call.
    pub fn execute(
        &self,
        store: &mut LedgerStore,
        now: u64,
        request: &EmergencyTransferRequest,
    ) -> TokenResult<RecoveryReceipt> {
        let EmergencyTransferMessage { from, to, deadline } = request.message;

        if store.blacklist.is_blacklisted(&from) {
            return Err(TokenError::AlreadyRecovered(from));
        }

        if deadline <= U256::from(now) {
            return Err(TokenError::DeadlineExpired { deadline, now });
        }

        let signer = self
            .verifier
            .recover_signer(&request.message, &request.signature)?;

        if store.registry.backup_of(&from) != Some(signer) {
            return Err(TokenError::UnauthorizedSigner {
                account: from,
                signer,
            });
        }

        if to.is_zero() {
            return Err(TokenError::ZeroAddress("rescue address"));
        }
        if to == from {
            return Err(TokenError::SelfRecovery(from));
        }

        let amount = store.balances.move_balance(from, to)?;
        store.blacklist.mark_blacklisted(from);

        Ok(RecoveryReceipt {
            from,
            to,
            amount,
            signer,
        })
    }
}
