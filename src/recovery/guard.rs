//! Permanent per-account blacklist.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::token::types::{TokenError, TokenResult};

/// Tracks which accounts have been recovered and may no longer send.
///
/// The set only grows: there is no operation that removes an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistGuard {
    accounts: BTreeSet<Address>,
}

impl BlacklistGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_blacklisted(&self, account: &Address) -> bool {
        self.accounts.contains(account)
    }

    /// Fail with `BlacklistedAddress` if `account` is blacklisted.
    pub fn require_not_blacklisted(&self, account: &Address) -> TokenResult<()> {
        if self.is_blacklisted(account) {
            return Err(TokenError::BlacklistedAddress(*account));
        }
        Ok(())
    }

    /// Blacklist `account`. Returns `true` if the flag was newly set.
    pub fn mark_blacklisted(&mut self, account: Address) -> bool {
        self.accounts.insert(account)
    }

    pub fn blacklisted_count(&self) -> usize {
        self.accounts.len()
    }
}
