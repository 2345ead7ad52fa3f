//! Backup address registry.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::recovery::guard::BlacklistGuard;
use crate::token::types::{TokenError, TokenResult};

/// Maps an account to the single address allowed to authorize its recovery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRegistry {
    backups: HashMap<Address, Address>,
}

impl AccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `backup` for `caller`, replacing any previous entry.
    ///
    /// Returns the previous backup, if one was set.
    pub fn set_backup(
        &mut self,
        guard: &BlacklistGuard,
        caller: Address,
        backup: Address,
    ) -> TokenResult<Option<Address>> {
        if guard.is_blacklisted(&caller) {
            return Err(TokenError::BlacklistedCaller(caller));
        }
        if backup.is_zero() {
            return Err(TokenError::ZeroAddress("backup"));
        }
        Ok(self.backups.insert(caller, backup))
    }

    pub fn backup_of(&self, account: &Address) -> Option<Address> {
        self.backups.get(account).copied()
    }

    pub fn len(&self) -> usize {
        self.backups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backups.is_empty()
    }
}
