//! The explicit key-value store holding all mutable ledger state.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::ledger::balances::Balances;
use crate::recovery::guard::BlacklistGuard;
use crate::recovery::registry::AccountRegistry;
use crate::token::types::AccountView;

/// Balances, backups and blacklist flags for every account.
///
/// Owned by the token behind a single lock; components receive it (or one of
/// its fields) by reference for the duration of one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStore {
    pub balances: Balances,
    pub registry: AccountRegistry,
    pub blacklist: BlacklistGuard,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `supply` tokens credited to `holder`.
    pub fn with_initial_mint(holder: Address, supply: U256) -> crate::token::TokenResult<Self> {
        let mut store = Self::new();
        store.balances.mint(holder, supply)?;
        Ok(store)
    }

    pub fn account(&self, address: Address) -> AccountView {
        AccountView {
            address,
            balance: self.balances.balance_of(&address),
            backup: self.registry.backup_of(&address),
            blacklisted: self.blacklist.is_blacklisted(&address),
        }
    }
}
