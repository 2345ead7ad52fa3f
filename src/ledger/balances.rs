//! Balance and allowance bookkeeping.
//!
//! # Responsibilities
//! - Track per-account balances and the total supply
//! - Track owner → spender allowances
//! - Validate every transfer before writing, so a rejected call has no effect

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::token::types::{TokenError, TokenResult};

/// Fungible balance ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    balances: HashMap<Address, U256>,
    allowances: HashMap<Address, HashMap<Address, U256>>,
    total_supply: U256,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `account` (zero when never credited).
    pub fn balance_of(&self, account: &Address) -> U256 {
        self.balances.get(account).copied().unwrap_or_default()
    }

    /// Remaining amount `spender` may move on behalf of `owner`.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> U256 {
        self.allowances
            .get(owner)
            .and_then(|m| m.get(spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Number of accounts holding a non-zero balance.
    pub fn holders(&self) -> usize {
        self.balances.values().filter(|b| !b.is_zero()).count()
    }

    /// Sum of every stored balance. Equal to `total_supply` at all times.
    pub fn sum_of_balances(&self) -> U256 {
        self.balances
            .values()
            .fold(U256::ZERO, |acc, b| acc.saturating_add(*b))
    }

    /// Create `amount` new tokens for `to`. Only used at deployment.
    pub fn mint(&mut self, to: Address, amount: U256) -> TokenResult<()> {
        if to.is_zero() {
            return Err(TokenError::ZeroAddress("mint recipient"));
        }
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::SupplyOverflow)?;
        let balance = self
            .balance_of(&to)
            .checked_add(amount)
            .ok_or(TokenError::SupplyOverflow)?;

        self.total_supply = supply;
        self.balances.insert(to, balance);
        Ok(())
    }

    /// Move `amount` from `from` to `to`.
    pub fn transfer(&mut self, from: Address, to: Address, amount: U256) -> TokenResult<()> {
        if from.is_zero() {
            return Err(TokenError::ZeroAddress("sender"));
        }
        if to.is_zero() {
            return Err(TokenError::ZeroAddress("recipient"));
        }

        let from_balance = self.balance_of(&from);
        if from_balance < amount {
            return Err(TokenError::InsufficientBalance {
                account: from,
                balance: from_balance,
                needed: amount,
            });
        }

        if from != to {
            // Bounded by total supply, cannot overflow.
            let to_balance = self.balance_of(&to).saturating_add(amount);
            self.balances.insert(from, from_balance - amount);
            self.balances.insert(to, to_balance);
        }
        Ok(())
    }

    /// Set the allowance of `spender` over `owner`'s tokens.
    pub fn approve(&mut self, owner: Address, spender: Address, amount: U256) -> TokenResult<()> {
        if owner.is_zero() {
            return Err(TokenError::ZeroAddress("owner"));
        }
        if spender.is_zero() {
            return Err(TokenError::ZeroAddress("spender"));
        }
        self.allowances.entry(owner).or_default().insert(spender, amount);
        Ok(())
    }

    /// Spend `amount` of `spender`'s allowance over `from` and move the tokens.
    ///
    /// An allowance of `U256::MAX` is treated as unlimited and is not decremented.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> TokenResult<()> {
        let allowance = self.allowance(&from, &spender);
        if allowance < amount {
            return Err(TokenError::InsufficientAllowance {
                spender,
                allowance,
                needed: amount,
            });
        }

        self.transfer(from, to, amount)?;

        if allowance != U256::MAX {
            self.allowances
                .entry(from)
                .or_default()
                .insert(spender, allowance - amount);
        }
        Ok(())
    }

    /// Move the entire balance of `from` to `to`, returning the amount moved.
    pub fn move_balance(&mut self, from: Address, to: Address) -> TokenResult<U256> {
        let amount = self.balance_of(&from);
        self.transfer(from, to, amount)?;
        Ok(amount)
    }
}
