//! Shared fixtures for integration tests.

#![allow(dead_code)]

use alloy::primitives::{Address, U256};
use std::sync::Arc;

use devon_rex::config::NodeConfig;
use devon_rex::signing::Wallet;
use devon_rex::token::{ManualClock, Token};

/// Ledger time every fixture starts at.
pub const START: u64 = 1_700_000_000;

// Anvil's deterministic development keys.
pub const DEPLOYER_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const ALICE_KEY: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
pub const BOB_KEY: &str = "5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a";
pub const CAROL_KEY: &str = "7c852118294e51e653712a81e05800f419141751be58f605c371e15141b007a6";

pub fn wallet(key: &str) -> Wallet {
    Wallet::from_private_key(key).unwrap()
}

pub fn addr(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

/// Deployment supply used by the default configuration.
pub fn initial_supply() -> U256 {
    NodeConfig::default().token.parsed_initial_supply().unwrap()
}

/// A token deployed from the default configuration, minted to the Anvil
/// deployer account, with a clock the test controls.
pub fn deploy() -> (Token, Arc<ManualClock>) {
    deploy_with(&NodeConfig::default())
}

pub fn deploy_with(config: &NodeConfig) -> (Token, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(START));
    let token = Token::from_config(config, clock.clone()).unwrap();
    (token, clock)
}
