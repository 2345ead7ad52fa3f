//! The token façade: every public entry point of the ledger.
//!
//! # Responsibilities
//! - Own the `LedgerStore` behind one exclusive lock
//! - Run each entry point to completion inside a single critical section
//! - Publish `LedgerEvent`s, logs and metrics after the state change commits,
//!   before the lock is released, so subscribers see events in commit order
//!
//! # Design Decisions
//! - The lock is the only concurrency control: two mutating calls never
//!   interleave, so the check-then-act sequence of a recovery is indivisible
//! - Ledger time is sampled once per call, inside the lock
//! - Nothing awaits while the lock is held; `broadcast::Sender::send` never blocks

use alloy::primitives::{Address, B256, U256};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::config::NodeConfig;
use crate::ledger::events::LedgerEvent;
use crate::ledger::snapshot::{Snapshot, SnapshotError};
use crate::ledger::store::LedgerStore;
use crate::observability::metrics;
use crate::recovery::protocol::{EmergencyTransferProtocol, EmergencyTransferRequest};
use crate::recovery::types::{EmergencyTransferMessage, RecoverySignature};
use crate::recovery::verifier::SignatureVerifier;
use crate::token::clock::Clock;
use crate::token::types::{AccountView, DeployError, LedgerStats, TokenMetadata, TokenResult};

/// Capacity of the event broadcast channel.
const EVENT_CAPACITY: usize = 1024;

/// A deployed token ledger with backup-address recovery.
pub struct Token {
    metadata: TokenMetadata,
    verifier: SignatureVerifier,
    store: Mutex<LedgerStore>,
    clock: Arc<dyn Clock>,
    events: broadcast::Sender<LedgerEvent>,
}

impl Token {
    /// Deploy a fresh ledger, minting `initial_supply` to `initial_holder`.
    ///
    /// This is the only mint the ledger ever performs.
    pub fn deploy(
        metadata: TokenMetadata,
        verifier: SignatureVerifier,
        initial_holder: Address,
        initial_supply: U256,
        clock: Arc<dyn Clock>,
    ) -> TokenResult<Self> {
        let store = LedgerStore::with_initial_mint(initial_holder, initial_supply)?;

        tracing::info!(
            symbol = %metadata.symbol,
            holder = %initial_holder,
            supply = %initial_supply,
            chain_id = verifier.chain_id(),
            contract = %verifier.verifying_contract(),
            "Token deployed"
        );

        Ok(Self::from_store(metadata, verifier, store, clock))
    }

    /// Build a token over existing state.
    pub fn from_store(
        metadata: TokenMetadata,
        verifier: SignatureVerifier,
        store: LedgerStore,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        metrics::record_blacklisted(store.blacklist.blacklisted_count());
        Self {
            metadata,
            verifier,
            store: Mutex::new(store),
            clock,
            events,
        }
    }

    /// Deploy from validated configuration.
    pub fn from_config(config: &NodeConfig, clock: Arc<dyn Clock>) -> Result<Self, DeployError> {
        let verifier = verifier_from_config(config).map_err(DeployError::Config)?;
        let holder = config
            .token
            .parsed_initial_holder()
            .map_err(DeployError::Config)?;
        let supply = config
            .token
            .parsed_initial_supply()
            .map_err(DeployError::Config)?;
        Ok(Self::deploy(
            metadata_from_config(config),
            verifier,
            holder,
            supply,
            clock,
        )?)
    }

    /// Rebuild a token from a snapshot taken under the same signing domain.
    pub fn restore(
        config: &NodeConfig,
        snapshot: Snapshot,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SnapshotError> {
        let verifier = verifier_from_config(config).map_err(|_| SnapshotError::DomainMismatch {
            chain_id: snapshot.chain_id,
            contract: snapshot.verifying_contract,
        })?;

        if snapshot.chain_id != verifier.chain_id()
            || snapshot.verifying_contract != verifier.verifying_contract()
        {
            return Err(SnapshotError::DomainMismatch {
                chain_id: snapshot.chain_id,
                contract: snapshot.verifying_contract,
            });
        }

        Ok(Self::from_store(
            metadata_from_config(config),
            verifier,
            snapshot.store,
            clock,
        ))
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    pub fn verifier(&self) -> &SignatureVerifier {
        &self.verifier
    }

    pub fn domain_separator(&self) -> B256 {
        self.verifier.domain_separator()
    }

    /// Receive every event committed from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.events.subscribe()
    }

    // ---- queries ----

    pub fn balance_of(&self, account: Address) -> U256 {
        self.store.lock().balances.balance_of(&account)
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.store.lock().balances.allowance(&owner, &spender)
    }

    pub fn total_supply(&self) -> U256 {
        self.store.lock().balances.total_supply()
    }

    pub fn backup_of(&self, account: Address) -> Option<Address> {
        self.store.lock().registry.backup_of(&account)
    }

    pub fn is_blacklisted(&self, account: Address) -> bool {
        self.store.lock().blacklist.is_blacklisted(&account)
    }

    pub fn account(&self, account: Address) -> AccountView {
        self.store.lock().account(account)
    }

    /// Aggregate counters over the whole ledger.
    pub fn stats(&self) -> LedgerStats {
        let store = self.store.lock();
        LedgerStats {
            total_supply: store.balances.total_supply(),
            holders: store.balances.holders(),
            backups: store.registry.len(),
            blacklisted: store.blacklist.blacklisted_count(),
        }
    }

    /// Consistent copy of the whole ledger state.
    pub fn snapshot(&self) -> Snapshot {
        let store = self.store.lock().clone();
        Snapshot::new(
            self.verifier.chain_id(),
            self.verifier.verifying_contract(),
            store,
        )
    }

    // ---- mutating entry points ----

    /// Move `amount` from `caller` to `to`.
    pub fn transfer(&self, caller: Address, to: Address, amount: U256) -> TokenResult<()> {
        let mut store = self.store.lock();
        let result = store
            .blacklist
            .require_not_blacklisted(&caller)
            .and_then(|()| store.balances.transfer(caller, to, amount));

        self.finish(
            "transfer",
            result.map(|()| LedgerEvent::Transfer {
                from: caller,
                to,
                value: amount,
            }),
        )
    }

    /// Allow `spender` to move up to `amount` of `caller`'s tokens.
    pub fn approve(&self, caller: Address, spender: Address, amount: U256) -> TokenResult<()> {
        let mut store = self.store.lock();
        let result = store.balances.approve(caller, spender, amount);

        self.finish(
            "approve",
            result.map(|()| LedgerEvent::Approval {
                owner: caller,
                spender,
                value: amount,
            }),
        )
    }

    /// Move `amount` from `from` to `to` using `caller`'s allowance.
    pub fn transfer_from(
        &self,
        caller: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> TokenResult<()> {
        let mut store = self.store.lock();
        let result = store
            .blacklist
            .require_not_blacklisted(&from)
            .and_then(|()| store.balances.transfer_from(caller, from, to, amount));

        self.finish(
            "transfer_from",
            result.map(|()| LedgerEvent::Transfer {
                from,
                to,
                value: amount,
            }),
        )
    }

    /// Register `backup` as the recovery key holder for `caller`.
    pub fn set_backup(&self, caller: Address, backup: Address) -> TokenResult<()> {
        let mut store = self.store.lock();
        let LedgerStore {
            registry,
            blacklist,
            ..
        } = &mut *store;
        let result = registry.set_backup(blacklist, caller, backup);

        if result.is_ok() {
            tracing::info!(account = %caller, backup = %backup, "Backup address registered");
        }

        self.finish(
            "set_backup",
            result.map(|previous| LedgerEvent::BackupChanged {
                account: caller,
                previous,
                backup,
            }),
        )
    }

    /// Sweep `from` into `to` on the authority of its backup's signature.
    ///
    /// Callable by anyone; the caller is a relay and is not checked.
    /// Returns the amount moved.
    pub fn emergency_transfer(
        &self,
        signature: RecoverySignature,
        from: Address,
        to: Address,
        deadline: U256,
    ) -> TokenResult<U256> {
        let request = EmergencyTransferRequest {
            signature,
            message: EmergencyTransferMessage { from, to, deadline },
        };

        let mut store = self.store.lock();
        let now = self.clock.now();
        let result =
            EmergencyTransferProtocol::new(&self.verifier).execute(&mut store, now, &request);
        let blacklisted = store.blacklist.blacklisted_count();

        match &result {
            Ok(receipt) => {
                tracing::warn!(
                    from = %receipt.from,
                    to = %receipt.to,
                    amount = %receipt.amount,
                    signer = %receipt.signer,
                    "Emergency transfer executed, source account blacklisted"
                );
                metrics::record_emergency_transfer();
                metrics::record_blacklisted(blacklisted);
            }
            Err(e) => {
                tracing::warn!(from = %from, to = %to, code = e.code(), "Emergency transfer rejected");
            }
        }

        let amount = result.as_ref().map(|r| r.amount).unwrap_or_default();
        self.finish(
            "emergency_transfer",
            result.map(|receipt| LedgerEvent::EmergencyTransfer {
                from: receipt.from,
                to: receipt.to,
                amount: receipt.amount,
            }),
        )?;
        Ok(amount)
    }

    /// Record the outcome of an entry point and publish its event on success.
    ///
    /// Called with the store lock held.
    fn finish(&self, operation: &'static str, result: TokenResult<LedgerEvent>) -> TokenResult<()> {
        match result {
            Ok(event) => {
                metrics::record_operation(operation, "ok");
                tracing::debug!(operation, kind = event.kind(), event = ?event, "Ledger state committed");
                // No subscribers is not an error.
                let _ = self.events.send(event);
                Ok(())
            }
            Err(e) => {
                metrics::record_operation(operation, e.code());
                tracing::debug!(operation, error = %e, "Ledger operation rejected");
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("symbol", &self.metadata.symbol)
            .field("chain_id", &self.verifier.chain_id())
            .field("contract", &self.verifier.verifying_contract())
            .finish()
    }
}

fn verifier_from_config(config: &NodeConfig) -> Result<SignatureVerifier, String> {
    let contract = config.domain.parsed_verifying_contract()?;
    Ok(SignatureVerifier::new(
        config.domain.name.clone(),
        config.domain.version.clone(),
        config.domain.chain_id,
        contract,
    ))
}

fn metadata_from_config(config: &NodeConfig) -> TokenMetadata {
    TokenMetadata {
        name: config.token.name.clone(),
        symbol: config.token.symbol.clone(),
        decimals: config.token.decimals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::clock::ManualClock;
    use crate::token::types::TokenError;
    use alloy::signers::local::PrivateKeySigner;
    use alloy::signers::SignerSync;

    const NOW: u64 = 1_700_000_000;

    fn token() -> Token {
        Token::deploy(
            TokenMetadata::default(),
            SignatureVerifier::new("DevonRexBackup", "1", 31337, Address::repeat_byte(0xc0)),
            Address::repeat_byte(0x01),
            U256::from(1_000_000),
            Arc::new(ManualClock::new(NOW)),
        )
        .unwrap()
    }

    #[test]
    fn test_transfer_emits_event() {
        let token = token();
        let mut rx = token.subscribe();

        token
            .transfer(Address::repeat_byte(0x01), Address::repeat_byte(0x02), U256::from(10))
            .unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            LedgerEvent::Transfer {
                from: Address::repeat_byte(0x01),
                to: Address::repeat_byte(0x02),
                value: U256::from(10)
            }
        );
    }

    #[test]
    fn test_failed_call_emits_nothing() {
        let token = token();
        let mut rx = token.subscribe();

        let err = token
            .transfer(Address::repeat_byte(0x02), Address::repeat_byte(0x03), U256::from(1))
            .unwrap_err();
        assert_eq!(err.code(), "ERC20_INSUFFICIENT_BALANCE");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_set_backup_event_carries_previous() {
        let token = token();
        let owner = Address::repeat_byte(0x01);
        token.set_backup(owner, Address::repeat_byte(0x0a)).unwrap();

        let mut rx = token.subscribe();
        token.set_backup(owner, Address::repeat_byte(0x0b)).unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            LedgerEvent::BackupChanged {
                account: owner,
                previous: Some(Address::repeat_byte(0x0a)),
                backup: Address::repeat_byte(0x0b)
            }
        );
        assert_eq!(token.backup_of(owner), Some(Address::repeat_byte(0x0b)));
    }

    #[test]
    fn test_emergency_transfer_returns_amount() {
        let token = token();
        let owner = Address::repeat_byte(0x01);
        let rescue = Address::repeat_byte(0x0e);
        let backup = PrivateKeySigner::random();
        token.set_backup(owner, backup.address()).unwrap();

        let deadline = U256::from(NOW + 3600);
        let digest = token
            .verifier()
            .digest(&EmergencyTransferMessage::new(owner, rescue, deadline));
        let signature: RecoverySignature = backup.sign_hash_sync(&digest).unwrap().into();

        let mut rx = token.subscribe();
        let amount = token
            .emergency_transfer(signature, owner, rescue, deadline)
            .unwrap();

        assert_eq!(amount, U256::from(1_000_000));
        assert!(token.is_blacklisted(owner));
        assert!(matches!(
            rx.try_recv().unwrap(),
            LedgerEvent::EmergencyTransfer { .. }
        ));
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let token = token();
        token
            .transfer(Address::repeat_byte(0x01), Address::repeat_byte(0x02), U256::from(7))
            .unwrap();

        let mut config = NodeConfig::default();
        config.domain.verifying_contract = Address::repeat_byte(0xc0).to_string();

        let restored =
            Token::restore(&config, token.snapshot(), Arc::new(ManualClock::new(NOW))).unwrap();
        assert_eq!(restored.balance_of(Address::repeat_byte(0x02)), U256::from(7));
        assert_eq!(restored.total_supply(), token.total_supply());
    }

    #[test]
    fn test_restore_rejects_other_domain() {
        let token = token();
        let config = NodeConfig::default();

        let err = Token::restore(&config, token.snapshot(), Arc::new(ManualClock::new(NOW)))
            .unwrap_err();
        assert!(matches!(err, SnapshotError::DomainMismatch { .. }));
    }

    #[test]
    fn test_from_config() {
        let token = Token::from_config(&NodeConfig::default(), Arc::new(ManualClock::new(NOW)))
            .unwrap();
        assert_eq!(token.metadata().symbol, "DRX");
        assert_eq!(token.verifier().chain_id(), 31337);
    }

    #[test]
    fn test_from_config_reports_typed_errors() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(NOW));

        let mut config = NodeConfig::default();
        config.token.initial_holder = "not-an-address".to_string();
        let err = Token::from_config(&config, clock.clone()).err().unwrap();
        assert!(matches!(err, DeployError::Config(ref m) if m.contains("initial_holder")));

        let mut config = NodeConfig::default();
        config.token.initial_holder = Address::ZERO.to_string();
        let err = Token::from_config(&config, clock).err().unwrap();
        assert_eq!(
            err,
            DeployError::Token(TokenError::ZeroAddress("mint recipient"))
        );
    }

    #[test]
    fn test_concurrent_events_arrive_in_commit_order() {
        let token = Arc::new(token());
        let owner = Address::repeat_byte(0x01);
        let mut rx = token.subscribe();

        let workers: Vec<_> = (1u8..=8)
            .map(|i| {
                let token = token.clone();
                std::thread::spawn(move || {
                    for j in 0u8..16 {
                        let backup = Address::repeat_byte(i * 16 + j);
                        token.set_backup(owner, backup).unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        // Each event's `previous` is the backup set by the event before it.
        let mut last = None;
        let mut count = 0;
        while let Ok(event) = rx.try_recv() {
            match event {
                LedgerEvent::BackupChanged { previous, backup, .. } => {
                    assert_eq!(previous, last);
                    last = Some(backup);
                    count += 1;
                }
                other => panic!("unexpected event {:?}", other),
            }
        }
        assert_eq!(count, 128);
        assert_eq!(last, token.backup_of(owner));
    }
}
