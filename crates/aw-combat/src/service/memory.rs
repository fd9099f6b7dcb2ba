//! In-memory collaborators for tests and the command line.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use aw_core::{CompanionId, CompanionStats};
use tokio::sync::Mutex;

use super::{ResourceLedger, RewardVault};
use crate::error::{CombatError, CombatResult};
use crate::reward::CompanionProgress;

/// Take one pending failure, if any are queued.
fn take_failure(pending: &AtomicU32) -> bool {
    pending
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

/// Inventory held in memory.
///
/// Resources with a stock entry are limited to that stock; any other
/// resource can always be consumed.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    stock: Mutex<HashMap<String, u32>>,
    consumed: Mutex<HashMap<String, u32>>,
    failures: AtomicU32,
}

impl InMemoryLedger {
    /// An inventory with unlimited resources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit `resource` to `quantity`.
    pub fn with_stock(mut self, resource: impl Into<String>, quantity: u32) -> Self {
        self.stock.get_mut().insert(resource.into(), quantity);
        self
    }

    /// Make the next `count` calls fail.
    pub fn fail_next(&self, count: u32) {
        self.failures.store(count, Ordering::SeqCst);
    }

    /// How much of `resource` has been consumed.
    pub async fn consumed(&self, resource: &str) -> u32 {
        self.consumed.lock().await.get(resource).copied().unwrap_or(0)
    }

    /// Remaining stock of a limited resource.
    pub async fn stock(&self, resource: &str) -> Option<u32> {
        self.stock.lock().await.get(resource).copied()
    }
}

#[async_trait]
impl ResourceLedger for InMemoryLedger {
    async fn consume(&self, resource: &str, quantity: u32) -> CombatResult<()> {
        if take_failure(&self.failures) {
            return Err(CombatError::Persistence(format!(
                "inventory unavailable while consuming {resource}"
            )));
        }
        if let Some(left) = self.stock.lock().await.get_mut(resource) {
            if *left < quantity {
                return Err(CombatError::Persistence(format!(
                    "not enough {resource}: have {left}, need {quantity}"
                )));
            }
            *left -= quantity;
        }
        *self
            .consumed
            .lock()
            .await
            .entry(resource.to_string())
            .or_insert(0) += quantity;
        Ok(())
    }
}

/// Currency and companion progress held in memory.
#[derive(Debug, Default)]
pub struct InMemoryVault {
    currency: Mutex<u64>,
    companions: Mutex<HashMap<CompanionId, CompanionProgress>>,
    currency_grants: AtomicU32,
    failures: AtomicU32,
}

impl InMemoryVault {
    /// An empty vault.
    pub fn new() -> Self {
        Self::default()
    }

    /// A vault holding `currency` already.
    pub fn with_currency(currency: u64) -> Self {
        Self {
            currency: Mutex::new(currency),
            ..Self::default()
        }
    }

    /// Make the next `count` calls fail.
    pub fn fail_next(&self, count: u32) {
        self.failures.store(count, Ordering::SeqCst);
    }

    /// Current balance.
    pub async fn currency(&self) -> u64 {
        *self.currency.lock().await
    }

    /// Number of successful currency grants.
    pub fn currency_grants(&self) -> u32 {
        self.currency_grants.load(Ordering::SeqCst)
    }

    /// Last stored progress of a companion.
    pub async fn progress(&self, companion: &CompanionId) -> Option<CompanionProgress> {
        self.companions.lock().await.get(companion).cloned()
    }
}

#[async_trait]
impl RewardVault for InMemoryVault {
    async fn grant_currency(&self, amount: u64) -> CombatResult<u64> {
        if take_failure(&self.failures) {
            return Err(CombatError::Persistence("currency store unavailable".into()));
        }
        let mut currency = self.currency.lock().await;
        *currency += amount;
        self.currency_grants.fetch_add(1, Ordering::SeqCst);
        Ok(*currency)
    }

    async fn grant_companion_experience(
        &self,
        companion: &CompanionId,
        progress: &CompanionProgress,
    ) -> CombatResult<CompanionStats> {
        if take_failure(&self.failures) {
            return Err(CombatError::Persistence(format!(
                "companion store unavailable for {companion}"
            )));
        }
        self.companions
            .lock()
            .await
            .insert(companion.clone(), progress.clone());
        Ok(progress.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ledger_tracks_consumption() {
        let ledger = InMemoryLedger::new().with_stock("Dango", 2);
        ledger.consume("Dango", 1).await.unwrap();
        ledger.consume("Butter", 3).await.unwrap();
        assert_eq!(ledger.consumed("Dango").await, 1);
        assert_eq!(ledger.consumed("Butter").await, 3);
        assert_eq!(ledger.stock("Dango").await, Some(1));
    }

    #[tokio::test]
    async fn ledger_rejects_overdraw() {
        let ledger = InMemoryLedger::new().with_stock("Dango", 0);
        let err = ledger.consume("Dango", 1).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(ledger.consumed("Dango").await, 0);
    }

    #[tokio::test]
    async fn injected_failures_run_out() {
        let ledger = InMemoryLedger::new();
        ledger.fail_next(1);
        assert!(ledger.consume("Dango", 1).await.is_err());
        assert!(ledger.consume("Dango", 1).await.is_ok());
    }

    #[tokio::test]
    async fn vault_accumulates_currency() {
        let vault = InMemoryVault::with_currency(10);
        assert_eq!(vault.grant_currency(5).await.unwrap(), 15);
        assert_eq!(vault.currency().await, 15);
        assert_eq!(vault.currency_grants(), 1);
    }
}
