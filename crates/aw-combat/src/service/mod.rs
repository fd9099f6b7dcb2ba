//! Async driver owning sessions by id.
//!
//! The service is the only place the engine talks to the outside world:
//! it consumes the summoning resource through a [`ResourceLedger`] and
//! persists victory rewards through a [`RewardVault`]. Combat state is
//! always settled in memory before either call starts, so a failing
//! collaborator never rolls an outcome back.

mod memory;

pub use memory::{InMemoryLedger, InMemoryVault};

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use aw_core::{CompanionId, CompanionStats};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};
use uuid::Uuid;

use crate::combatant::Combatant;
use crate::error::{CombatError, CombatResult};
use crate::factory::{EncounterFactory, EncounterRequest};
use crate::log::CombatEvent;
use crate::resolver::TurnReport;
use crate::reward::CompanionProgress;
use crate::rng::CombatRng;
use crate::session::{CombatSession, Outcome, SessionSnapshot};

/// Consumes inventory resources.
#[async_trait]
pub trait ResourceLedger: Send + Sync {
    /// Remove `quantity` of `resource` from the player's inventory.
    async fn consume(&self, resource: &str, quantity: u32) -> CombatResult<()>;
}

/// Persists rewards.
#[async_trait]
pub trait RewardVault: Send + Sync {
    /// Add currency. Returns the new balance.
    async fn grant_currency(&self, amount: u64) -> CombatResult<u64>;

    /// Store a companion's new level and experience. Returns the stats at
    /// the stored level.
    async fn grant_companion_experience(
        &self,
        companion: &CompanionId,
        progress: &CompanionProgress,
    ) -> CombatResult<CompanionStats>;
}

/// What settlement persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// The encounter's outcome.
    pub outcome: Outcome,
    /// Currency balance after the grant, for victories.
    pub currency_total: Option<u64>,
    /// Stats confirmed for each companion, for victories.
    pub companions: Vec<(CompanionId, CompanionStats)>,
}

#[derive(Debug)]
struct ManagedSession {
    session: CombatSession,
    currency_total: Option<u64>,
    confirmed: Vec<(CompanionId, CompanionStats)>,
}

/// Owns live sessions and drives their external side effects.
pub struct ExplorationService<L, V> {
    factory: EncounterFactory,
    ledger: L,
    vault: V,
    seeds: Mutex<StdRng>,
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<ManagedSession>>>>,
}

impl<L: ResourceLedger, V: RewardVault> ExplorationService<L, V> {
    /// A service creating sessions with `factory`. Session RNGs are seeded
    /// from the factory's config seed.
    pub fn new(factory: EncounterFactory, ledger: L, vault: V) -> Self {
        let seeds = StdRng::seed_from_u64(factory.config().seed);
        Self {
            factory,
            ledger,
            vault,
            seeds: Mutex::new(seeds),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// The resource collaborator.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// The reward collaborator.
    pub fn vault(&self) -> &V {
        &self.vault
    }

    /// Number of sessions held.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Start an encounter and consume its summoning resource.
    pub async fn start(&self, request: EncounterRequest) -> CombatResult<Uuid> {
        let seed = self.seeds.lock().await.next_u64();
        self.start_with_rng(request, Box::new(StdRng::seed_from_u64(seed)))
            .await
    }

    /// Start an encounter drawing rolls from `rng`.
    ///
    /// If the resource cannot be consumed the session is discarded and
    /// the error returned.
    pub async fn start_with_rng(
        &self,
        request: EncounterRequest,
        rng: Box<dyn CombatRng>,
    ) -> CombatResult<Uuid> {
        let mut session = self.factory.create(&request, rng)?;
        if let Err(err) = self.ledger.consume(&request.material, 1).await {
            warn!(material = %request.material, error = %err, "could not consume resource");
            return Err(err);
        }
        session.mark_resource_consumed();

        let id = session.id();
        let managed = ManagedSession {
            session,
            currency_total: None,
            confirmed: Vec::new(),
        };
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(managed)));
        Ok(id)
    }

    async fn handle(&self, id: Uuid) -> CombatResult<Arc<Mutex<ManagedSession>>> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(CombatError::UnknownSession(id))
    }

    /// Resolve `actor`'s turn. Rejected if another action holds the session.
    pub async fn act(&self, id: Uuid, actor: &Combatant) -> CombatResult<TurnReport> {
        let handle = self.handle(id).await?;
        let mut managed = handle.try_lock().map_err(|_| busy())?;
        managed.session.act(actor)
    }

    /// Resolve whoever holds the current turn.
    pub async fn step(&self, id: Uuid) -> CombatResult<TurnReport> {
        let handle = self.handle(id).await?;
        let mut managed = handle.try_lock().map_err(|_| busy())?;
        managed.session.step()
    }

    /// Step until terminal, until player input is needed, or `max_turns`.
    pub async fn run_until_settled(
        &self,
        id: Uuid,
        max_turns: usize,
    ) -> CombatResult<Vec<TurnReport>> {
        let handle = self.handle(id).await?;
        let mut managed = handle.try_lock().map_err(|_| busy())?;
        Ok(managed.session.run_until_settled(max_turns))
    }

    /// Flee, consuming the resource if it has not been consumed yet.
    pub async fn flee(&self, id: Uuid) -> CombatResult<()> {
        let handle = self.handle(id).await?;
        let mut managed = handle.try_lock().map_err(|_| busy())?;
        managed.session.flee()?;
        self.consume_if_owed(&mut managed.session).await
    }

    async fn consume_if_owed(&self, session: &mut CombatSession) -> CombatResult<()> {
        if session.resource_consumed() {
            return Ok(());
        }
        let resource = session.resource().to_string();
        if let Err(err) = self.ledger.consume(&resource, 1).await {
            warn!(session = %session.id(), error = %err, "could not consume resource");
            return Err(err);
        }
        session.mark_resource_consumed();
        Ok(())
    }

    /// Persist a finished encounter's side effects.
    ///
    /// For a victory, grants the currency and every companion's progress.
    /// Each part is persisted at most once, so a failed settlement can be
    /// retried safely.
    pub async fn settle(&self, id: Uuid) -> CombatResult<Settlement> {
        let handle = self.handle(id).await?;
        let mut guard = handle.try_lock().map_err(|_| busy())?;
        let managed = &mut *guard;

        let outcome = managed.session.outcome();
        match outcome {
            Outcome::InProgress => Err(CombatError::invalid("encounter is still in progress")),
            Outcome::Fled | Outcome::Defeat => {
                self.consume_if_owed(&mut managed.session).await?;
                Ok(Settlement {
                    outcome,
                    currency_total: None,
                    companions: Vec::new(),
                })
            }
            Outcome::Victory => {
                let reward = managed
                    .session
                    .reward()
                    .cloned()
                    .ok_or_else(|| CombatError::invalid("victory has no reward"))?;

                if managed.currency_total.is_none() {
                    let total = self
                        .vault
                        .grant_currency(reward.currency.amount)
                        .await
                        .inspect_err(|err| {
                            warn!(session = %id, error = %err, "currency grant failed");
                        })?;
                    managed.currency_total = Some(total);
                }
                for progress in &reward.experience {
                    if managed.confirmed.iter().any(|(c, _)| c == &progress.companion) {
                        continue;
                    }
                    let stats = self
                        .vault
                        .grant_companion_experience(&progress.companion, progress)
                        .await
                        .inspect_err(|err| {
                            warn!(
                                session = %id,
                                companion = %progress.companion,
                                error = %err,
                                "experience grant failed"
                            );
                        })?;
                    managed.confirmed.push((progress.companion.clone(), stats));
                }

                info!(
                    session = %id,
                    currency = reward.currency.amount,
                    companions = managed.confirmed.len(),
                    "rewards settled"
                );
                Ok(Settlement {
                    outcome,
                    currency_total: managed.currency_total,
                    companions: managed.confirmed.clone(),
                })
            }
        }
    }

    /// Drop a session, finished or not. A live session forfeits its
    /// consumed resource. Returns its final state.
    pub async fn abandon(&self, id: Uuid) -> CombatResult<SessionSnapshot> {
        let handle = self
            .sessions
            .write()
            .await
            .remove(&id)
            .ok_or(CombatError::UnknownSession(id))?;
        let snapshot = handle.lock().await.session.snapshot();
        info!(session = %id, outcome = %snapshot.outcome, "session closed");
        Ok(snapshot)
    }

    /// Current state of a session.
    pub async fn snapshot(&self, id: Uuid) -> CombatResult<SessionSnapshot> {
        let handle = self.handle(id).await?;
        let managed = handle.lock().await;
        Ok(managed.session.snapshot())
    }

    /// A copy of a session's log.
    pub async fn log(&self, id: Uuid) -> CombatResult<Vec<CombatEvent>> {
        let handle = self.handle(id).await?;
        let managed = handle.lock().await;
        Ok(managed.session.log().events().to_vec())
    }
}

fn busy() -> CombatError {
    CombatError::invalid("action already in progress")
}
