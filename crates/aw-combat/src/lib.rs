//! Exploration combat engine for Amberwake.
//!
//! An encounter pits the player, and up to three companions, against one
//! creature summoned by a material. The [`EncounterFactory`] builds a
//! [`CombatSession`] from the [`aw_core::GameTables`]; the session is then
//! driven turn by turn with [`CombatSession::act`] or automatically with
//! [`CombatSession::step`]. [`ExplorationService`] owns sessions by id and
//! talks to the inventory and reward stores.
//!
//! ```
//! use aw_combat::{BalanceConfig, EncounterFactory, EncounterRequest, Outcome};
//! use aw_core::{GameTables, PartyMember};
//!
//! let factory = EncounterFactory::new(GameTables::standard(), BalanceConfig::default());
//! let request = EncounterRequest::new("Dango", 20).with_companion(PartyMember::new("Sil", 5));
//! let mut session = factory.create_seeded(&request).unwrap();
//! session.attack().unwrap();
//! session.run_until_settled(1_000);
//! assert_ne!(session.outcome(), Outcome::InProgress);
//! ```

/// Combatant identity and hit points.
pub mod combatant;
/// Balance configuration.
pub mod config;
/// Error types.
pub mod error;
/// Encounter creation.
pub mod factory;
/// Per-companion morale and buffs.
pub mod ledger;
/// The combat log.
pub mod log;
/// Action resolution.
pub mod resolver;
/// Victory rewards.
pub mod reward;
/// Injectable randomness.
pub mod rng;
/// Turn order and rounds.
pub mod sequencer;
/// The encounter aggregate.
pub mod session;
/// Async session driver and external collaborators.
pub mod service;

pub use combatant::{Combatant, HitPoints, Vitality};
pub use config::BalanceConfig;
pub use error::{CombatError, CombatResult};
pub use factory::{EncounterFactory, EncounterRequest};
pub use ledger::{Buff, MoraleAndBuffLedger};
pub use log::{CombatEvent, CombatEventKind, CombatLog};
pub use resolver::{AbilityOutcome, Hit, TurnAction, TurnReport};
pub use reward::{CompanionProgress, CurrencyReward, RewardCalculator, RewardDescriptor};
pub use rng::{CombatRng, ScriptedRng};
pub use sequencer::TurnSequencer;
pub use service::{
    ExplorationService, InMemoryLedger, InMemoryVault, ResourceLedger, RewardVault, Settlement,
};
pub use session::{CombatSession, Outcome, SessionSnapshot};
