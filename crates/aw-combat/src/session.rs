//! The encounter aggregate.
//!
//! A [`CombatSession`] is created by the
//! [`EncounterFactory`](crate::factory::EncounterFactory) and mutated only
//! through [`act`](CombatSession::act), [`step`](CombatSession::step) and
//! [`flee`](CombatSession::flee). Every rejected call leaves the session
//! untouched.

use std::fmt;

use aw_core::{Archetype, CompanionId, CompanionStats, CompanionTemplate, PartyMember, Prefix};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::combatant::{Combatant, HitPoints, Vitality};
use crate::config::BalanceConfig;
use crate::error::{CombatError, CombatResult};
use crate::ledger::{Buff, MoraleAndBuffLedger};
use crate::log::{CombatEvent, CombatEventKind, CombatLog};
use crate::resolver::{self, TurnAction, TurnReport};
use crate::reward::{RewardCalculator, RewardDescriptor};
use crate::rng::CombatRng;
use crate::sequencer::TurnSequencer;

/// The state an encounter is in. Exactly one holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Still being fought.
    InProgress,
    /// The enemy fell.
    Victory,
    /// The player and every companion fell.
    Defeat,
    /// The player ran before attacking.
    Fled,
}

impl Outcome {
    /// True for every state except [`Outcome::InProgress`].
    pub fn is_terminal(self) -> bool {
        self != Self::InProgress
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => write!(f, "in progress"),
            Self::Victory => write!(f, "victory"),
            Self::Defeat => write!(f, "defeat"),
            Self::Fled => write!(f, "fled"),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EnemyState {
    pub(crate) name: String,
    pub(crate) archetype: Archetype,
    pub(crate) prefix: Prefix,
    pub(crate) hp: HitPoints,
    pub(crate) speed: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct PlayerState {
    pub(crate) skill: u32,
    pub(crate) accessory_tier: u32,
    pub(crate) hp: HitPoints,
}

#[derive(Debug, Clone)]
pub(crate) struct CompanionState {
    pub(crate) template: CompanionTemplate,
    pub(crate) member: PartyMember,
    pub(crate) stats: CompanionStats,
    pub(crate) hp: HitPoints,
}

impl CompanionState {
    pub(crate) fn id(&self) -> &CompanionId {
        &self.member.id
    }
}

/// One exploration encounter between the player's party and a creature.
pub struct CombatSession {
    pub(crate) id: Uuid,
    pub(crate) resource: String,
    pub(crate) enemy: EnemyState,
    pub(crate) player: PlayerState,
    pub(crate) companions: Vec<CompanionState>,
    pub(crate) ledger: MoraleAndBuffLedger,
    pub(crate) turns: TurnSequencer,
    pub(crate) can_flee: bool,
    pub(crate) auto_mode: bool,
    pub(crate) outcome: Outcome,
    pub(crate) resource_consumed: bool,
    pub(crate) reward: Option<RewardDescriptor>,
    pub(crate) log: CombatLog,
    pub(crate) config: BalanceConfig,
    pub(crate) rng: Box<dyn CombatRng>,
}

impl fmt::Debug for CombatSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombatSession")
            .field("id", &self.id)
            .field("enemy", &self.enemy.name)
            .field("round", &self.turns.round())
            .field("turn", self.turns.current())
            .field("outcome", &self.outcome)
            .field("log_events", &self.log.len())
            .finish()
    }
}

impl CombatSession {
    pub(crate) fn new(
        resource: String,
        enemy: EnemyState,
        player: PlayerState,
        companions: Vec<CompanionState>,
        config: BalanceConfig,
        rng: Box<dyn CombatRng>,
    ) -> Self {
        let ledger =
            MoraleAndBuffLedger::new(companions.iter().map(|c| c.id()), config.starting_morale);
        let speeds: Vec<(CompanionId, f64)> = companions
            .iter()
            .map(|c| (c.id().clone(), c.stats.speed))
            .collect();
        let turns = TurnSequencer::by_speed(enemy.speed, &speeds);
        let log = CombatLog::new(config.max_log_events);

        let mut session = Self {
            id: Uuid::new_v4(),
            resource,
            enemy,
            player,
            companions,
            ledger,
            turns,
            can_flee: true,
            auto_mode: false,
            outcome: Outcome::InProgress,
            resource_consumed: false,
            reward: None,
            log,
            config,
            rng,
        };
        session.log_opening();
        session
    }

    fn log_opening(&mut self) {
        let enemy = self.enemy.name.clone();
        let enemy_max_hp = self.enemy.hp.max;
        self.record(
            CombatEventKind::EncounterStarted {
                enemy: enemy.clone(),
                enemy_max_hp,
            },
            format!("A wild {enemy} appears! ({enemy_max_hp} HP)"),
        );
        let joined: Vec<(CompanionId, u32)> = self
            .companions
            .iter()
            .map(|c| (c.id().clone(), c.stats.level))
            .collect();
        for (companion, level) in joined {
            self.record(
                CombatEventKind::CompanionJoined {
                    companion: companion.clone(),
                    level,
                },
                format!("{companion} (Lv.{level}) joins the fight."),
            );
        }
        let order = self.turns.order().to_vec();
        let names: Vec<String> = order.iter().map(|c| self.display_name(c)).collect();
        self.record(
            CombatEventKind::TurnOrderSet { order },
            format!("Turn order: {}", names.join(" → ")),
        );
    }

    // --- Queries ---

    /// Session id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The material that summoned the enemy.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Enemy display name, `"<prefix> <archetype>"`.
    pub fn enemy_name(&self) -> &str {
        &self.enemy.name
    }

    /// The enemy's base creature.
    pub fn archetype(&self) -> &Archetype {
        &self.enemy.archetype
    }

    /// The rarity prefix drawn for the enemy.
    pub fn prefix(&self) -> &Prefix {
        &self.enemy.prefix
    }

    /// Enemy hit points.
    pub fn enemy_hp(&self) -> HitPoints {
        self.enemy.hp
    }

    /// Enemy speed after the prefix.
    pub fn enemy_speed(&self) -> f64 {
        self.enemy.speed
    }

    /// Player hit points.
    pub fn player_hp(&self) -> HitPoints {
        self.player.hp
    }

    /// A companion's hit points.
    pub fn companion_hp(&self, id: &CompanionId) -> Option<HitPoints> {
        self.companion(id).map(|c| c.hp)
    }

    /// A companion's current stat block.
    pub fn companion_stats(&self, id: &CompanionId) -> Option<CompanionStats> {
        self.companion(id).map(|c| c.stats)
    }

    /// Companion ids in roster order.
    pub fn roster(&self) -> Vec<CompanionId> {
        self.companions.iter().map(|c| c.id().clone()).collect()
    }

    /// A combatant's vitality, if it is part of this encounter.
    pub fn vitality(&self, combatant: &Combatant) -> Option<Vitality> {
        match combatant {
            Combatant::Player => Some(self.player.hp.vitality()),
            Combatant::Enemy => Some(self.enemy.hp.vitality()),
            Combatant::Companion(id) => self.companion_hp(id).map(|hp| hp.vitality()),
        }
    }

    /// A companion's morale.
    pub fn morale(&self, id: &CompanionId) -> u32 {
        self.ledger.morale(id)
    }

    /// A companion's active buffs.
    pub fn buffs(&self, id: &CompanionId) -> &[Buff] {
        self.ledger.buffs(id)
    }

    /// Morale and buffs for every companion.
    pub fn ledger(&self) -> &MoraleAndBuffLedger {
        &self.ledger
    }

    /// Whose turn it is.
    pub fn turn(&self) -> &Combatant {
        self.turns.current()
    }

    /// Index of the current slot in the turn order.
    pub fn turn_index(&self) -> usize {
        self.turns.index()
    }

    /// The fixed turn order.
    pub fn turn_order(&self) -> &[Combatant] {
        self.turns.order()
    }

    /// Current round, starting at 1.
    pub fn round(&self) -> u32 {
        self.turns.round()
    }

    /// True until the player's first attack.
    pub fn can_flee(&self) -> bool {
        self.can_flee
    }

    /// True once the player has attacked; the player slot then resolves
    /// on [`step`](Self::step).
    pub fn auto_mode(&self) -> bool {
        self.auto_mode
    }

    /// The current outcome.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// True once the encounter is over.
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// True if the next call must be a player action.
    pub fn awaiting_player_input(&self) -> bool {
        !self.is_terminal()
            && *self.turns.current() == Combatant::Player
            && !self.auto_mode
            && !self.player.hp.is_down()
    }

    /// Whether the summoning resource has been consumed.
    pub fn resource_consumed(&self) -> bool {
        self.resource_consumed
    }

    /// Record that the summoning resource has been consumed.
    pub fn mark_resource_consumed(&mut self) {
        self.resource_consumed = true;
    }

    /// The reward descriptor, once victorious.
    pub fn reward(&self) -> Option<&RewardDescriptor> {
        self.reward.as_ref()
    }

    /// The combat log.
    pub fn log(&self) -> &CombatLog {
        &self.log
    }

    /// The balance settings in effect.
    pub fn config(&self) -> &BalanceConfig {
        &self.config
    }

    // --- Actions ---

    /// Resolve the turn of `actor`, which must hold the current turn.
    pub fn act(&mut self, actor: &Combatant) -> CombatResult<TurnReport> {
        if self.is_terminal() {
            return Err(CombatError::invalid(format!(
                "encounter already ended ({})",
                self.outcome
            )));
        }
        if self.turns.current() != actor {
            return Err(CombatError::invalid(format!(
                "it is {}'s turn, not {}",
                self.turns.current(),
                actor
            )));
        }

        let action = match actor {
            Combatant::Player => resolver::player::resolve(self),
            Combatant::Companion(id) => resolver::companion::resolve(self, id)?,
            Combatant::Enemy => resolver::enemy::resolve(self),
        };
        debug!(
            session = %self.id,
            round = self.turns.round(),
            actor = %actor,
            ?action,
            "turn resolved"
        );
        self.finish_turn();

        Ok(TurnReport {
            actor: actor.clone(),
            action,
            outcome: self.outcome,
        })
    }

    /// Player attack. Valid only on the player's turn.
    pub fn attack(&mut self) -> CombatResult<TurnReport> {
        self.act(&Combatant::Player)
    }

    /// Resolve whoever holds the current turn. The player slot only
    /// resolves in auto mode or while the player is down.
    pub fn step(&mut self) -> CombatResult<TurnReport> {
        if self.awaiting_player_input() {
            return Err(CombatError::invalid("awaiting player input"));
        }
        let actor = self.turns.current().clone();
        self.act(&actor)
    }

    /// Step until the encounter ends, the player must act, or `max_turns`
    /// turns have resolved.
    pub fn run_until_settled(&mut self, max_turns: usize) -> Vec<TurnReport> {
        let mut reports = Vec::new();
        while reports.len() < max_turns && !self.is_terminal() && !self.awaiting_player_input() {
            match self.step() {
                Ok(report) => reports.push(report),
                Err(_) => break,
            }
        }
        reports
    }

    /// Run away. Valid only before the player's first attack.
    pub fn flee(&mut self) -> CombatResult<()> {
        if self.is_terminal() {
            return Err(CombatError::invalid(format!(
                "encounter already ended ({})",
                self.outcome
            )));
        }
        if !self.can_flee {
            return Err(CombatError::invalid("cannot flee after attacking"));
        }
        self.can_flee = false;
        self.outcome = Outcome::Fled;
        self.record(CombatEventKind::Fled, "You fled from the battle!");
        info!(session = %self.id, enemy = %self.enemy.name, "party fled");
        Ok(())
    }

    // --- Internals shared with the resolvers ---

    pub(crate) fn record(&mut self, kind: CombatEventKind, description: impl Into<String>) {
        self.record_at(self.turns.round(), kind, description);
    }

    fn record_at(&mut self, round: u32, kind: CombatEventKind, description: impl Into<String>) {
        self.log.push(CombatEvent::new(round, kind, description));
    }

    pub(crate) fn display_name(&self, combatant: &Combatant) -> String {
        match combatant {
            Combatant::Enemy => self.enemy.name.clone(),
            other => other.to_string(),
        }
    }

    fn companion(&self, id: &CompanionId) -> Option<&CompanionState> {
        self.companions.iter().find(|c| c.id() == id)
    }

    pub(crate) fn companion_index(&self, id: &CompanionId) -> Option<usize> {
        self.companions.iter().position(|c| c.id() == id)
    }

    pub(crate) fn cannot_act(&mut self, combatant: Combatant) -> TurnAction {
        let description = format!("{} is down and cannot act.", self.display_name(&combatant));
        self.record(CombatEventKind::CannotAct { combatant }, description);
        TurnAction::CannotAct
    }

    fn party_wiped(&self) -> bool {
        self.player.hp.is_down() && self.companions.iter().all(|c| c.hp.is_down())
    }

    fn finish_turn(&mut self) {
        if self.enemy.hp.is_down() {
            self.conclude_victory();
            return;
        }
        if self.party_wiped() {
            self.outcome = Outcome::Defeat;
            self.record(CombatEventKind::Defeat, "Your party has fallen...");
            info!(session = %self.id, enemy = %self.enemy.name, "party defeated");
            return;
        }

        let closing_round = self.turns.round();
        let advance = self.turns.advance(&mut self.ledger);
        for expired in advance.expired {
            let description = format!(
                "{}'s {} effect has worn off.",
                expired.companion, expired.buff.source
            );
            self.record_at(
                closing_round,
                CombatEventKind::BuffExpired {
                    companion: expired.companion,
                    kind: expired.buff.kind,
                    source: expired.buff.source,
                },
                description,
            );
        }
        if advance.round_ended {
            let round = self.turns.round();
            self.record(
                CombatEventKind::RoundStarted { round },
                format!("Round {round} begins."),
            );
        }
    }

    fn conclude_victory(&mut self) {
        let max_hp = self.enemy.hp.max;
        let currency =
            RewardCalculator::currency(max_hp, self.enemy.prefix.reward_multiplier, self.rng.as_mut());
        let gained = RewardCalculator::experience_for(max_hp);

        let mut experience = Vec::with_capacity(self.companions.len());
        for companion in &mut self.companions {
            let progress =
                RewardCalculator::apply_experience(&companion.template, &companion.member, gained);
            companion.member.level = progress.level;
            companion.member.experience = progress.experience;
            companion.stats = progress.stats;
            experience.push(progress);
        }

        self.outcome = Outcome::Victory;
        let enemy = self.enemy.name.clone();
        self.record(
            CombatEventKind::Victory {
                currency: currency.amount,
            },
            format!("Victory! {enemy} defeated. Earned {} currency.", currency.amount),
        );
        for progress in &experience {
            self.record(
                CombatEventKind::ExperienceGained {
                    companion: progress.companion.clone(),
                    amount: progress.gained,
                },
                format!("{} gained {} EXP.", progress.companion, progress.gained),
            );
            for &level in &progress.level_ups {
                self.record(
                    CombatEventKind::LevelUp {
                        companion: progress.companion.clone(),
                        level,
                    },
                    format!("{} reached level {level}!", progress.companion),
                );
            }
        }
        info!(
            session = %self.id,
            enemy = %enemy,
            currency = currency.amount,
            rounds = self.turns.round(),
            "enemy defeated"
        );
        self.reward = Some(RewardDescriptor {
            currency,
            experience,
        });
    }

    /// A serializable view of the whole session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            resource: self.resource.clone(),
            enemy: EnemySnapshot {
                name: self.enemy.name.clone(),
                archetype: self.enemy.archetype.name.clone(),
                prefix: self.enemy.prefix.name.clone(),
                rank: self.enemy.archetype.rank,
                hp: self.enemy.hp,
                speed: self.enemy.speed,
            },
            player: PlayerSnapshot {
                skill: self.player.skill,
                accessory_tier: self.player.accessory_tier,
                hp: self.player.hp,
            },
            companions: self
                .companions
                .iter()
                .map(|c| CompanionSnapshot {
                    id: c.id().clone(),
                    level: c.member.level,
                    experience: c.member.experience,
                    hp: c.hp,
                    attack: c.stats.attack,
                    speed: c.stats.speed,
                    morale: self.ledger.morale(c.id()),
                    buffs: self.ledger.buffs(c.id()).to_vec(),
                    has_ability: c.template.ability.is_some(),
                    ability_ready: c.template.ability.is_some()
                        && self.ledger.ability_ready(c.id()),
                })
                .collect(),
            turn_order: self.turns.order().to_vec(),
            turn_index: self.turns.index(),
            turn: self.turns.current().clone(),
            round: self.turns.round(),
            can_flee: self.can_flee,
            auto_mode: self.auto_mode,
            outcome: self.outcome,
            resource_consumed: self.resource_consumed,
            reward: self.reward.clone(),
        }
    }
}

/// Serializable view of a [`CombatSession`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Session id.
    pub id: Uuid,
    /// The material that summoned the enemy.
    pub resource: String,
    /// The enemy.
    pub enemy: EnemySnapshot,
    /// The player.
    pub player: PlayerSnapshot,
    /// Companions in roster order.
    pub companions: Vec<CompanionSnapshot>,
    /// The fixed turn order.
    pub turn_order: Vec<Combatant>,
    /// Index of the current slot.
    pub turn_index: usize,
    /// Whose turn it is.
    pub turn: Combatant,
    /// Current round.
    pub round: u32,
    /// Whether fleeing is still allowed.
    pub can_flee: bool,
    /// Whether the player slot auto-resolves.
    pub auto_mode: bool,
    /// Current outcome.
    pub outcome: Outcome,
    /// Whether the summoning resource was consumed.
    pub resource_consumed: bool,
    /// Rewards, once victorious.
    pub reward: Option<RewardDescriptor>,
}

/// Enemy part of a [`SessionSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    /// Display name.
    pub name: String,
    /// Base creature name.
    pub archetype: String,
    /// Rarity prefix name.
    pub prefix: String,
    /// Archetype rank.
    pub rank: u32,
    /// Hit points.
    pub hp: HitPoints,
    /// Speed after the prefix.
    pub speed: f64,
}

/// Player part of a [`SessionSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Attacker skill rating.
    pub skill: u32,
    /// Equipped accessory tier.
    pub accessory_tier: u32,
    /// Hit points.
    pub hp: HitPoints,
}

/// Companion part of a [`SessionSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanionSnapshot {
    /// Which companion.
    pub id: CompanionId,
    /// Current level.
    pub level: u32,
    /// Banked experience.
    pub experience: u32,
    /// Hit points.
    pub hp: HitPoints,
    /// Attack stat.
    pub attack: u32,
    /// Speed stat.
    pub speed: f64,
    /// Morale.
    pub morale: u32,
    /// Active buffs.
    pub buffs: Vec<Buff>,
    /// Whether the companion has an ability to spend morale on.
    pub has_ability: bool,
    /// Whether the morale bar is full and there is an ability to fire.
    pub ability_ready: bool,
}
