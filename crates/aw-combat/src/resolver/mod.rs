//! Action resolution for each kind of combatant.
//!
//! Each resolver computes one actor's action and mutates the session; the
//! session then checks for a terminal state and advances the turn.

pub(crate) mod companion;
pub(crate) mod enemy;
pub(crate) mod player;

use aw_core::BuffKind;
use serde::{Deserialize, Serialize};

use crate::combatant::Combatant;
use crate::rng::CombatRng;
use crate::session::Outcome;

/// Damage dealt by one hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    /// Damage after the critical transform.
    pub damage: u32,
    /// Whether the hit was critical.
    pub critical: bool,
}

/// What an ability did when it fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AbilityOutcome {
    /// Amplified damage to the enemy.
    Damage {
        /// The hit.
        hit: Hit,
    },
    /// Damage plus a self buff.
    Empowered {
        /// The hit.
        hit: Hit,
        /// The buff applied or refreshed.
        buff: BuffKind,
    },
    /// A heal, or nothing if every ally was at full health.
    Healed {
        /// The healed ally.
        target: Option<Combatant>,
        /// HP restored.
        amount: u32,
    },
}

/// What the acting combatant did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnAction {
    /// A normal attack.
    Attack {
        /// Who was hit.
        target: Combatant,
        /// The hit.
        hit: Hit,
    },
    /// A companion ability.
    Ability {
        /// Ability name.
        name: String,
        /// Its effect.
        outcome: AbilityOutcome,
    },
    /// The slot belonged to a downed combatant.
    CannotAct,
}

/// The result of resolving one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Who held the turn.
    pub actor: Combatant,
    /// What happened.
    pub action: TurnAction,
    /// The encounter state after the turn.
    pub outcome: Outcome,
}

/// `floor(base · factor)`, never negative.
pub(crate) fn scale(base: f64, factor: f64) -> u32 {
    (base * factor).floor().max(0.0) as u32
}

/// Roll a critical hit: with probability `chance`, multiply damage by
/// `multiplier` and floor.
pub(crate) fn critical(damage: u32, chance: f64, multiplier: f64, rng: &mut dyn CombatRng) -> Hit {
    if rng.chance(chance) {
        Hit {
            damage: scale(f64::from(damage), multiplier),
            critical: true,
        }
    } else {
        Hit {
            damage,
            critical: false,
        }
    }
}

pub(crate) fn describe_hit(attacker: &str, target: &str, hit: Hit, remaining: u32) -> String {
    let crit = if hit.critical { " Critical hit!" } else { "" };
    format!(
        "{attacker} hits {target} for {} damage ({remaining} HP left).{crit}",
        hit.damage
    )
}
