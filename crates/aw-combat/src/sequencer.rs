//! Turn order and round progression.
//!
//! The order is fixed when the encounter is created: the player always
//! acts first, then the enemy and companions by descending speed. Wrapping
//! back to slot 0 closes a round, which is the only point buffs decay.

use aw_core::CompanionId;
use serde::{Deserialize, Serialize};

use crate::combatant::Combatant;
use crate::ledger::{ExpiredBuff, MoraleAndBuffLedger};

/// The result of moving to the next slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Advance {
    /// True if this advance closed a round.
    pub round_ended: bool,
    /// Buffs that ran out at the round boundary.
    pub expired: Vec<ExpiredBuff>,
}

/// Fixed turn order with the current slot and round counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnSequencer {
    order: Vec<Combatant>,
    index: usize,
    round: u32,
}

impl TurnSequencer {
    /// Build the order: player first, then the enemy and companions sorted
    /// by descending speed. Ties keep enemy-then-roster order.
    pub fn by_speed(enemy_speed: f64, companions: &[(CompanionId, f64)]) -> Self {
        let mut rest: Vec<(Combatant, f64)> = std::iter::once((Combatant::Enemy, enemy_speed))
            .chain(
                companions
                    .iter()
                    .map(|(id, speed)| (Combatant::Companion(id.clone()), *speed)),
            )
            .collect();
        // sort_by is stable, so equal speeds keep their insertion order
        rest.sort_by(|a, b| b.1.total_cmp(&a.1));

        let order = std::iter::once(Combatant::Player)
            .chain(rest.into_iter().map(|(c, _)| c))
            .collect();
        Self {
            order,
            index: 0,
            round: 1,
        }
    }

    /// Whose turn it is.
    pub fn current(&self) -> &Combatant {
        &self.order[self.index]
    }

    /// Index of the current slot.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Current round, starting at 1.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// All slots in order.
    pub fn order(&self) -> &[Combatant] {
        &self.order
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Always false; the player slot is always present.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Move to the next slot. Wrapping to slot 0 decays every buff in the
    /// ledger and increments the round.
    pub fn advance(&mut self, ledger: &mut MoraleAndBuffLedger) -> Advance {
        self.index = (self.index + 1) % self.order.len();
        if self.index != 0 {
            return Advance::default();
        }
        let expired = ledger.decay_round();
        self.round += 1;
        Advance {
            round_ended: true,
            expired,
        }
    }
}
