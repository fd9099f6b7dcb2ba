use aw_core::{BuffKind, CompanionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::combatant::Combatant;

/// What kind of combat event occurred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CombatEventKind {
    // Setup
    /// The encounter was created.
    EncounterStarted {
        /// Display name of the enemy.
        enemy: String,
        /// The enemy's max hit points.
        enemy_max_hp: u32,
    },
    /// A companion joined the party.
    CompanionJoined {
        /// The companion.
        companion: CompanionId,
        /// Its level.
        level: u32,
    },
    /// The turn order was fixed.
    TurnOrderSet {
        /// Slots in order.
        order: Vec<Combatant>,
    },
    /// A new round began.
    RoundStarted {
        /// The new round number.
        round: u32,
    },

    // Actions
    /// A hit landed.
    Attack {
        /// Who attacked.
        attacker: Combatant,
        /// Who was hit.
        target: Combatant,
        /// Damage dealt.
        damage: u32,
        /// Whether the hit was critical.
        critical: bool,
        /// Target HP after the hit.
        remaining_hp: u32,
    },
    /// A companion spent its morale on an ability.
    AbilityUsed {
        /// The companion.
        companion: CompanionId,
        /// Ability name.
        ability: String,
    },
    /// An ability fired with nothing to affect.
    AbilityFizzled {
        /// The companion.
        companion: CompanionId,
    },
    /// Hit points were restored.
    Healed {
        /// Who healed.
        healer: Combatant,
        /// Who was healed.
        target: Combatant,
        /// HP restored.
        amount: u32,
        /// Target HP after the heal.
        hp: u32,
    },
    /// A buff was applied or refreshed.
    BuffApplied {
        /// The buffed companion.
        companion: CompanionId,
        /// Which stat.
        kind: BuffKind,
        /// Bonus size.
        magnitude: f64,
        /// Rounds it lasts.
        turns: u32,
    },
    /// A buff ran out.
    BuffExpired {
        /// The companion that held it.
        companion: CompanionId,
        /// Which stat.
        kind: BuffKind,
        /// The ability that granted it.
        source: String,
    },
    /// Morale rose after a hit.
    MoraleGained {
        /// The companion.
        companion: CompanionId,
        /// Morale after the gain.
        morale: u32,
    },
    /// A downed combatant's slot came up.
    CannotAct {
        /// The downed combatant.
        combatant: Combatant,
    },
    /// A combatant dropped to 0 HP.
    Downed {
        /// The downed combatant.
        combatant: Combatant,
    },

    // Resolution
    /// The enemy was defeated.
    Victory {
        /// Currency awarded.
        currency: u64,
    },
    /// A companion gained experience.
    ExperienceGained {
        /// The companion.
        companion: CompanionId,
        /// Experience awarded.
        amount: u32,
    },
    /// A companion reached a new level.
    LevelUp {
        /// The companion.
        companion: CompanionId,
        /// The level reached.
        level: u32,
    },
    /// The whole party fell.
    Defeat,
    /// The player ran away.
    Fled,
}

/// A record of something that happened during an encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatEvent {
    /// The round the event happened in.
    pub round: u32,
    /// The specific kind of event.
    pub kind: CombatEventKind,
    /// A human-readable description.
    pub description: String,
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
}

impl CombatEvent {
    /// Create an event stamped with the current time.
    pub fn new(round: u32, kind: CombatEventKind, description: impl Into<String>) -> Self {
        Self {
            round,
            kind,
            description: description.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered record of an encounter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatLog {
    events: Vec<CombatEvent>,
    max_events: usize,
}

impl CombatLog {
    /// Create a log with the given capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest if over capacity.
    pub fn push(&mut self, event: CombatEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    /// The most recent event.
    pub fn last(&self) -> Option<&CombatEvent> {
        self.events.last()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Export the log as plain text, one line per event grouped by round.
    pub fn export_text(&self) -> String {
        let mut out = String::from("Combat Log\n==========\n");
        let mut round = None;
        for event in &self.events {
            if round != Some(event.round) {
                out.push_str(&format!("\n--- Round {} ---\n", event.round));
                round = Some(event.round);
            }
            out.push_str(&format!("{}\n", event.description));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(round: u32, target: Combatant) -> CombatEvent {
        CombatEvent::new(
            round,
            CombatEventKind::Attack {
                attacker: Combatant::Enemy,
                target,
                damage: 5,
                critical: false,
                remaining_hp: 10,
            },
            "hit",
        )
    }

    #[test]
    fn push_and_query() {
        let mut log = CombatLog::new(0);
        log.push(hit(1, Combatant::Player));
        log.push(hit(2, Combatant::companion("Sil")));
        assert_eq!(log.len(), 2);
        assert!(!log.is_empty());
        assert_eq!(log.events()[1].round, 2);
        assert!(matches!(
            log.events()[1].kind,
            CombatEventKind::Attack { ref target, .. } if *target == Combatant::companion("Sil")
        ));
    }

    #[test]
    fn capacity_drops_oldest() {
        let mut log = CombatLog::new(2);
        for round in 1..=5 {
            log.push(hit(round, Combatant::Player));
        }
        assert_eq!(log.len(), 2);
        assert_eq!(log.events()[0].round, 4);
        assert_eq!(log.last().map(|e| e.round), Some(5));
    }

    #[test]
    fn export_text_groups_rounds() {
        let mut log = CombatLog::new(0);
        log.push(hit(1, Combatant::Player));
        log.push(hit(1, Combatant::Player));
        log.push(hit(2, Combatant::Player));
        let txt = log.export_text();
        assert!(txt.starts_with("Combat Log"));
        assert_eq!(txt.matches("--- Round").count(), 2);
        assert_eq!(txt.matches("hit\n").count(), 3);
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_string(&hit(1, Combatant::Player)).unwrap();
        assert!(json.contains(r#""type":"attack""#));
        assert!(json.contains("timestamp"));
    }
}
