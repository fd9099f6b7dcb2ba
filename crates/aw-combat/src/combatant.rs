//! Combatant identity and hit points.
//!
//! A combatant reaching 0 HP is marked [`Vitality::Down`] but keeps its
//! slot in the turn order and its place in the roster.

use std::fmt;

use aw_core::CompanionId;
use serde::{Deserialize, Serialize};

/// Who can hold a turn.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Combatant {
    /// The player character.
    Player,
    /// An allied companion.
    Companion(CompanionId),
    /// The hostile creature.
    Enemy,
}

impl Combatant {
    /// Shorthand for a companion combatant.
    pub fn companion(id: impl Into<CompanionId>) -> Self {
        Self::Companion(id.into())
    }

    /// The companion id, if this is a companion.
    pub fn companion_id(&self) -> Option<&CompanionId> {
        match self {
            Self::Companion(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for Combatant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "Player"),
            Self::Companion(id) => write!(f, "{id}"),
            Self::Enemy => write!(f, "Enemy"),
        }
    }
}

/// Whether a combatant can still act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vitality {
    /// Above 0 HP.
    Alive,
    /// At 0 HP.
    Down,
}

/// A hit point pool clamped to `0..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPoints {
    /// Current hit points.
    pub current: u32,
    /// Maximum hit points.
    pub max: u32,
}

impl HitPoints {
    /// A full pool.
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Remove up to `amount` hit points. Returns the amount actually removed.
    pub fn damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.current);
        self.current -= dealt;
        dealt
    }

    /// Restore up to `amount` hit points without exceeding max. Returns the
    /// amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max - self.current);
        self.current += restored;
        restored
    }

    /// Alive or Down.
    pub fn vitality(&self) -> Vitality {
        if self.current == 0 {
            Vitality::Down
        } else {
            Vitality::Alive
        }
    }

    /// True at 0 HP.
    pub fn is_down(&self) -> bool {
        self.vitality() == Vitality::Down
    }

    /// True at max HP.
    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    /// Fraction of max HP remaining (0.0 to 1.0).
    pub fn fraction(&self) -> f64 {
        if self.max == 0 {
            return 0.0;
        }
        f64::from(self.current) / f64::from(self.max)
    }
}

impl fmt::Display for HitPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.max)
    }
}
