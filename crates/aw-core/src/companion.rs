//! Companion catalog, abilities, and the level-based stat curve.
//!
//! A companion's stat block is a pure function of its template and level:
//! each stat grows linearly from its base value. Abilities are optional;
//! companions without one always fight with normal attacks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TableError, TableResult};

/// Maximum number of companions that can join one encounter.
pub const MAX_PARTY_SIZE: usize = 3;

/// Level cap for companions.
pub const MAX_LEVEL: u32 = 100;

/// Experience required to advance from `level` to the next level.
pub fn exp_to_next(level: u32) -> u32 {
    level * 50 + 50
}

/// Catalog key identifying a companion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanionId(String);

impl CompanionId {
    /// Create an id from a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The underlying name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CompanionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for CompanionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The stat a buff modifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffKind {
    /// Percentage bonus to the companion's attack stat.
    Attack,
    /// Flat bonus to the companion's critical-hit chance.
    Critical,
}

impl fmt::Display for BuffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attack => write!(f, "attack"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// What an ability does when it fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AbilityEffect {
    /// Amplified single-target damage.
    Strike {
        /// Multiplier on the attack stat.
        damage_multiplier: f64,
    },
    /// Damage at a reduced multiplier plus a timed self buff.
    Empower {
        /// Which stat the buff modifies.
        buff: BuffKind,
        /// Buff size: attack fraction (0.25 = +25%) or crit chance (0.20).
        magnitude: f64,
        /// Rounds the buff lasts.
        duration: u32,
        /// Multiplier on the attack stat for the accompanying hit.
        damage_multiplier: f64,
    },
    /// Heals the most injured living ally; deals no damage.
    Mend {
        /// Multiplier on the attack stat giving the heal amount.
        heal_multiplier: f64,
    },
}

/// A companion's unique special ability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    /// Display name; also tags the buffs it grants.
    pub name: String,
    /// The ability's effect.
    pub effect: AbilityEffect,
}

/// Base data for one companion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanionTemplate {
    /// Catalog key.
    pub id: CompanionId,
    /// Hit points at level 1.
    pub base_hp: u32,
    /// Attack at level 1.
    pub base_attack: u32,
    /// Speed at level 1.
    pub base_speed: f64,
    /// Hit points gained per level.
    pub growth_hp: u32,
    /// Attack gained per level.
    pub growth_attack: u32,
    /// Speed gained per level.
    pub growth_speed: f64,
    /// Special ability, if the companion has one.
    #[serde(default)]
    pub ability: Option<Ability>,
}

impl CompanionTemplate {
    /// Compute the stat block at a level (levels below 1 count as 1).
    pub fn stats_at(&self, level: u32) -> CompanionStats {
        let level = level.clamp(1, MAX_LEVEL);
        let steps = level - 1;
        CompanionStats {
            level,
            max_hp: self.base_hp + self.growth_hp * steps,
            attack: self.base_attack + self.growth_attack * steps,
            speed: self.base_speed + self.growth_speed * f64::from(steps),
        }
    }
}

/// A companion's derived stats at a given level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompanionStats {
    /// The level these stats were computed for.
    pub level: u32,
    /// Maximum hit points.
    pub max_hp: u32,
    /// Attack stat.
    pub attack: u32,
    /// Speed used for turn ordering.
    pub speed: f64,
}

/// A companion as the caller brings it into an encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyMember {
    /// Which companion.
    pub id: CompanionId,
    /// Current level.
    pub level: u32,
    /// Experience accumulated toward the next level.
    #[serde(default)]
    pub experience: u32,
}

impl PartyMember {
    /// A party member with no banked experience.
    pub fn new(id: impl Into<CompanionId>, level: u32) -> Self {
        Self {
            id: id.into(),
            level,
            experience: 0,
        }
    }

    /// Set banked experience.
    pub fn with_experience(mut self, experience: u32) -> Self {
        self.experience = experience;
        self
    }
}

/// All companions known to the game.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanionCatalog {
    companions: Vec<CompanionTemplate>,
}

impl CompanionCatalog {
    /// Build a catalog.
    pub fn new(companions: Vec<CompanionTemplate>) -> Self {
        Self { companions }
    }

    /// Look up a companion template.
    pub fn get(&self, id: &CompanionId) -> TableResult<&CompanionTemplate> {
        self.companions
            .iter()
            .find(|c| &c.id == id)
            .ok_or_else(|| TableError::UnknownCompanion(id.to_string()))
    }

    /// All templates in catalog order.
    pub fn companions(&self) -> &[CompanionTemplate] {
        &self.companions
    }

    /// Check that a party can enter an encounter: known companions, no
    /// duplicates, and no more than [`MAX_PARTY_SIZE`] members.
    pub fn validate_party(&self, party: &[PartyMember]) -> TableResult<()> {
        if party.len() > MAX_PARTY_SIZE {
            return Err(TableError::PartyTooLarge {
                max: MAX_PARTY_SIZE,
                got: party.len(),
            });
        }
        for (i, member) in party.iter().enumerate() {
            self.get(&member.id)?;
            if party[..i].iter().any(|m| m.id == member.id) {
                return Err(TableError::DuplicateCompanion(member.id.to_string()));
            }
        }
        Ok(())
    }
}
