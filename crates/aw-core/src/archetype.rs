//! Creature archetypes and the material → creature bestiary.
//!
//! An archetype is the base creature before a rarity prefix is applied.
//! Each one is summoned by exactly one material; the [`Bestiary`] resolves
//! that mapping.

use serde::{Deserialize, Serialize};

use crate::error::{TableError, TableResult};

/// Rank reserved for the special low-tier creature whose attack is a flat
/// small range instead of the rank curve.
pub const SPECIAL_RANK: u32 = 0;

/// A base creature type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archetype {
    /// Display name of the creature.
    pub name: String,
    /// The material that summons this creature.
    pub material: String,
    /// Hit points before the prefix multiplier.
    pub base_hp: u32,
    /// Speed used for turn ordering before the prefix multiplier.
    pub base_speed: f64,
    /// Difficulty rank; drives the enemy attack curve.
    pub rank: u32,
}

impl Archetype {
    /// Returns true if this archetype uses the flat special attack range.
    pub fn is_special(&self) -> bool {
        self.rank == SPECIAL_RANK
    }
}

/// Lookup table from materials to creature archetypes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bestiary {
    archetypes: Vec<Archetype>,
}

impl Bestiary {
    /// Build a bestiary from a list of archetypes.
    pub fn new(archetypes: Vec<Archetype>) -> Self {
        Self { archetypes }
    }

    /// Resolve the archetype summoned by a material.
    pub fn by_material(&self, material: &str) -> TableResult<&Archetype> {
        self.archetypes
            .iter()
            .find(|a| a.material == material)
            .ok_or_else(|| TableError::UnmappedMaterial(material.to_string()))
    }

    /// Look up an archetype by creature name (case-insensitive).
    pub fn by_name(&self, name: &str) -> Option<&Archetype> {
        let lower = name.to_lowercase();
        self.archetypes
            .iter()
            .find(|a| a.name.to_lowercase() == lower)
    }

    /// All archetypes in table order.
    pub fn archetypes(&self) -> &[Archetype] {
        &self.archetypes
    }

    /// Number of archetypes.
    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    /// Whether the bestiary is empty.
    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    /// Check that materials are unique and every creature has hit points.
    pub fn validate(&self) -> TableResult<()> {
        for (i, a) in self.archetypes.iter().enumerate() {
            if a.base_hp == 0 {
                return Err(TableError::Invalid(format!(
                    "creature \"{}\" has zero base hp",
                    a.name
                )));
            }
            if self.archetypes[..i].iter().any(|b| b.material == a.material) {
                return Err(TableError::Invalid(format!(
                    "material \"{}\" summons more than one creature",
                    a.material
                )));
            }
        }
        Ok(())
    }
}
