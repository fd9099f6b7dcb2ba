//! The complete set of lookup tables an encounter is built from.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::archetype::Bestiary;
use crate::companion::CompanionCatalog;
use crate::error::TableResult;
use crate::prefix::PrefixTable;
use crate::preset;

/// Bestiary, prefixes, and companion catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameTables {
    /// Material → creature mapping.
    pub bestiary: Bestiary,
    /// Rarity prefixes.
    pub prefixes: PrefixTable,
    /// Companion templates and stat curves.
    pub companions: CompanionCatalog,
}

impl GameTables {
    /// The tables the game ships with.
    pub fn standard() -> Self {
        preset::standard()
    }

    /// Decode tables from JSON and validate them.
    pub fn from_json(json: &str) -> TableResult<Self> {
        let tables: Self = serde_json::from_str(json)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Read and decode a JSON table file.
    pub fn from_path(path: &Path) -> TableResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize the tables as pretty JSON.
    pub fn to_json(&self) -> TableResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate every table.
    pub fn validate(&self) -> TableResult<()> {
        self.bestiary.validate()?;
        self.prefixes.validate()?;
        Ok(())
    }
}
