//! Static game tables for Amberwake.
//!
//! Defines the data an exploration encounter is built from: which creature
//! a material summons, the rarity prefixes a creature can roll, and the
//! companions that can fight alongside the player. Tables can be built
//! programmatically, loaded from JSON, or taken from [`preset`].

/// Creature archetypes and the material bestiary.
pub mod archetype;
/// Companion catalog, abilities, and stat curves.
pub mod companion;
/// Error types used throughout the crate.
pub mod error;
/// Player stat curves.
pub mod player;
/// Rarity prefixes and weighted selection.
pub mod prefix;
/// Built-in tables.
pub mod preset;
/// The combined table set.
pub mod tables;

/// Re-export archetype types.
pub use archetype::{Archetype, Bestiary};
/// Re-export companion types.
pub use companion::{
    Ability, AbilityEffect, BuffKind, CompanionCatalog, CompanionId, CompanionStats,
    CompanionTemplate, PartyMember,
};
/// Re-export error types.
pub use error::{TableError, TableResult};
/// Re-export prefix types.
pub use prefix::{Prefix, PrefixTable};
/// Re-export the combined tables.
pub use tables::GameTables;
