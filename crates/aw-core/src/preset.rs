//! The built-in tables the game ships with.
//!
//! These produce the same [`GameTables`] that the equivalent JSON file
//! would, without requiring one on disk.

use crate::archetype::{Archetype, Bestiary};
use crate::companion::{
    Ability, AbilityEffect, BuffKind, CompanionCatalog, CompanionId, CompanionTemplate,
};
use crate::prefix::{Prefix, PrefixTable};
use crate::tables::GameTables;

/// (creature, material, base hp, rank), ordered by rank.
const CREATURES: &[(&str, &str, u32, u32)] = &[
    ("Taco Octopus", "Octopus Leg", 15, 1),
    ("Grass Mackerel", "Mackerel Scale", 25, 2),
    ("Dumpling Carp", "Dango", 35, 3),
    ("Butter Squid", "Butter Shard", 55, 4),
    ("Soy Shrimp", "Soy Dish", 80, 5),
    ("Water Corn", "Corn Kernel", 115, 6),
    ("Sardine Pie", "Butter", 160, 7),
    ("Ice Shark", "Ice Shard", 215, 8),
    ("Squall Squid", "Squid Ink", 280, 9),
    ("Pine Turtle", "Century Pine", 355, 10),
    ("Ghost Fish", "Pepper", 440, 11),
    ("Phantom Fin", "Oyster", 525, 12),
    ("Bite Dog", "Hot Sauce", 640, 13),
    ("Pumpkin Whale", "Pumpkin Slice", 755, 14),
    ("Viking Clam", "Stamen", 880, 15),
    ("Angel Jelly", "Pretzel", 1015, 16),
    ("Devil Puffer", "Venom", 1160, 17),
    ("Seven-Star Eel", "Eel Tail", 1315, 18),
    ("Doctor Black", "Eisbein", 1480, 19),
    ("Sea Dragon", "Heaven's Serpent", 1655, 20),
    ("Mecha King Crab", "Claw", 1840, 21),
    ("Lamprey", "Isigny Butter", 2035, 22),
    ("Last Leaf", "Lavender Oil", 2240, 23),
    ("Ice Breeder", "Sherbet", 2455, 24),
    ("Sea God", "Magic Essence", 2680, 25),
    ("Pinky Fish", "Whipped Cream", 2915, 26),
    ("Cornopus", "Waffle Machine", 3160, 27),
    ("Deep One", "Verjus", 3415, 28),
    ("Cthulu", "Anchovy", 3680, 29),
    ("Stamen Lily", "Pink Mallow", 3955, 30),
    ("Damus", "Wild Garlic", 4240, 31),
    ("Guardian", "Grenouille", 4535, 32),
    ("Sun Starfish", "Cedar Plank", 4840, 33),
    ("Big Father Penguin", "Ceviche", 5155, 34),
    ("Crane Turtle", "Tapas", 5480, 35),
    ("Starfish", "Star Fragment", 100, 0),
];

/// The standard bestiary: 35 ranked creatures plus the special Starfish.
pub fn bestiary() -> Bestiary {
    Bestiary::new(
        CREATURES
            .iter()
            .map(|&(name, material, base_hp, rank)| Archetype {
                name: name.to_string(),
                material: material.to_string(),
                base_hp,
                base_speed: 25.0 + f64::from(rank) * 0.5,
                rank,
            })
            .collect(),
    )
}

/// The standard rarity prefixes.
pub fn prefixes() -> PrefixTable {
    let prefix = |name: &str, weight, hp, reward, speed| Prefix {
        name: name.to_string(),
        hp_multiplier: hp,
        reward_multiplier: reward,
        speed_multiplier: speed,
        weight,
    };
    PrefixTable::new(vec![
        prefix("Giant", 70, 1.0, 1.0, 1.0),
        prefix("Mutant", 20, 1.5, 1.5, 1.1),
        prefix("Abyssal", 7, 2.4, 3.0, 1.2),
        prefix("Deep-Dark", 3, 3.9, 5.0, 1.3),
    ])
}

/// The standard companion roster.
pub fn companions() -> CompanionCatalog {
    CompanionCatalog::new(vec![
        template(
            "Sil",
            (54, 9, 45.0),
            (10, 2),
            Some(Ability {
                name: "Bombard".to_string(),
                effect: AbilityEffect::Strike {
                    damage_multiplier: 1.5,
                },
            }),
        ),
        template(
            "Piena",
            (66, 8, 25.0),
            (12, 2),
            Some(Ability {
                name: "Steadfast Stance".to_string(),
                effect: AbilityEffect::Empower {
                    buff: BuffKind::Attack,
                    magnitude: 0.25,
                    duration: 3,
                    damage_multiplier: 1.0,
                },
            }),
        ),
        template(
            "Abigail",
            (46, 12, 40.0),
            (8, 3),
            Some(Ability {
                name: "Focus Fire".to_string(),
                effect: AbilityEffect::Empower {
                    buff: BuffKind::Critical,
                    magnitude: 0.20,
                    duration: 3,
                    damage_multiplier: 1.0,
                },
            }),
        ),
        template(
            "Chloe",
            (40, 14, 65.0),
            (6, 3),
            Some(Ability {
                name: "Ether Blessing".to_string(),
                effect: AbilityEffect::Mend {
                    heal_multiplier: 1.85,
                },
            }),
        ),
        template("Nahatra", (80, 11, 30.0), (14, 3), None),
        template("Rims & Berry", (60, 9, 50.0), (10, 2), None),
    ])
}

fn template(
    name: &str,
    (base_hp, base_attack, base_speed): (u32, u32, f64),
    (growth_hp, growth_attack): (u32, u32),
    ability: Option<Ability>,
) -> CompanionTemplate {
    CompanionTemplate {
        id: CompanionId::new(name),
        base_hp,
        base_attack,
        base_speed,
        growth_hp,
        growth_attack,
        growth_speed: 0.5,
        ability,
    }
}

/// All standard tables together.
pub fn standard() -> GameTables {
    GameTables {
        bestiary: bestiary(),
        prefixes: prefixes(),
        companions: companions(),
    }
}
