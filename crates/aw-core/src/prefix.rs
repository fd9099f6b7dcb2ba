//! Rarity prefixes and weighted selection.

use serde::{Deserialize, Serialize};

use crate::error::{TableError, TableResult};

/// A rarity modifier drawn once per encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prefix {
    /// Display name, prepended to the creature name.
    pub name: String,
    /// Multiplier on the archetype's base hit points.
    pub hp_multiplier: f64,
    /// Multiplier on the currency reward.
    pub reward_multiplier: f64,
    /// Multiplier on the archetype's base speed.
    #[serde(default = "unit_multiplier")]
    pub speed_multiplier: f64,
    /// Relative selection weight.
    pub weight: u32,
}

fn unit_multiplier() -> f64 {
    1.0
}

impl Prefix {
    /// Apply the hit point multiplier to a base value, rounding down.
    pub fn scale_hp(&self, base_hp: u32) -> u32 {
        (f64::from(base_hp) * self.hp_multiplier).floor() as u32
    }
}

/// The set of prefixes an encounter can draw from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrefixTable {
    prefixes: Vec<Prefix>,
}

impl PrefixTable {
    /// Build a prefix table.
    pub fn new(prefixes: Vec<Prefix>) -> Self {
        Self { prefixes }
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> u32 {
        self.prefixes.iter().map(|p| p.weight).sum()
    }

    /// Select a prefix from a uniform roll in `[0, 1)`.
    ///
    /// The roll is scaled by the total weight and walked through the
    /// cumulative weights. Rolls at or past the end fall back to the first
    /// prefix. Returns `None` only for an empty table.
    pub fn select(&self, roll: f64) -> Option<&Prefix> {
        let target = roll.clamp(0.0, 1.0) * f64::from(self.total_weight());
        let mut cumulative = 0.0;
        for prefix in &self.prefixes {
            cumulative += f64::from(prefix.weight);
            if target < cumulative {
                return Some(prefix);
            }
        }
        self.prefixes.first()
    }

    /// All prefixes in table order.
    pub fn prefixes(&self) -> &[Prefix] {
        &self.prefixes
    }

    /// Check that the table can be drawn from.
    pub fn validate(&self) -> TableResult<()> {
        if self.prefixes.is_empty() {
            return Err(TableError::Invalid("prefix table is empty".into()));
        }
        if self.total_weight() == 0 {
            return Err(TableError::Invalid("prefix weights sum to zero".into()));
        }
        if let Some(p) = self
            .prefixes
            .iter()
            .find(|p| p.hp_multiplier <= 0.0 || p.reward_multiplier < 0.0)
        {
            return Err(TableError::Invalid(format!(
                "prefix \"{}\" has a non-positive multiplier",
                p.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn prefix(name: &str, weight: u32, hp: f64) -> Prefix {
        Prefix {
            name: name.to_string(),
            hp_multiplier: hp,
            reward_multiplier: hp,
            speed_multiplier: 1.0,
            weight,
        }
    }

    fn table() -> PrefixTable {
        PrefixTable::new(vec![
            prefix("Giant", 70, 1.0),
            prefix("Mutant", 20, 1.5),
            prefix("Abyssal", 7, 2.4),
            prefix("Deep-Dark", 3, 3.9),
        ])
    }

    #[test]
    fn select_walks_cumulative_weights() {
        let t = table();
        assert_eq!(t.select(0.0).unwrap().name, "Giant");
        assert_eq!(t.select(0.6999).unwrap().name, "Giant");
        assert_eq!(t.select(0.71).unwrap().name, "Mutant");
        assert_eq!(t.select(0.95).unwrap().name, "Abyssal");
        assert_eq!(t.select(0.99).unwrap().name, "Deep-Dark");
    }

    #[test]
    fn select_falls_back_to_first() {
        assert_eq!(table().select(1.0).unwrap().name, "Giant");
        assert!(PrefixTable::default().select(0.5).is_none());
    }

    #[test]
    fn scale_hp_rounds_down() {
        assert_eq!(prefix("x", 1, 2.0).scale_hp(100), 200);
        assert_eq!(prefix("x", 1, 1.5).scale_hp(15), 22);
        assert_eq!(prefix("x", 1, 3.9).scale_hp(25), 97);
    }

    #[test]
    fn validate_rejects_empty_and_weightless() {
        assert!(PrefixTable::default().validate().is_err());
        assert!(PrefixTable::new(vec![prefix("x", 0, 1.0)]).validate().is_err());
        assert!(table().validate().is_ok());
    }

    #[test]
    fn speed_multiplier_defaults_when_missing() {
        let p: Prefix = serde_json::from_str(
            r#"{"name":"Plain","hp_multiplier":1.0,"reward_multiplier":1.0,"weight":1}"#,
        )
        .unwrap();
        assert!((p.speed_multiplier - 1.0).abs() < f64::EPSILON);
    }

    proptest! {
        #[test]
        fn any_roll_selects_some_prefix(roll in 0.0f64..1.0) {
            prop_assert!(table().select(roll).is_some());
        }
    }
}
