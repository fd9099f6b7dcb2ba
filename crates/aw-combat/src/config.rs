use serde::{Deserialize, Serialize};

/// Balance knobs for an encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    /// RNG seed for deterministic encounters.
    pub seed: u64,
    /// Morale every companion enters the encounter with.
    pub starting_morale: u32,
    /// Morale a companion gains at the start of each of its turns.
    pub morale_per_turn: u32,
    /// Morale a companion gains when the enemy hits it.
    pub morale_on_hit: u32,
    /// Critical-hit chance before buffs.
    pub base_crit_chance: f64,
    /// Damage multiplier on a critical hit.
    pub crit_multiplier: f64,
    /// Maximum combat log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_log_events: usize,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            starting_morale: 50,
            morale_per_turn: 15,
            morale_on_hit: 25,
            base_crit_chance: 0.05,
            crit_multiplier: 1.5,
            max_log_events: 0,
        }
    }
}

impl BalanceConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the morale companions start with.
    pub fn with_starting_morale(mut self, morale: u32) -> Self {
        self.starting_morale = morale;
        self
    }

    /// Set the per-turn morale gain.
    pub fn with_morale_per_turn(mut self, morale: u32) -> Self {
        self.morale_per_turn = morale;
        self
    }

    /// Set the morale gained from taking a hit.
    pub fn with_morale_on_hit(mut self, morale: u32) -> Self {
        self.morale_on_hit = morale;
        self
    }

    /// Set the base critical-hit chance.
    pub fn with_base_crit_chance(mut self, chance: f64) -> Self {
        self.base_crit_chance = chance;
        self
    }

    /// Set the critical damage multiplier.
    pub fn with_crit_multiplier(mut self, multiplier: f64) -> Self {
        self.crit_multiplier = multiplier;
        self
    }

    /// Set the maximum log size (0 = unlimited).
    pub fn with_max_log_events(mut self, max: usize) -> Self {
        self.max_log_events = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = BalanceConfig::default();
        assert_eq!(config.seed, 42);
        assert_eq!(config.starting_morale, 50);
        assert_eq!(config.morale_per_turn, 15);
        assert_eq!(config.morale_on_hit, 25);
        assert!((config.base_crit_chance - 0.05).abs() < f64::EPSILON);
        assert!((config.crit_multiplier - 1.5).abs() < f64::EPSILON);
        assert_eq!(config.max_log_events, 0);
    }

    #[test]
    fn config_builder_chain() {
        let config = BalanceConfig::default()
            .with_seed(7)
            .with_starting_morale(85)
            .with_base_crit_chance(0.0)
            .with_max_log_events(200);
        assert_eq!(config.seed, 7);
        assert_eq!(config.starting_morale, 85);
        assert!(config.base_crit_chance.abs() < f64::EPSILON);
        assert_eq!(config.max_log_events, 200);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: BalanceConfig = serde_json::from_str(r#"{ "morale_on_hit": 30 }"#).unwrap();
        assert_eq!(config.morale_on_hit, 30);
        assert_eq!(config.starting_morale, 50);
    }
}
