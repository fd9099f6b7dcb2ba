//! Victory rewards: currency and companion experience.
//!
//! The session only produces a [`RewardDescriptor`]; making it permanent is
//! the job of a [`RewardVault`](crate::service::RewardVault).

use aw_core::companion::{MAX_LEVEL, exp_to_next};
use aw_core::{CompanionId, CompanionStats, CompanionTemplate, PartyMember};
use serde::{Deserialize, Serialize};

use crate::rng::CombatRng;

/// Currency earned from a victory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrencyReward {
    /// `floor(enemyMaxHp / 10) + 1..=5`.
    pub base: u64,
    /// The prefix reward multiplier.
    pub multiplier: f64,
    /// `floor(base · multiplier)`.
    pub amount: u64,
}

/// A companion's experience and level after a reward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanionProgress {
    /// The companion.
    pub companion: CompanionId,
    /// Experience awarded.
    pub gained: u32,
    /// Level before the reward.
    pub level_before: u32,
    /// Level after the reward.
    pub level: u32,
    /// Experience banked toward the next level.
    pub experience: u32,
    /// Experience needed for the next level.
    pub exp_to_next: u32,
    /// Stat block at the new level.
    pub stats: CompanionStats,
    /// Every level reached by this reward, in order.
    pub level_ups: Vec<u32>,
}

impl CompanionProgress {
    /// True if at least one level was gained.
    pub fn leveled_up(&self) -> bool {
        !self.level_ups.is_empty()
    }
}

/// Everything a victory awards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardDescriptor {
    /// Currency for the player.
    pub currency: CurrencyReward,
    /// Experience for every roster companion.
    pub experience: Vec<CompanionProgress>,
}

/// Reward formulas.
#[derive(Debug, Clone, Copy, Default)]
pub struct RewardCalculator;

impl RewardCalculator {
    /// Roll the currency reward for an enemy.
    pub fn currency(
        enemy_max_hp: u32,
        reward_multiplier: f64,
        rng: &mut dyn CombatRng,
    ) -> CurrencyReward {
        let base = u64::from(enemy_max_hp / 10) + u64::from(rng.int_inclusive(1, 5));
        let amount = (base as f64 * reward_multiplier).floor().max(0.0) as u64;
        CurrencyReward {
            base,
            multiplier: reward_multiplier,
            amount,
        }
    }

    /// Experience each companion earns: `floor(enemyMaxHp / 5) + 10`.
    pub fn experience_for(enemy_max_hp: u32) -> u32 {
        enemy_max_hp / 5 + 10
    }

    /// Add experience to a party member, levelling up as many times as it
    /// covers (up to [`MAX_LEVEL`]).
    pub fn apply_experience(
        template: &CompanionTemplate,
        member: &PartyMember,
        amount: u32,
    ) -> CompanionProgress {
        let level_before = member.level.clamp(1, MAX_LEVEL);
        let mut level = level_before;
        let mut experience = member.experience.saturating_add(amount);
        let mut level_ups = Vec::new();
        while level < MAX_LEVEL && experience >= exp_to_next(level) {
            experience -= exp_to_next(level);
            level += 1;
            level_ups.push(level);
        }
        CompanionProgress {
            companion: member.id.clone(),
            gained: amount,
            level_before,
            level,
            experience,
            exp_to_next: exp_to_next(level),
            stats: template.stats_at(level),
            level_ups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRng;

    fn nahatra() -> CompanionTemplate {
        aw_core::preset::companions()
            .get(&CompanionId::new("Nahatra"))
            .unwrap()
            .clone()
    }

    #[test]
    fn currency_without_multiplier() {
        let mut rng = ScriptedRng::new([0.0]);
        let reward = RewardCalculator::currency(50, 1.0, &mut rng);
        assert_eq!(reward.base, 6);
        assert_eq!(reward.amount, reward.base);
    }

    #[test]
    fn currency_scales_by_prefix() {
        let mut rng = ScriptedRng::new([0.999]);
        let reward = RewardCalculator::currency(215, 1.5, &mut rng);
        assert_eq!(reward.base, 26);
        assert_eq!(reward.amount, 39);
    }

    #[test]
    fn experience_formula() {
        assert_eq!(RewardCalculator::experience_for(100), 30);
        assert_eq!(RewardCalculator::experience_for(4), 10);
        assert_eq!(RewardCalculator::experience_for(5480), 1106);
    }

    #[test]
    fn no_level_up_below_threshold() {
        let member = PartyMember::new("Nahatra", 1).with_experience(60);
        let p = RewardCalculator::apply_experience(&nahatra(), &member, 30);
        assert_eq!((p.level, p.experience, p.exp_to_next), (1, 90, 100));
        assert!(!p.leveled_up());
    }

    #[test]
    fn multiple_level_ups_in_one_reward() {
        let member = PartyMember::new("Nahatra", 1);
        // 100 to reach 2, 150 to reach 3, 200 to reach 4
        let p = RewardCalculator::apply_experience(&nahatra(), &member, 460);
        assert_eq!(p.level_ups, vec![2, 3, 4]);
        assert_eq!(p.level, 4);
        assert_eq!(p.experience, 10);
        assert_eq!(p.exp_to_next, 250);
        assert_eq!(p.stats, nahatra().stats_at(4));
    }

    #[test]
    fn level_cap_holds() {
        let member = PartyMember::new("Nahatra", 99);
        let p = RewardCalculator::apply_experience(&nahatra(), &member, 100_000);
        assert_eq!(p.level, MAX_LEVEL);
        assert_eq!(p.level_ups, vec![100]);
        assert_eq!(p.experience, 100_000 - exp_to_next(99));
    }
}
