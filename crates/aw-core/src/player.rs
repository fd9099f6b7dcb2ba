//! Player stat curves.

/// Hit points for a player with no accessory equipped.
pub const BASELINE_PLAYER_HP: u32 = 100;

/// Maximum hit points from the equipped accessory tier.
///
/// Tier 0 (no accessory) gives a fixed baseline. Higher tiers follow
/// `tier^1.125 + 30·tier` but never drop below the baseline, so equipping
/// an accessory can only raise max HP.
pub fn player_max_hp(accessory_tier: u32) -> u32 {
    if accessory_tier == 0 {
        return BASELINE_PLAYER_HP;
    }
    let tier = f64::from(accessory_tier);
    let curve = (tier.powf(1.125) + 30.0 * tier).floor() as u32;
    curve.max(BASELINE_PLAYER_HP)
}

/// Attack before variance: `0.00225·s³ + 0.165·s² + 2·s + 3`.
pub fn player_base_attack(skill: u32) -> f64 {
    let s = f64::from(skill);
    0.00225 * s.powi(3) + 0.165 * s.powi(2) + 2.0 * s + 3.0
}

/// The lowest and highest damage a normal hit can roll at a skill level.
pub fn player_attack_range(skill: u32) -> (u32, u32) {
    let base = player_base_attack(skill);
    ((base * 0.8).floor() as u32, (base * 1.2).floor() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_zero_is_baseline() {
        assert_eq!(player_max_hp(0), 100);
    }

    #[test]
    fn low_tiers_keep_the_baseline() {
        assert_eq!(player_max_hp(1), 100);
        assert_eq!(player_max_hp(3), 100);
        assert_eq!(player_max_hp(4), 124);
        assert_eq!(player_max_hp(5), 156);
    }

    #[test]
    fn hp_never_falls_as_tier_rises() {
        let hp: Vec<u32> = (0..=20).map(player_max_hp).collect();
        for pair in hp.windows(2) {
            assert!(pair[1] >= pair[0], "{hp:?}");
        }
        for tier in 4..=20 {
            assert!(player_max_hp(tier) > player_max_hp(tier - 1));
        }
    }

    #[test]
    fn attack_curve() {
        assert!((player_base_attack(0) - 3.0).abs() < 1e-9);
        assert!((player_base_attack(10) - 41.75).abs() < 1e-9);
    }

    #[test]
    fn attack_range_brackets_base() {
        assert_eq!(player_attack_range(0), (2, 3));
        assert_eq!(player_attack_range(10), (33, 50));
    }
}
