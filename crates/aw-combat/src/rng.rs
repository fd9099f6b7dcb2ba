//! Randomness source for combat rolls.
//!
//! Every roll the engine makes goes through [`CombatRng::unit`], so a
//! session can be driven by a seeded [`StdRng`] in play or by a
//! [`ScriptedRng`] that replays fixed values in tests.

use std::collections::VecDeque;

use rand::Rng;
use rand::rngs::StdRng;

/// A source of uniform rolls in `[0, 1)`.
pub trait CombatRng: Send + Sync {
    /// Draw one value in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform value in `[base, base + width)`, computed as `base + u·width`.
    fn spread(&mut self, base: f64, width: f64) -> f64 {
        base + self.unit() * width
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }

    /// Uniform index into a collection of `len` items. `len` must be > 0.
    fn pick(&mut self, len: usize) -> usize {
        let idx = (self.unit() * len as f64) as usize;
        idx.min(len.saturating_sub(1))
    }

    /// Uniform integer in `lo..=hi`.
    fn int_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        let span = hi.saturating_sub(lo);
        let offset = (self.unit() * f64::from(span + 1)) as u32;
        lo + offset.min(span)
    }
}

impl CombatRng for StdRng {
    fn unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Replays a fixed sequence of rolls, then a constant fallback.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    rolls: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedRng {
    /// Replay `rolls` in order, then 0.5 forever.
    pub fn new(rolls: impl IntoIterator<Item = f64>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            fallback: 0.5,
        }
    }

    /// Always return `value`.
    pub fn constant(value: f64) -> Self {
        Self::new([]).with_fallback(value)
    }

    /// Set the value returned once the script runs out.
    pub fn with_fallback(mut self, value: f64) -> Self {
        self.fallback = value;
        self
    }
}

impl CombatRng for ScriptedRng {
    fn unit(&mut self) -> f64 {
        self.rolls.pop_front().unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn std_rng_is_deterministic_per_seed() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            assert_eq!(a.unit().to_bits(), b.unit().to_bits());
        }
    }

    #[test]
    fn std_rng_stays_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let u = rng.unit();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn scripted_replays_then_falls_back() {
        let mut rng = ScriptedRng::new([0.1, 0.9]);
        assert!((rng.unit() - 0.1).abs() < f64::EPSILON);
        assert!((rng.unit() - 0.9).abs() < f64::EPSILON);
        assert!((rng.unit() - 0.5).abs() < f64::EPSILON);
        assert!((rng.unit() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn helpers_map_rolls() {
        let mut rng = ScriptedRng::new([0.0, 0.999_999, 0.5, 0.0, 0.999_999]);
        assert_eq!(rng.int_inclusive(1, 5), 1);
        assert_eq!(rng.int_inclusive(1, 5), 5);
        assert!((rng.spread(0.8, 0.4) - 1.0).abs() < 1e-9);
        assert_eq!(rng.pick(3), 0);
        assert_eq!(rng.pick(3), 2);
    }

    #[test]
    fn chance_is_strictly_below() {
        let mut rng = ScriptedRng::constant(0.05);
        assert!(!rng.chance(0.05));
        assert!(rng.chance(0.06));
    }

    #[test]
    fn pick_never_overflows() {
        let mut rng = ScriptedRng::constant(1.0);
        assert_eq!(rng.pick(4), 3);
        assert_eq!(rng.int_inclusive(1, 5), 5);
    }
}
