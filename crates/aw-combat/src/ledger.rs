//! Per-companion morale and active buffs.
//!
//! Morale fills each turn and when the companion is hit; a full bar
//! allows exactly one ability use. Buffs last a number of rounds and are
//! decayed once per completed round, never per turn.

use aw_core::{BuffKind, CompanionId};
use serde::{Deserialize, Serialize};

/// Morale needed to use an ability.
pub const MAX_MORALE: u32 = 100;

/// A temporary stat modifier granted by an ability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    /// Which stat it modifies.
    pub kind: BuffKind,
    /// Attack fraction or crit chance bonus.
    pub magnitude: f64,
    /// Rounds remaining, including the current one.
    pub turns_left: u32,
    /// Name of the ability that granted it.
    pub source: String,
}

/// A buff removed at a round boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpiredBuff {
    /// The companion that held it.
    pub companion: CompanionId,
    /// The buff as it was when it ran out.
    pub buff: Buff,
}

/// Morale and buffs of one companion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LedgerEntry {
    companion: CompanionId,
    /// `0..=MAX_MORALE`
    morale: u32,
    /// At most one per kind.
    buffs: Vec<Buff>,
}

/// Morale and buff state for every companion in an encounter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoraleAndBuffLedger {
    entries: Vec<LedgerEntry>,
}

impl MoraleAndBuffLedger {
    /// Start every companion at `starting_morale` with no buffs.
    pub fn new<'a>(
        companions: impl IntoIterator<Item = &'a CompanionId>,
        starting_morale: u32,
    ) -> Self {
        Self {
            entries: companions
                .into_iter()
                .map(|id| LedgerEntry {
                    companion: id.clone(),
                    morale: starting_morale.min(MAX_MORALE),
                    buffs: Vec::new(),
                })
                .collect(),
        }
    }

    fn entry(&self, id: &CompanionId) -> Option<&LedgerEntry> {
        self.entries.iter().find(|e| &e.companion == id)
    }

    fn entry_mut(&mut self, id: &CompanionId) -> Option<&mut LedgerEntry> {
        self.entries.iter_mut().find(|e| &e.companion == id)
    }

    /// Current morale (0 for an unknown companion).
    pub fn morale(&self, id: &CompanionId) -> u32 {
        self.entry(id).map_or(0, |e| e.morale)
    }

    /// Add morale, clamped to [`MAX_MORALE`]. Returns the new value.
    pub fn gain_morale(&mut self, id: &CompanionId, amount: u32) -> u32 {
        match self.entry_mut(id) {
            Some(entry) => {
                entry.morale = entry.morale.saturating_add(amount).min(MAX_MORALE);
                entry.morale
            }
            None => 0,
        }
    }

    /// True when the morale bar is full.
    pub fn ability_ready(&self, id: &CompanionId) -> bool {
        self.morale(id) >= MAX_MORALE
    }

    /// Spend a full morale bar. Returns false (and changes nothing) if the
    /// bar was not full.
    pub fn spend_morale(&mut self, id: &CompanionId) -> bool {
        if !self.ability_ready(id) {
            return false;
        }
        match self.entry_mut(id) {
            Some(entry) => {
                entry.morale = 0;
                true
            }
            None => false,
        }
    }

    /// Apply a buff, replacing any active buff of the same kind.
    pub fn apply_buff(&mut self, id: &CompanionId, buff: Buff) {
        if let Some(entry) = self.entry_mut(id) {
            entry.buffs.retain(|b| b.kind != buff.kind);
            entry.buffs.push(buff);
        }
    }

    /// Active buffs of a companion.
    pub fn buffs(&self, id: &CompanionId) -> &[Buff] {
        self.entry(id).map(|e| e.buffs.as_slice()).unwrap_or(&[])
    }

    fn bonus(&self, id: &CompanionId, kind: BuffKind) -> f64 {
        self.buffs(id)
            .iter()
            .filter(|b| b.kind == kind)
            .map(|b| b.magnitude)
            .sum()
    }

    /// Active attack bonus as a fraction (0.25 = +25%).
    pub fn attack_bonus(&self, id: &CompanionId) -> f64 {
        self.bonus(id, BuffKind::Attack)
    }

    /// Active critical chance bonus.
    pub fn crit_bonus(&self, id: &CompanionId) -> f64 {
        self.bonus(id, BuffKind::Critical)
    }

    /// Close out a round: every buff loses one turn and buffs reaching 0
    /// are removed and returned.
    pub fn decay_round(&mut self) -> Vec<ExpiredBuff> {
        let mut expired = Vec::new();
        for entry in &mut self.entries {
            for buff in &mut entry.buffs {
                buff.turns_left = buff.turns_left.saturating_sub(1);
            }
            let (done, active): (Vec<Buff>, Vec<Buff>) =
                entry.buffs.drain(..).partition(|b| b.turns_left == 0);
            entry.buffs = active;
            expired.extend(done.into_iter().map(|buff| ExpiredBuff {
                companion: entry.companion.clone(),
                buff,
            }));
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> Vec<CompanionId> {
        vec![CompanionId::new("Sil"), CompanionId::new("Piena")]
    }

    fn stance(turns: u32) -> Buff {
        Buff {
            kind: BuffKind::Attack,
            magnitude: 0.25,
            turns_left: turns,
            source: "Steadfast Stance".to_string(),
        }
    }

    #[test]
    fn starts_at_configured_morale() {
        let ids = ids();
        let ledger = MoraleAndBuffLedger::new(&ids, 50);
        assert_eq!(ledger.morale(&ids[0]), 50);
        assert_eq!(ledger.morale(&ids[1]), 50);
        assert!(ledger.buffs(&ids[1]).is_empty());
    }

    #[test]
    fn morale_clamps_at_max() {
        let ids = ids();
        let mut ledger = MoraleAndBuffLedger::new(&ids, 90);
        assert_eq!(ledger.gain_morale(&ids[0], 25), 100);
        assert!(ledger.ability_ready(&ids[0]));
    }

    #[test]
    fn spend_requires_full_bar() {
        let ids = ids();
        let mut ledger = MoraleAndBuffLedger::new(&ids, 85);
        assert!(!ledger.spend_morale(&ids[0]));
        assert_eq!(ledger.morale(&ids[0]), 85);
        ledger.gain_morale(&ids[0], 15);
        assert!(ledger.spend_morale(&ids[0]));
        assert_eq!(ledger.morale(&ids[0]), 0);
        assert!(!ledger.spend_morale(&ids[0]));
    }

    #[test]
    fn reapplying_a_kind_refreshes() {
        let ids = ids();
        let mut ledger = MoraleAndBuffLedger::new(&ids, 50);
        ledger.apply_buff(&ids[1], stance(1));
        ledger.apply_buff(&ids[1], stance(3));
        assert_eq!(ledger.buffs(&ids[1]).len(), 1);
        assert_eq!(ledger.buffs(&ids[1])[0].turns_left, 3);
        assert!((ledger.attack_bonus(&ids[1]) - 0.25).abs() < f64::EPSILON);
        assert!(ledger.crit_bonus(&ids[1]).abs() < f64::EPSILON);
    }

    #[test]
    fn decay_expires_after_duration() {
        let ids = ids();
        let mut ledger = MoraleAndBuffLedger::new(&ids, 50);
        ledger.apply_buff(&ids[1], stance(3));
        assert!(ledger.decay_round().is_empty());
        assert!(ledger.decay_round().is_empty());
        let expired = ledger.decay_round();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].companion, ids[1]);
        assert_eq!(expired[0].buff.source, "Steadfast Stance");
        assert!(ledger.buffs(&ids[1]).is_empty());
    }

    #[test]
    fn unknown_companion_is_inert() {
        let mut ledger = MoraleAndBuffLedger::new(&ids(), 50);
        let ghost = CompanionId::new("Ghost");
        assert_eq!(ledger.gain_morale(&ghost, 10), 0);
        ledger.apply_buff(&ghost, stance(3));
        assert!(ledger.buffs(&ghost).is_empty());
    }
}
