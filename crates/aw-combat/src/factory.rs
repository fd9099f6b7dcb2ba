//! Building encounters from a summoning resource.

use std::sync::Arc;

use aw_core::player::player_max_hp;
use aw_core::{GameTables, PartyMember, TableError};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::combatant::HitPoints;
use crate::config::BalanceConfig;
use crate::error::CombatResult;
use crate::rng::CombatRng;
use crate::session::{CombatSession, CompanionState, EnemyState, PlayerState};

/// What the caller brings into an encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterRequest {
    /// The material that summons the creature.
    pub material: String,
    /// Attacker skill rating.
    pub skill: u32,
    /// Equipped accessory tier (0 = none).
    #[serde(default)]
    pub accessory_tier: u32,
    /// Up to three companions.
    #[serde(default)]
    pub party: Vec<PartyMember>,
}

impl EncounterRequest {
    /// A solo encounter with no accessory.
    pub fn new(material: impl Into<String>, skill: u32) -> Self {
        Self {
            material: material.into(),
            skill,
            accessory_tier: 0,
            party: Vec::new(),
        }
    }

    /// Set the accessory tier.
    pub fn with_accessory_tier(mut self, tier: u32) -> Self {
        self.accessory_tier = tier;
        self
    }

    /// Add a companion to the party.
    pub fn with_companion(mut self, member: PartyMember) -> Self {
        self.party.push(member);
        self
    }
}

/// Creates [`CombatSession`]s from the game tables.
#[derive(Debug, Clone)]
pub struct EncounterFactory {
    tables: Arc<GameTables>,
    config: BalanceConfig,
}

impl EncounterFactory {
    /// A factory over `tables` using `config` for every session.
    pub fn new(tables: impl Into<Arc<GameTables>>, config: BalanceConfig) -> Self {
        Self {
            tables: tables.into(),
            config,
        }
    }

    /// The tables encounters are built from.
    pub fn tables(&self) -> &GameTables {
        &self.tables
    }

    /// The balance settings passed to each session.
    pub fn config(&self) -> &BalanceConfig {
        &self.config
    }

    /// Create a session with an RNG seeded from the config.
    pub fn create_seeded(&self, request: &EncounterRequest) -> CombatResult<CombatSession> {
        self.create(
            request,
            Box::new(StdRng::seed_from_u64(self.config.seed)),
        )
    }

    /// Create a session drawing every roll from `rng`.
    ///
    /// The prefix is drawn first, before enemy hit points are computed.
    /// Fails with a configuration error if the material is unmapped or the
    /// party is invalid.
    pub fn create(
        &self,
        request: &EncounterRequest,
        mut rng: Box<dyn CombatRng>,
    ) -> CombatResult<CombatSession> {
        let archetype = self.tables.bestiary.by_material(&request.material)?.clone();
        self.tables.companions.validate_party(&request.party)?;

        let prefix = self
            .tables
            .prefixes
            .select(rng.unit())
            .cloned()
            .ok_or_else(|| TableError::Invalid("prefix table is empty".to_string()))?;

        let enemy = EnemyState {
            name: format!("{} {}", prefix.name, archetype.name),
            hp: HitPoints::new(prefix.scale_hp(archetype.base_hp)),
            speed: archetype.base_speed * prefix.speed_multiplier,
            archetype,
            prefix,
        };
        let player = PlayerState {
            skill: request.skill,
            accessory_tier: request.accessory_tier,
            hp: HitPoints::new(player_max_hp(request.accessory_tier)),
        };
        let companions = request
            .party
            .iter()
            .map(|member| {
                let template = self.tables.companions.get(&member.id)?.clone();
                let stats = template.stats_at(member.level);
                let mut member = member.clone();
                member.level = stats.level;
                Ok(CompanionState {
                    template,
                    member,
                    stats,
                    hp: HitPoints::new(stats.max_hp),
                })
            })
            .collect::<Result<Vec<_>, TableError>>()?;

        let session = CombatSession::new(
            request.material.clone(),
            enemy,
            player,
            companions,
            self.config.clone(),
            rng,
        );
        info!(
            session = %session.id(),
            enemy = %session.enemy_name(),
            enemy_hp = session.enemy_hp().max,
            party = request.party.len(),
            "encounter started"
        );
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::Combatant;
    use crate::error::CombatError;
    use crate::rng::ScriptedRng;

    fn factory() -> EncounterFactory {
        EncounterFactory::new(GameTables::standard(), BalanceConfig::default())
    }

    #[test]
    fn low_roll_draws_first_prefix() {
        let session = factory()
            .create(
                &EncounterRequest::new("Ice Shard", 10),
                Box::new(ScriptedRng::new([0.0])),
            )
            .unwrap();
        assert_eq!(session.enemy_name(), "Giant Ice Shark");
        assert_eq!(session.enemy_hp().max, 215);
        assert!((session.enemy_speed() - 29.0).abs() < 1e-9);
    }

    #[test]
    fn high_roll_draws_rarest_prefix() {
        let session = factory()
            .create(
                &EncounterRequest::new("Ice Shard", 10),
                Box::new(ScriptedRng::new([0.99])),
            )
            .unwrap();
        assert_eq!(session.enemy_name(), "Deep-Dark Ice Shark");
        // floor(215 * 3.9)
        assert_eq!(session.enemy_hp().max, 838);
    }

    #[test]
    fn player_hp_from_accessory() {
        let hp = |tier| {
            let request = EncounterRequest::new("Dango", 0).with_accessory_tier(tier);
            factory()
                .create(&request, Box::new(ScriptedRng::new([0.0])))
                .unwrap()
                .player_hp()
                .max
        };
        assert_eq!(hp(0), 100);
        assert_eq!(hp(1), 100);
        // floor(4^1.125 + 120)
        assert_eq!(hp(4), 124);
    }

    #[test]
    fn initial_state() {
        let request = EncounterRequest::new("Dango", 5)
            .with_companion(PartyMember::new("Sil", 1))
            .with_companion(PartyMember::new("Chloe", 3));
        let session = factory().create_seeded(&request).unwrap();
        assert_eq!(session.round(), 1);
        assert_eq!(session.turn_index(), 0);
        assert_eq!(session.turn(), &Combatant::Player);
        assert!(session.can_flee());
        assert!(!session.auto_mode());
        assert!(!session.resource_consumed());
        assert_eq!(session.turn_order().len(), 4);
        assert_eq!(session.morale(&"Sil".into()), 50);
        assert_eq!(session.companion_hp(&"Chloe".into()).unwrap().max, 52);
        // started + 2 joined + turn order
        assert_eq!(session.log().len(), 4);
    }

    #[test]
    fn unmapped_material_is_configuration_error() {
        let err = factory()
            .create_seeded(&EncounterRequest::new("Moon Rock", 1))
            .unwrap_err();
        assert!(matches!(
            err,
            CombatError::Configuration(TableError::UnmappedMaterial(_))
        ));
    }

    #[test]
    fn oversized_party_is_configuration_error() {
        let mut request = EncounterRequest::new("Dango", 1);
        for name in ["Sil", "Piena", "Chloe", "Nahatra"] {
            request = request.with_companion(PartyMember::new(name, 1));
        }
        let err = factory().create_seeded(&request).unwrap_err();
        assert!(matches!(
            err,
            CombatError::Configuration(TableError::PartyTooLarge { .. })
        ));
    }

    #[test]
    fn sessions_get_distinct_ids() {
        let request = EncounterRequest::new("Dango", 1);
        let a = factory().create_seeded(&request).unwrap();
        let b = factory().create_seeded(&request).unwrap();
        assert_ne!(a.id(), b.id());
    }
}
