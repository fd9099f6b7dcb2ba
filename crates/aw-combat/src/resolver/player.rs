use aw_core::player::player_base_attack;

use super::{Hit, TurnAction, critical, describe_hit, scale};
use crate::combatant::Combatant;
use crate::log::CombatEventKind;
use crate::session::CombatSession;

/// Player attack: `floor(base(skill) · 0.8..1.2)` then the crit roll. The
/// first attack locks in auto mode and forbids fleeing.
pub(crate) fn resolve(session: &mut CombatSession) -> TurnAction {
    if session.player.hp.is_down() {
        return session.cannot_act(Combatant::Player);
    }

    let variance = session.rng.spread(0.8, 0.4);
    let damage = scale(player_base_attack(session.player.skill), variance);
    let hit = critical(
        damage,
        session.config.base_crit_chance,
        session.config.crit_multiplier,
        session.rng.as_mut(),
    );

    session.auto_mode = true;
    session.can_flee = false;
    strike_enemy(session, Combatant::Player, hit);
    TurnAction::Attack {
        target: Combatant::Enemy,
        hit,
    }
}

/// Apply a hit to the enemy and log it.
pub(crate) fn strike_enemy(session: &mut CombatSession, attacker: Combatant, hit: Hit) {
    session.enemy.hp.damage(hit.damage);
    let remaining = session.enemy.hp.current;
    let description = describe_hit(
        &session.display_name(&attacker),
        &session.enemy.name,
        hit,
        remaining,
    );
    let downed = session.enemy.hp.is_down();
    session.record(
        CombatEventKind::Attack {
            attacker,
            target: Combatant::Enemy,
            damage: hit.damage,
            critical: hit.critical,
            remaining_hp: remaining,
        },
        description,
    );
    if downed {
        let name = session.enemy.name.clone();
        session.record(
            CombatEventKind::Downed {
                combatant: Combatant::Enemy,
            },
            format!("{name} collapses!"),
        );
    }
}
