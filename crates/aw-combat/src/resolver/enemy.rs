use super::{Hit, TurnAction, critical, describe_hit};
use crate::combatant::Combatant;
use crate::log::CombatEventKind;
use crate::session::CombatSession;

/// Raw enemy damage from a single roll `u`.
///
/// The rank-0 special creature hits for `8 + floor(3u)`; every other
/// creature for `floor(rank^1.65 + 1.3·rank + 10 + 5u)`.
pub(crate) fn base_damage(rank: u32, special: bool, u: f64) -> u32 {
    if special {
        return 8 + (u * 3.0).floor() as u32;
    }
    let r = f64::from(rank);
    (r.powf(1.65) + 1.3 * r + 10.0 + u * 5.0).floor() as u32
}

/// Enemy turn: roll damage, roll the crit, then pick a living target
/// uniformly among the player and the companions.
pub(crate) fn resolve(session: &mut CombatSession) -> TurnAction {
    let u = session.rng.unit();
    let damage = base_damage(
        session.enemy.archetype.rank,
        session.enemy.archetype.is_special(),
        u,
    );
    let hit = critical(
        damage,
        session.config.base_crit_chance,
        session.config.crit_multiplier,
        session.rng.as_mut(),
    );

    // None is the player, Some(i) the companion at roster index i
    let targets: Vec<Option<usize>> = std::iter::once(None)
        .filter(|_| !session.player.hp.is_down())
        .chain(
            session
                .companions
                .iter()
                .enumerate()
                .filter(|(_, c)| !c.hp.is_down())
                .map(|(i, _)| Some(i)),
        )
        .collect();
    if targets.is_empty() {
        return session.cannot_act(Combatant::Enemy);
    }
    let slot = targets[session.rng.pick(targets.len())];

    match slot {
        None => {
            session.player.hp.damage(hit.damage);
            let remaining = session.player.hp.current;
            log_hit(session, Combatant::Player, hit, remaining);
        }
        Some(i) => {
            session.companions[i].hp.damage(hit.damage);
            let remaining = session.companions[i].hp.current;
            let id = session.companions[i].id().clone();
            log_hit(session, Combatant::Companion(id.clone()), hit, remaining);

            let morale = session.ledger.gain_morale(&id, session.config.morale_on_hit);
            session.record(
                CombatEventKind::MoraleGained {
                    companion: id.clone(),
                    morale,
                },
                format!("{id}'s morale rises to {morale}."),
            );
        }
    }

    let target = match slot {
        None => Combatant::Player,
        Some(i) => Combatant::Companion(session.companions[i].id().clone()),
    };
    TurnAction::Attack { target, hit }
}

fn log_hit(session: &mut CombatSession, target: Combatant, hit: Hit, remaining: u32) {
    let attacker = Combatant::Enemy;
    let description = describe_hit(
        &session.enemy.name,
        &session.display_name(&target),
        hit,
        remaining,
    );
    session.record(
        CombatEventKind::Attack {
            attacker,
            target: target.clone(),
            damage: hit.damage,
            critical: hit.critical,
            remaining_hp: remaining,
        },
        description,
    );
    if remaining == 0 {
        let name = session.display_name(&target);
        session.record(
            CombatEventKind::Downed { combatant: target },
            format!("{name} is knocked out!"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_creature_hits_eight_to_ten() {
        assert_eq!(base_damage(0, true, 0.0), 8);
        assert_eq!(base_damage(0, true, 0.5), 9);
        assert_eq!(base_damage(0, true, 0.999), 10);
    }

    #[test]
    fn ranked_damage_curve() {
        // 1 + 1.3 + 10 = 12.3
        assert_eq!(base_damage(1, false, 0.0), 12);
        assert_eq!(base_damage(1, false, 0.999), 17);
        // 8^1.65 ≈ 30.9, + 10.4 + 10 = 51.3
        assert_eq!(base_damage(8, false, 0.0), 51);
    }

    #[test]
    fn damage_grows_with_rank() {
        let mut prev = base_damage(1, false, 0.5);
        for rank in 2..=35 {
            let dmg = base_damage(rank, false, 0.5);
            assert!(dmg > prev, "rank {rank}");
            prev = dmg;
        }
    }
}
