use aw_core::{Ability, AbilityEffect, CompanionId};

use super::player::strike_enemy;
use super::{AbilityOutcome, Hit, TurnAction, critical, scale};
use crate::combatant::Combatant;
use crate::error::{CombatError, CombatResult};
use crate::ledger::Buff;
use crate::log::CombatEventKind;
use crate::session::CombatSession;

/// Companion turn. Morale rises first; a full bar with an ability fires
/// the ability and empties the bar, otherwise the companion attacks.
pub(crate) fn resolve(session: &mut CombatSession, id: &CompanionId) -> CombatResult<TurnAction> {
    let idx = session
        .companion_index(id)
        .ok_or_else(|| CombatError::invalid(format!("{id} is not in this party")))?;
    if session.companions[idx].hp.is_down() {
        return Ok(session.cannot_act(Combatant::Companion(id.clone())));
    }

    session.ledger.gain_morale(id, session.config.morale_per_turn);
    let attack = f64::from(session.companions[idx].stats.attack);
    match session.companions[idx].template.ability.clone() {
        Some(ability) if session.ledger.spend_morale(id) => {
            Ok(use_ability(session, id, attack, ability))
        }
        _ => Ok(normal_attack(session, id, attack)),
    }
}

fn normal_attack(session: &mut CombatSession, id: &CompanionId, attack: f64) -> TurnAction {
    let buffed = attack * (1.0 + session.ledger.attack_bonus(id));
    let variance = session.rng.spread(0.8, 0.4);
    let hit = roll_crit(session, id, scale(buffed, variance));
    strike_enemy(session, Combatant::Companion(id.clone()), hit);
    TurnAction::Attack {
        target: Combatant::Enemy,
        hit,
    }
}

fn ability_hit(session: &mut CombatSession, id: &CompanionId, attack: f64, multiplier: f64) -> Hit {
    let variance = session.rng.spread(0.9, 0.2);
    let hit = roll_crit(session, id, scale(attack * multiplier, variance));
    strike_enemy(session, Combatant::Companion(id.clone()), hit);
    hit
}

fn roll_crit(session: &mut CombatSession, id: &CompanionId, damage: u32) -> Hit {
    let chance = session.config.base_crit_chance + session.ledger.crit_bonus(id);
    critical(
        damage,
        chance,
        session.config.crit_multiplier,
        session.rng.as_mut(),
    )
}

fn use_ability(
    session: &mut CombatSession,
    id: &CompanionId,
    attack: f64,
    ability: Ability,
) -> TurnAction {
    session.record(
        CombatEventKind::AbilityUsed {
            companion: id.clone(),
            ability: ability.name.clone(),
        },
        format!("{id} uses {}!", ability.name),
    );

    let outcome = match ability.effect {
        AbilityEffect::Strike { damage_multiplier } => AbilityOutcome::Damage {
            hit: ability_hit(session, id, attack, damage_multiplier),
        },
        AbilityEffect::Empower {
            buff,
            magnitude,
            duration,
            damage_multiplier,
        } => {
            let hit = ability_hit(session, id, attack, damage_multiplier);
            session.ledger.apply_buff(
                id,
                Buff {
                    kind: buff,
                    magnitude,
                    turns_left: duration,
                    source: ability.name.clone(),
                },
            );
            session.record(
                CombatEventKind::BuffApplied {
                    companion: id.clone(),
                    kind: buff,
                    magnitude,
                    turns: duration,
                },
                format!(
                    "{id}'s {buff} rises by {:.0}% for {duration} turns.",
                    magnitude * 100.0
                ),
            );
            AbilityOutcome::Empowered { hit, buff }
        }
        AbilityEffect::Mend { heal_multiplier } => {
            let amount = scale(attack, heal_multiplier);
            mend(session, id, amount)
        }
    };

    TurnAction::Ability {
        name: ability.name,
        outcome,
    }
}

/// Heal the living ally with the lowest HP ratio below full. The player is
/// considered first, so it wins ties.
fn mend(session: &mut CombatSession, id: &CompanionId, amount: u32) -> AbilityOutcome {
    // None is the player, Some(i) the companion at roster index i
    let candidates = std::iter::once((None, session.player.hp)).chain(
        session
            .companions
            .iter()
            .enumerate()
            .map(|(i, c)| (Some(i), c.hp)),
    );
    let mut best: Option<(Option<usize>, f64)> = None;
    for (slot, hp) in candidates {
        if hp.is_down() || hp.is_full() {
            continue;
        }
        let ratio = hp.fraction();
        if best.is_none_or(|(_, lowest)| ratio < lowest) {
            best = Some((slot, ratio));
        }
    }

    let Some((slot, _)) = best else {
        session.record(
            CombatEventKind::AbilityFizzled {
                companion: id.clone(),
            },
            "Everyone is already at full health.",
        );
        return AbilityOutcome::Healed {
            target: None,
            amount: 0,
        };
    };

    let (target, hp) = match slot {
        None => (Combatant::Player, &mut session.player.hp),
        Some(i) => {
            let companion = &mut session.companions[i];
            (Combatant::Companion(companion.id().clone()), &mut companion.hp)
        }
    };
    let restored = hp.heal(amount);
    let now = hp.current;
    let name = session.display_name(&target);
    session.record(
        CombatEventKind::Healed {
            healer: Combatant::Companion(id.clone()),
            target: target.clone(),
            amount: restored,
            hp: now,
        },
        format!("{name} recovers {restored} HP ({now} HP)."),
    );
    AbilityOutcome::Healed {
        target: Some(target),
        amount: restored,
    }
}
