//! # Combat
//!
//! Deterministic attack, retaliation and destruction.

use crate::config;
use crate::game::{CombatKind, CombatLog, Entity, EntityId, GameEvent, GameState};
use crate::rules::RuleSet;
use serde::{Deserialize, Serialize};

/// Damage dealt by an attack of `attack` against `defense`. Never below 1.
///
/// # Examples
///
/// ```
/// use whitebox::combat_damage;
///
/// assert_eq!(combat_damage(3, 2), 1);
/// assert_eq!(combat_damage(6, 1), 5);
/// assert_eq!(combat_damage(1, 40), 1);
/// ```
pub fn combat_damage(attack: i32, defense: i32) -> i32 {
    (attack - defense).max(1)
}

/// What a single exchange did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatOutcome {
    /// Damage dealt to the defender, zero when the exchange had no effect
    pub damage: i32,
    /// Damage the defender struck back with
    pub retaliation: Option<i32>,
    pub defender_destroyed: bool,
    pub attacker_destroyed: bool,
}

/// Effective defense of `defender`, including the defense of any buildings it has.
pub fn effective_defense(defender: &Entity, rules: &RuleSet) -> i32 {
    defender.defense_value() + rules.building_bonus(defender).defense
}

impl GameState {
    /// Resolves an attack of `attacker_id` on `defender_id`.
    ///
    /// The attacker is marked as having acted whatever happens. Returns `None` only when
    /// either entity does not exist.
    pub fn resolve_combat(
        &mut self,
        attacker_id: EntityId,
        defender_id: EntityId,
    ) -> Option<CombatOutcome> {
        let attacker = self.entity(attacker_id)?.clone();
        let defender = self.entity(defender_id)?.clone();
        if let Some(unit) = self.entity_mut(attacker_id) {
            unit.has_acted = true;
        }

        let mut outcome = CombatOutcome::default();
        let (Some(attack), Some(_)) = (attacker.components.attack, defender.components.health)
        else {
            self.log_combat(CombatKind::NoEffect, &attacker, &defender, 0);
            return Some(outcome);
        };

        outcome.damage = combat_damage(attack.damage, effective_defense(&defender, &self.config.rules));
        let defender_alive = self.apply_damage(defender_id, outcome.damage);
        self.log_combat(CombatKind::Attack, &attacker, &defender, outcome.damage);

        if !defender_alive {
            self.destroy_entity(defender_id);
            self.log_combat(CombatKind::Death, &attacker, &defender, 0);
            outcome.defender_destroyed = true;
            return Some(outcome);
        }

        let in_melee = attacker.position.z == defender.position.z
            && self.distance(attacker.position, defender.position) <= config::MELEE_RANGE;
        if !in_melee {
            return Some(outcome);
        }
        let (Some(counter), Some(_)) = (defender.components.attack, attacker.components.health)
        else {
            return Some(outcome);
        };

        let retaliation = combat_damage(counter.damage, attacker.defense_value());
        outcome.retaliation = Some(retaliation);
        let attacker_alive = self.apply_damage(attacker_id, retaliation);
        self.log_combat(CombatKind::Retaliation, &defender, &attacker, retaliation);

        if !attacker_alive {
            self.destroy_entity(attacker_id);
            self.log_combat(CombatKind::Death, &defender, &attacker, 0);
            outcome.attacker_destroyed = true;
        }
        Some(outcome)
    }

    /// Subtracts `damage` from an entity's health and reports whether it survives.
    fn apply_damage(&mut self, id: EntityId, damage: i32) -> bool {
        match self.entity_mut(id) {
            Some(entity) => {
                if let Some(health) = entity.components.health.as_mut() {
                    health.current -= damage;
                }
                entity.is_alive()
            }
            None => false,
        }
    }

    fn log_combat(&mut self, kind: CombatKind, from: &Entity, to: &Entity, damage: i32) {
        let log = CombatLog {
            kind,
            attacker: from.id,
            attacker_type: from.type_key.clone(),
            defender: to.id,
            defender_type: to.type_key.clone(),
            damage,
        };
        log::debug!("{}", log);
        self.emit(GameEvent::CombatLogged(log));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::flat_state;
    use crate::game::{EventTopic, GameSnapshot, Health, PlayerId, Position};
    use crate::rules::{BASIC_UNIT_KEY, WALL_KEY};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn duel(state: &mut GameState) -> (EntityId, EntityId) {
        let a = state
            .create_entity(BASIC_UNIT_KEY, Position::new(2, 2, 0), PlayerId::Player, true)
            .unwrap();
        let d = state
            .create_entity(BASIC_UNIT_KEY, Position::new(3, 2, 0), PlayerId::EnemyAi, true)
            .unwrap();
        (a, d)
    }

    #[test]
    fn test_warrior_exchange() {
        let mut state = flat_state();
        let (a, d) = duel(&mut state);

        let outcome = state.resolve_combat(a, d).unwrap();
        assert_eq!(outcome.damage, 1);
        assert_eq!(outcome.retaliation, Some(1));
        assert_eq!(
            state.entity(d).unwrap().components.health,
            Some(Health { current: 9, max: 10 })
        );
        assert_eq!(state.entity(a).unwrap().components.health.unwrap().current, 9);
        assert!(state.entity(a).unwrap().has_acted);
    }

    #[test]
    fn test_lethal_attack_skips_retaliation() {
        let mut state = flat_state();
        let (a, d) = duel(&mut state);
        state.entity_mut(d).unwrap().components.health = Some(Health { current: 1, max: 10 });

        let logs = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&logs);
        state.subscribe(
            EventTopic::CombatLogged,
            Box::new(move |event: &GameEvent, _: &GameSnapshot| {
                if let GameEvent::CombatLogged(log) = event {
                    sink.borrow_mut().push(log.kind);
                }
            }),
        );

        let outcome = state.resolve_combat(a, d).unwrap();
        assert!(outcome.defender_destroyed);
        assert!(outcome.retaliation.is_none());
        assert!(state.entity(d).is_none());
        assert_eq!(*logs.borrow(), vec![CombatKind::Attack, CombatKind::Death]);
    }

    #[test]
    fn test_retaliation_can_kill_attacker() {
        let mut state = flat_state();
        let (a, d) = duel(&mut state);
        state.entity_mut(a).unwrap().components.health = Some(Health { current: 1, max: 10 });

        let outcome = state.resolve_combat(a, d).unwrap();
        assert!(outcome.attacker_destroyed);
        assert!(state.entity(a).is_none());
        assert!(state.entity(d).is_some());
    }

    #[test]
    fn test_no_retaliation_at_range() {
        let mut state = flat_state();
        let a = state
            .create_entity("dragon", Position::new(2, 2, 0), PlayerId::Player, true)
            .unwrap();
        let d = state
            .create_entity(BASIC_UNIT_KEY, Position::new(4, 2, 0), PlayerId::EnemyAi, true)
            .unwrap();

        let outcome = state.resolve_combat(a, d).unwrap();
        assert_eq!(outcome.damage, 4);
        assert!(outcome.retaliation.is_none());
        assert_eq!(state.entity(a).unwrap().components.health.unwrap().current, 20);
    }

    #[test]
    fn test_walled_city_gets_bonus() {
        let state = flat_state();
        let rules = &state.config().rules;
        let mut city = state.capital_of(PlayerId::EnemyAi).unwrap().clone();
        assert_eq!(effective_defense(&city, rules), 1);
        city.city.as_mut().unwrap().buildings.push(WALL_KEY.to_string());
        assert_eq!(effective_defense(&city, rules), 1 + config::WALL_DEFENSE_BONUS);
    }

    #[test]
    fn test_missing_stats_have_no_effect() {
        let mut state = flat_state();
        let a = state
            .create_entity(BASIC_UNIT_KEY, Position::new(8, 9, 0), PlayerId::Player, true)
            .unwrap();
        let city = state.capital_of(PlayerId::EnemyAi).unwrap().id;

        let outcome = state.resolve_combat(a, city).unwrap();
        assert_eq!(outcome, CombatOutcome::default());
        assert!(state.entity(city).is_some());
        assert!(state.entity(a).unwrap().has_acted);
    }

    #[test]
    fn test_unknown_entities() {
        let mut state = flat_state();
        assert!(state
            .resolve_combat(crate::new_entity_id(), crate::new_entity_id())
            .is_none());
    }
}
