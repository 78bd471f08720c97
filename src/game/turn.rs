//! # Turn Controller
//!
//! The two-owner turn cycle and the scripted opponent.
//!
//! The scripted controller is an explicit state machine: [`AiTurn::step`] performs one
//! decision and reports it as an [`AiAction`]. [`GameState::end_turn`] drives the opponent
//! to completion synchronously and hands the action log back in a [`TurnReport`], so a
//! host can replay it at whatever pace it likes (see [`crate::pacing`]).

use crate::config;
use crate::game::{EntityId, GameEvent, GameState, PlayerId, Position, ProductionKind, TurnPhase};
use crate::rules::BASIC_UNIT_KEY;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One decision the scripted controller carried out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AiAction {
    /// Queued a unit in a city
    Enqueued { city: EntityId, item: String },
    /// Attacked the unit standing on `target`
    Attacked { unit: EntityId, target: Position },
    /// Stepped toward an opposing city
    Advanced {
        unit: EntityId,
        from: Position,
        to: Position,
    },
    /// Took a random step, no opposing city being in reach on this layer
    Wandered {
        unit: EntityId,
        from: Position,
        to: Position,
    },
}

/// What [`GameState::end_turn`] did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Owner whose turn was ended by the call
    pub ended_by: PlayerId,
    /// Everything the scripted opponent did in between
    pub ai_actions: Vec<AiAction>,
    pub turn_number: u32,
    pub active_owner: PlayerId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AiStage {
    Production,
    Units,
    Done,
}

/// Scripted controller for one owner's turn.
///
/// Cities and units are captured when the turn starts. Entities destroyed or captured
/// part-way through are skipped.
#[derive(Debug, Clone)]
pub struct AiTurn {
    owner: PlayerId,
    stage: AiStage,
    cities: Vec<EntityId>,
    units: Vec<EntityId>,
    cursor: usize,
}

impl AiTurn {
    pub fn new(state: &GameState, owner: PlayerId) -> Self {
        Self {
            owner,
            stage: AiStage::Production,
            cities: state.cities_of(owner).map(|city| city.id).collect(),
            units: state.units_of(owner).map(|unit| unit.id).collect(),
            cursor: 0,
        }
    }

    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    /// Whether every city and unit has been considered.
    pub fn is_done(&self) -> bool {
        self.stage == AiStage::Done
    }

    /// Advances to the next decision that changed the state and returns it.
    ///
    /// Cities and units that do nothing are passed over silently. Returns `None` once the
    /// turn is exhausted.
    pub fn step(&mut self, state: &mut GameState) -> Option<AiAction> {
        loop {
            match self.stage {
                AiStage::Production => {
                    let Some(&city) = self.cities.get(self.cursor) else {
                        self.stage = AiStage::Units;
                        self.cursor = 0;
                        continue;
                    };
                    self.cursor += 1;
                    if let Some(action) = state.scripted_production(self.owner, city) {
                        return Some(action);
                    }
                }
                AiStage::Units => {
                    let Some(&unit) = self.units.get(self.cursor) else {
                        self.stage = AiStage::Done;
                        continue;
                    };
                    self.cursor += 1;
                    if let Some(action) = state.scripted_command(self.owner, unit) {
                        return Some(action);
                    }
                }
                AiStage::Done => return None,
            }
        }
    }
}

impl GameState {
    /// Ends the active owner's turn.
    ///
    /// Processes that owner's economy and production queues, clears its "has acted"
    /// flags and passes control on. When control lands on the scripted opponent it plays
    /// its whole turn and ends it too, so a human call always returns with the human
    /// active again.
    ///
    /// # Examples
    ///
    /// ```
    /// use whitebox::{GameConfig, GameState, PlayerId};
    ///
    /// let mut state = GameState::new(GameConfig::default()).unwrap();
    /// let report = state.end_turn();
    /// assert_eq!(report.ended_by, PlayerId::Player);
    /// assert_eq!(state.turn_number(), 2);
    /// assert_eq!(state.active_owner(), PlayerId::Player);
    /// ```
    pub fn end_turn(&mut self) -> TurnReport {
        let ended_by = self.active_owner;
        self.finish_turn();

        let mut ai_actions = Vec::new();
        if !self.active_owner.is_human() {
            ai_actions = self.run_scripted_turn(self.active_owner);
            self.finish_turn();
        }

        TurnReport {
            ended_by,
            ai_actions,
            turn_number: self.turn_number,
            active_owner: self.active_owner,
        }
    }

    fn finish_turn(&mut self) {
        let current = self.active_owner;
        self.process_economy(current);
        self.process_queues(current);
        for entity in self.entities.iter_mut().filter(|entity| entity.owner == current) {
            entity.has_acted = false;
        }

        self.active_owner = current.opponent();
        if self.active_owner.is_human() {
            self.turn_number += 1;
        }
        self.phase = if self.active_owner.is_human() {
            TurnPhase::Input
        } else {
            TurnPhase::Resolution
        };

        log::info!("Turn {}: {} to act", self.turn_number, self.active_owner);
        self.emit(GameEvent::TurnChanged {
            turn: self.turn_number,
            owner: self.active_owner,
        });
    }

    /// Plays a full scripted turn for `owner` without ending it.
    pub fn run_scripted_turn(&mut self, owner: PlayerId) -> Vec<AiAction> {
        let mut turn = AiTurn::new(self, owner);
        let mut actions = Vec::new();
        while let Some(action) = turn.step(self) {
            actions.push(action);
        }
        log::debug!("{} took {} scripted actions", owner, actions.len());
        actions
    }

    /// Maybe queues a basic unit in `city`.
    fn scripted_production(&mut self, owner: PlayerId, city: EntityId) -> Option<AiAction> {
        if self.entity(city)?.owner != owner {
            return None;
        }
        let cost = self.config.rules.unit_cost(BASIC_UNIT_KEY)?;
        if self.player_state(owner).stars < cost {
            return None;
        }
        if self.rng.gen::<f64>() <= config::AI_PRODUCTION_CHANCE {
            return None;
        }
        self.enqueue_production(city, BASIC_UNIT_KEY, ProductionKind::Unit)
            .then(|| AiAction::Enqueued {
                city,
                item: BASIC_UNIT_KEY.to_string(),
            })
    }

    /// Picks and performs one move for `unit`: attack, advance, or wander.
    fn scripted_command(&mut self, owner: PlayerId, unit: EntityId) -> Option<AiAction> {
        let entity = self.entity(unit)?;
        if entity.owner != owner {
            return None;
        }
        let from = entity.position;

        let moves = self.get_valid_moves(unit);
        if moves.is_empty() {
            return None;
        }

        if let Some(attack) = moves.iter().find(|m| m.is_attack) {
            let target = attack.position;
            return self
                .move_unit(unit, target)
                .then_some(AiAction::Attacked { unit, target });
        }

        let objective = self
            .cities_of(owner.opponent())
            .filter(|city| city.position.z == from.z)
            .min_by_key(|city| self.distance(from, city.position))
            .map(|city| city.position);
        if let Some(objective) = objective {
            let to = moves
                .iter()
                .min_by_key(|m| self.distance(m.position, objective))
                .map(|m| m.position)?;
            return self
                .move_unit(unit, to)
                .then_some(AiAction::Advanced { unit, from, to });
        }

        let to = moves[self.rng.gen_range(0..moves.len())].position;
        self.move_unit(unit, to)
            .then_some(AiAction::Wandered { unit, from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::flat_state;
    use crate::game::{EventTopic, GameSnapshot};
    use crate::rules::CITY_KEY;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_end_turn_round_trip() {
        let mut state = flat_state();
        let turns = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&turns);
        state.subscribe(
            EventTopic::TurnChanged,
            Box::new(move |event: &GameEvent, snapshot: &GameSnapshot| {
                if let GameEvent::TurnChanged { turn, owner } = event {
                    sink.borrow_mut().push((*turn, *owner, snapshot.phase));
                }
            }),
        );

        let report = state.end_turn();
        assert_eq!(report.ended_by, PlayerId::Player);
        assert_eq!(report.turn_number, 2);
        assert_eq!(report.active_owner, PlayerId::Player);
        assert_eq!(state.phase(), TurnPhase::Input);
        assert_eq!(
            *turns.borrow(),
            vec![
                (1, PlayerId::EnemyAi, TurnPhase::Resolution),
                (2, PlayerId::Player, TurnPhase::Input)
            ]
        );
    }

    #[test]
    fn test_end_turn_pays_income() {
        let mut state = flat_state();
        let report = state.end_turn();
        assert_eq!(state.player_state(PlayerId::Player).stars, 16);

        let spent: u32 = report
            .ai_actions
            .iter()
            .filter(|action| matches!(action, AiAction::Enqueued { .. }))
            .count() as u32
            * 2;
        assert_eq!(state.player_state(PlayerId::EnemyAi).stars, 16 - spent);
    }

    #[test]
    fn test_end_turn_clears_acted_flags() {
        let mut state = flat_state();
        let id = state
            .create_entity(BASIC_UNIT_KEY, Position::new(1, 1, 0), PlayerId::Player, true)
            .unwrap();
        assert!(state.move_unit(id, Position::new(2, 1, 0)));
        assert!(state.entity(id).unwrap().has_acted);

        state.end_turn();
        assert!(!state.entity(id).unwrap().has_acted);
    }

    #[test]
    fn test_player_production_completes_on_end_turn() {
        let mut state = flat_state();
        let city = state.capital_of(PlayerId::Player).unwrap().id;
        assert!(state.enqueue_production(city, BASIC_UNIT_KEY, ProductionKind::Unit));
        assert_eq!(state.player_state(PlayerId::Player).stars, 8);

        state.end_turn();
        let warrior = state.unit_at(Position::new(5, 5, 0)).unwrap();
        assert_eq!(warrior.owner, PlayerId::Player);
        assert_eq!(warrior.type_key, BASIC_UNIT_KEY);
    }

    #[test]
    fn test_ai_attacks_adjacent_unit() {
        let mut state = flat_state();
        let victim = state
            .create_entity(BASIC_UNIT_KEY, Position::new(2, 2, 0), PlayerId::Player, true)
            .unwrap();
        let raider = state
            .create_entity(BASIC_UNIT_KEY, Position::new(3, 2, 0), PlayerId::EnemyAi, true)
            .unwrap();

        let report = state.end_turn();
        assert!(report.ai_actions.contains(&AiAction::Attacked {
            unit: raider,
            target: Position::new(2, 2, 0)
        }));
        assert_eq!(state.entity(victim).unwrap().components.health.unwrap().current, 9);
    }

    #[test]
    fn test_ai_advances_on_human_capital() {
        let mut state = flat_state();
        let start = Position::new(8, 5, 0);
        let raider = state
            .create_entity(BASIC_UNIT_KEY, start, PlayerId::EnemyAi, true)
            .unwrap();

        state.end_turn();
        let now = state.entity(raider).unwrap().position;
        let capital = Position::new(5, 5, 0);
        assert_eq!(state.distance(now, capital), state.distance(start, capital) - 1);
    }

    #[test]
    fn test_ai_advances_on_nearest_city() {
        let mut state = flat_state();
        let outpost = Position::new(1, 1, 0);
        state
            .create_entity(CITY_KEY, outpost, PlayerId::Player, true)
            .unwrap();
        let raider = state
            .create_entity(BASIC_UNIT_KEY, Position::new(2, 2, 0), PlayerId::EnemyAi, true)
            .unwrap();

        state.end_turn();
        assert_eq!(state.entity(raider).unwrap().position, outpost);
        assert_eq!(state.city_at(outpost).unwrap().owner, PlayerId::EnemyAi);
    }

    #[test]
    fn test_ai_wanders_without_objective() {
        let mut state = flat_state();
        let capital = state.capital_of(PlayerId::Player).unwrap().id;
        state.destroy_entity(capital);
        let raider = state
            .create_entity(BASIC_UNIT_KEY, Position::new(2, 2, 0), PlayerId::EnemyAi, true)
            .unwrap();

        let report = state.end_turn();
        assert!(report
            .ai_actions
            .iter()
            .any(|action| matches!(action, AiAction::Wandered { unit, .. } if *unit == raider)));
        assert_ne!(state.entity(raider).unwrap().position, Position::new(2, 2, 0));
    }

    #[test]
    fn test_ai_turn_steps_until_exhausted() {
        let mut state = flat_state();
        state.active_owner = PlayerId::EnemyAi;
        let raider = state
            .create_entity(BASIC_UNIT_KEY, Position::new(8, 5, 0), PlayerId::EnemyAi, true)
            .unwrap();

        let mut turn = AiTurn::new(&state, PlayerId::EnemyAi);
        assert_eq!(turn.owner(), PlayerId::EnemyAi);
        let mut actions = Vec::new();
        while let Some(action) = turn.step(&mut state) {
            actions.push(action);
        }
        assert!(turn.is_done());
        assert!(turn.step(&mut state).is_none());
        assert!(matches!(
            actions.last(),
            Some(AiAction::Advanced { unit, .. }) if *unit == raider
        ));
    }

    #[test]
    fn test_scripted_turn_for_human_side() {
        let mut state = flat_state();
        let scout = state
            .create_entity(BASIC_UNIT_KEY, Position::new(5, 8, 0), PlayerId::Player, true)
            .unwrap();
        let actions = state.run_scripted_turn(PlayerId::Player);
        assert!(actions
            .iter()
            .any(|action| matches!(action, AiAction::Advanced { unit, .. } if *unit == scout)));
        assert_eq!(state.active_owner(), PlayerId::Player);
    }

    #[test]
    fn test_action_log_serializes_with_tag() {
        let action = AiAction::Enqueued {
            city: crate::new_entity_id(),
            item: BASIC_UNIT_KEY.to_string(),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["action"], "enqueued");
        assert_eq!(json["item"], "warrior");
    }
}
