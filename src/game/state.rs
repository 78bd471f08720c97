//! # Game State Module
//!
//! Central game state management and coordination between all game systems.
//!
//! [`GameState`] is the engine: it exclusively owns the grid, the entity list and both
//! players' state, and every rule system is implemented as methods on it. Hosts read it
//! through getters or through the owned [`GameSnapshot`] handed to event subscribers.

use crate::game::{
    CityData, Entity, EntityId, EventBus, EventCallback, EventTopic, GameEvent, Grid,
    MoveKind, PlayerId, Position, SubscriptionId, Terrain,
};
use crate::generation::{capital_sites, city_name, Generator, MapConfig, TerrainGenerator};
use crate::rules::{RuleSet, CITY_KEY};
use crate::utils::tiles_in_range;
use crate::{config, WhiteboxResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Everything supplied at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub map: MapConfig,
    #[serde(default)]
    pub rules: RuleSet,
}

impl GameConfig {
    /// Default rules on the given map.
    pub fn with_map(map: MapConfig) -> Self {
        Self {
            map,
            rules: RuleSet::default(),
        }
    }

    /// Checks both the map and the rule set.
    pub fn validate(&self) -> WhiteboxResult<()> {
        self.map.validate()?;
        self.rules.validate()
    }
}

/// Per-player economy and research.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Star balance
    pub stars: u32,
    /// Income as last computed
    pub income: u32,
    /// Researched technology ids
    pub unlocked_techs: BTreeSet<String>,
}

impl PlayerState {
    /// Fresh state with the starting balance.
    pub fn new() -> Self {
        Self {
            stars: config::STARTING_STARS,
            income: 0,
            unlocked_techs: BTreeSet::new(),
        }
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Whose hands the session is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// The human may issue commands
    Input,
    /// The scripted opponent is acting
    Resolution,
}

/// Owned, read-only copy of the engine state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub seed: u64,
    pub grid: Grid,
    pub entities: Vec<Entity>,
    pub players: [PlayerState; 2],
    pub turn_number: u32,
    pub active_owner: PlayerId,
    pub phase: TurnPhase,
}

impl GameSnapshot {
    /// State of one player.
    pub fn player(&self, owner: PlayerId) -> &PlayerState {
        &self.players[owner.index()]
    }

    /// Looks up an entity by id.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    /// Cities owned by `owner`.
    pub fn cities_of(&self, owner: PlayerId) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(move |entity| entity.is_city() && entity.owner == owner)
    }
}

/// The simulation engine.
///
/// Commands validate their preconditions and return `false`/`None` without touching
/// state when a rule forbids them.
#[derive(Debug)]
pub struct GameState {
    pub(crate) config: GameConfig,
    pub(crate) grid: Grid,
    /// Insertion order is turn order for the scripted controller
    pub(crate) entities: Vec<Entity>,
    pub(crate) players: [PlayerState; 2],
    pub(crate) turn_number: u32,
    pub(crate) active_owner: PlayerId,
    pub(crate) phase: TurnPhase,
    /// Drives the scripted controller's dice; seeded from the map seed
    pub(crate) rng: StdRng,
    pub(crate) bus: EventBus,
}

impl GameState {
    /// Creates an engine and generates its map.
    ///
    /// # Examples
    ///
    /// ```
    /// use whitebox::{GameConfig, GameState, PlayerId, Position};
    ///
    /// let state = GameState::new(GameConfig::default()).unwrap();
    /// assert_eq!(state.turn_number(), 1);
    /// assert_eq!(state.active_owner(), PlayerId::Player);
    /// assert!(state.city_at(Position::new(5, 5, 0)).is_some());
    /// ```
    pub fn new(config: GameConfig) -> WhiteboxResult<Self> {
        config.validate()?;
        let seed = config.map.seed;

        let mut state = Self {
            config,
            grid: Grid::new(0, 0, 0, Terrain::Void),
            entities: Vec::new(),
            players: [PlayerState::new(), PlayerState::new()],
            turn_number: 1,
            active_owner: PlayerId::Player,
            phase: TurnPhase::Input,
            rng: StdRng::seed_from_u64(seed),
            bus: EventBus::new(),
        };
        state.generate()?;
        Ok(state)
    }

    /// Generates the map from the current configuration and founds both capitals.
    ///
    /// Discards every entity. Player balances and the turn counter are left alone.
    pub fn generate(&mut self) -> WhiteboxResult<()> {
        let map = self.config.map;
        self.grid = TerrainGenerator::new().generate(&map)?;
        self.entities.clear();

        for (owner, site) in PlayerId::ALL.into_iter().zip(capital_sites(&map)) {
            if self.create_entity(CITY_KEY, site, owner, true).is_none() {
                log::warn!("Could not found capital for {} at {}", owner, site);
            }
        }

        for owner in PlayerId::ALL {
            self.calculate_income(owner);
        }
        self.update_visibility();

        log::info!(
            "Generated {}x{} map with seed {}",
            map.width,
            map.height,
            map.seed
        );
        self.emit(GameEvent::GridGenerated {
            width: map.width,
            height: map.height,
            seed: map.seed,
        });
        Ok(())
    }

    /// Regenerates with the next seed, optionally resizing to a square map.
    ///
    /// Resets both players, the turn counter and the active owner. An unusable size
    /// leaves everything untouched and returns false.
    pub fn regenerate(&mut self, new_size: Option<u32>) -> bool {
        let mut map = self.config.map;
        if let Some(size) = new_size {
            map.width = size;
            map.height = size;
        }
        map.seed = map.seed.wrapping_add(config::REGENERATE_SEED_STEP);

        if let Err(err) = map.validate() {
            log::warn!("Refusing to regenerate: {}", err);
            return false;
        }

        self.config.map = map;
        self.players = [PlayerState::new(), PlayerState::new()];
        self.turn_number = 1;
        self.active_owner = PlayerId::Player;
        self.phase = TurnPhase::Input;
        self.rng = StdRng::seed_from_u64(map.seed);

        match self.generate() {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Regeneration failed: {}", err);
                false
            }
        }
    }

    // --- Read access ---

    /// Construction-time configuration, with the current map seed.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The tile grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Every live entity in creation order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// State of one player.
    pub fn player_state(&self, owner: PlayerId) -> &PlayerState {
        &self.players[owner.index()]
    }

    pub(crate) fn player_state_mut(&mut self, owner: PlayerId) -> &mut PlayerState {
        &mut self.players[owner.index()]
    }

    /// Current turn, starting at 1 and advancing when control returns to the human.
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Owner whose turn it is.
    pub fn active_owner(&self) -> PlayerId {
        self.active_owner
    }

    /// Current phase of the turn cycle.
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Current map seed.
    pub fn seed(&self) -> u64 {
        self.config.map.seed
    }

    /// Looks up an entity by id.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    /// The non-city entity at `pos`, if any.
    pub fn unit_at(&self, pos: Position) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|entity| entity.position == pos && !entity.is_city())
    }

    /// The city at `pos`, if any.
    pub fn city_at(&self, pos: Position) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|entity| entity.position == pos && entity.is_city())
    }

    /// Cities owned by `owner`, oldest first.
    pub fn cities_of(&self, owner: PlayerId) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(move |entity| entity.is_city() && entity.owner == owner)
    }

    /// Non-city entities owned by `owner`, oldest first.
    pub fn units_of(&self, owner: PlayerId) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(move |entity| !entity.is_city() && entity.owner == owner)
    }

    /// The oldest city `owner` holds.
    pub fn capital_of(&self, owner: PlayerId) -> Option<&Entity> {
        self.cities_of(owner).next()
    }

    /// Same-layer neighbors of `pos` under the configured topology.
    pub fn neighbors_of(&self, pos: Position) -> Vec<Position> {
        self.config
            .map
            .topology
            .neighbors(pos.x, pos.y, self.grid.width(), self.grid.height())
            .into_iter()
            .map(|(x, y)| Position::new(x, y, pos.z))
            .collect()
    }

    /// Planar grid distance under the configured topology, ignoring layers.
    pub fn distance(&self, a: Position, b: Position) -> i32 {
        self.config.map.topology.distance(a.planar(), b.planar())
    }

    /// Positions within `range` steps of `center` on its layer, center first.
    pub fn tiles_in_range(&self, center: Position, range: u32) -> Vec<Position> {
        tiles_in_range(
            self.config.map.topology,
            center.x,
            center.y,
            range,
            self.grid.width(),
            self.grid.height(),
        )
        .into_iter()
        .map(|(x, y)| Position::new(x, y, center.z))
        .collect()
    }

    /// Improvement built at `pos`, if any.
    pub fn improvement_at(&self, pos: Position) -> Option<&str> {
        self.grid.get(pos).and_then(|tile| tile.improvement.as_deref())
    }

    // --- Entity commands ---

    /// Spawns an entity from its definition.
    ///
    /// Fails on invalid or Void coordinates, unknown definitions, an occupied slot (one
    /// unit and one city per tile) or, unless `ignore_cost`, an unaffordable cost.
    /// Cities claim their surrounding territory on creation.
    pub fn create_entity(
        &mut self,
        key: &str,
        pos: Position,
        owner: PlayerId,
        ignore_cost: bool,
    ) -> Option<EntityId> {
        match self.grid.terrain(pos) {
            Some(terrain) if !terrain.is_void() => {}
            _ => return None,
        }
        let components = self.config.rules.unit(key)?.components.clone();
        let is_city = key == CITY_KEY;

        let occupied = if is_city {
            self.city_at(pos).is_some()
        } else {
            self.unit_at(pos).is_some()
        };
        if occupied {
            return None;
        }

        let cost = components.cost_stars();
        if !ignore_cost && cost > 0 {
            let player = self.player_state_mut(owner);
            if player.stars < cost {
                return None;
            }
            player.stars -= cost;
            self.publish_economy(owner);
        }

        let entity = if is_city {
            Entity::city(key, city_name(pos, self.seed()), pos, owner, components)
        } else {
            Entity::unit(key, pos, owner, components)
        };
        let id = entity.id;
        self.entities.push(entity);
        log::debug!("Spawned {} {} for {} at {}", key, id, owner, pos);

        if is_city {
            self.claim_territory(id, owner, pos);
        }

        self.emit(GameEvent::EntitySpawned {
            entity_id: id,
            type_key: key.to_string(),
            position: pos,
            owner,
        });
        if owner.is_human() {
            self.update_visibility();
        }
        Some(id)
    }

    /// Removes an entity immediately and recomputes visibility.
    pub fn destroy_entity(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|entity| entity.id == id)?;
        let entity = self.entities.remove(index);

        if entity.is_city() {
            for tile in self.grid.tiles_mut() {
                if tile.city == Some(id) {
                    tile.city = None;
                }
            }
        }

        log::debug!("Destroyed {} {}", entity.type_key, id);
        self.update_visibility();
        Some(entity)
    }

    /// Moves a unit to `target` or attacks the enemy standing there.
    ///
    /// The unit must belong to the active owner and `target` must be in its valid move
    /// set. Moving onto an enemy city captures it.
    pub fn move_unit(&mut self, id: EntityId, target: Position) -> bool {
        let Some(unit) = self.entity(id) else {
            return false;
        };
        if unit.owner != self.active_owner {
            return false;
        }
        let owner = unit.owner;
        let from = unit.position;

        let Some(chosen) = self
            .get_valid_moves(id)
            .into_iter()
            .find(|m| m.position == target)
        else {
            return false;
        };

        if chosen.is_attack {
            let Some(defender) = self.unit_at(target).map(|entity| entity.id) else {
                return false;
            };
            self.resolve_combat(id, defender);
            if let Some(unit) = self.entity_mut(id) {
                unit.has_acted = true;
            }
            self.emit(GameEvent::EntityMoved {
                entity_id: id,
                from,
                to: target,
                kind: MoveKind::Combat,
            });
            return true;
        }

        if let Some(unit) = self.entity_mut(id) {
            unit.position = target;
            unit.has_acted = true;
        }
        log::debug!("{} moved {} from {} to {}", owner, id, from, target);

        if let Some(city) = self
            .city_at(target)
            .filter(|city| city.owner != owner)
            .map(|city| city.id)
        {
            self.capture_city(city, owner);
        }

        if owner.is_human() {
            self.update_visibility();
        }
        self.emit(GameEvent::EntityMoved {
            entity_id: id,
            from,
            to: target,
            kind: MoveKind::Move,
        });
        true
    }

    /// Hands a city and its territory to `new_owner`.
    fn capture_city(&mut self, city_id: EntityId, new_owner: PlayerId) {
        let Some(city) = self.entity_mut(city_id) else {
            return;
        };
        let previous = city.owner;
        let pos = city.position;
        city.owner = new_owner;
        log::info!("{} captured a city from {} at {}", new_owner, previous, pos);

        self.claim_territory(city_id, new_owner, pos);
        self.calculate_income(previous);
        self.calculate_income(new_owner);
        self.publish_city(city_id);

        if new_owner.is_human() || previous.is_human() {
            self.update_visibility();
        }
    }

    /// Claims every tile within the territory radius of `center` for a city.
    fn claim_territory(&mut self, city_id: EntityId, owner: PlayerId, center: Position) {
        for pos in self.tiles_in_range(center, config::TERRITORY_RADIUS) {
            if let Some(tile) = self.grid.get_mut(pos) {
                tile.claim(owner, city_id);
            }
        }
    }

    /// Changes one tile's terrain.
    ///
    /// Returns false for invalid coordinates, an unchanged terrain, or an attempt to
    /// turn an occupied tile into Void.
    pub fn set_terrain(&mut self, pos: Position, terrain: Terrain) -> bool {
        if terrain.is_void() && self.entities.iter().any(|entity| entity.position == pos) {
            return false;
        }
        match self.grid.get_mut(pos) {
            Some(tile) if tile.terrain != terrain => tile.set_terrain(terrain),
            _ => return false,
        }
        self.publish_tile(pos);
        true
    }

    // --- Events ---

    /// Takes an owned copy of the whole state.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            seed: self.seed(),
            grid: self.grid.clone(),
            entities: self.entities.clone(),
            players: self.players.clone(),
            turn_number: self.turn_number,
            active_owner: self.active_owner,
            phase: self.phase,
        }
    }

    /// Subscribes to one topic.
    pub fn subscribe(&mut self, topic: EventTopic, callback: EventCallback) -> SubscriptionId {
        self.bus.subscribe(topic, callback)
    }

    /// Subscribes to every topic.
    pub fn subscribe_all(&mut self, callback: EventCallback) -> SubscriptionId {
        self.bus.subscribe_all(callback)
    }

    /// Removes a subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Publishes an event with a post-mutation snapshot. Snapshots are only taken when
    /// someone is listening.
    pub(crate) fn emit(&mut self, event: GameEvent) {
        if !self.bus.has_subscribers(event.topic()) {
            return;
        }
        let snapshot = self.snapshot();
        self.bus.dispatch(&event, &snapshot);
    }

    /// Announces a player's economy. Only the human's economy is public.
    pub(crate) fn publish_economy(&mut self, owner: PlayerId) {
        if !owner.is_human() {
            return;
        }
        let player = self.player_state(owner);
        let event = GameEvent::EconomyUpdated {
            owner,
            stars: player.stars,
            income: player.income,
            unlocked_techs: player.unlocked_techs.iter().cloned().collect(),
        };
        self.emit(event);
    }

    pub(crate) fn publish_city(&mut self, city_id: EntityId) {
        if let Some(city) = self.entity(city_id).cloned() {
            self.emit(GameEvent::CityUpdated { city });
        }
    }

    pub(crate) fn publish_tile(&mut self, pos: Position) {
        if let Some(tile) = self.grid.get(pos) {
            let event = GameEvent::TileUpdated {
                position: pos,
                terrain: tile.terrain,
                improvement: tile.improvement.clone(),
                owner: tile.owner,
            };
            self.emit(event);
        }
    }

    /// City-only state of `city_id`, if it is a city.
    pub(crate) fn city_data_mut(&mut self, city_id: EntityId) -> Option<&mut CityData> {
        self.entity_mut(city_id).and_then(|entity| entity.city.as_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::flat_state;
    use crate::rules::BASIC_UNIT_KEY;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_new_state_founds_both_capitals() {
        let state = GameState::new(GameConfig::default()).unwrap();
        let human = state.city_at(Position::new(5, 5, 0)).unwrap();
        assert_eq!(human.owner, PlayerId::Player);
        let ai = state.city_at(Position::new(9, 9, 0)).unwrap();
        assert_eq!(ai.owner, PlayerId::EnemyAi);

        let player = state.player_state(PlayerId::Player);
        assert_eq!(player.stars, 10);
        assert_eq!(player.income, 6);
        assert_eq!(state.player_state(PlayerId::EnemyAi).income, 6);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let config = GameConfig::with_map(MapConfig::new(2, 2, 1));
        assert!(GameState::new(config).is_err());
    }

    #[test]
    fn test_capital_claims_territory() {
        let state = flat_state();
        let capital = state.capital_of(PlayerId::Player).unwrap();
        for pos in state.tiles_in_range(capital.position, 1) {
            let tile = state.grid().get(pos).unwrap();
            assert_eq!(tile.owner, Some(PlayerId::Player));
            assert_eq!(tile.city, Some(capital.id));
        }
    }

    #[test]
    fn test_create_entity_charges_cost() {
        let mut state = flat_state();
        let id = state
            .create_entity(BASIC_UNIT_KEY, Position::new(1, 1, 0), PlayerId::Player, false)
            .unwrap();
        assert_eq!(state.player_state(PlayerId::Player).stars, 8);
        assert_eq!(state.entity(id).unwrap().owner, PlayerId::Player);
    }

    #[test]
    fn test_create_entity_rejections() {
        let mut state = flat_state();
        let pos = Position::new(1, 1, 0);
        assert!(state
            .create_entity("unknown", pos, PlayerId::Player, true)
            .is_none());
        assert!(state
            .create_entity(BASIC_UNIT_KEY, Position::new(1, 1, 1), PlayerId::Player, true)
            .is_none());
        assert!(state
            .create_entity(BASIC_UNIT_KEY, Position::new(-1, 1, 0), PlayerId::Player, true)
            .is_none());

        state.player_state_mut(PlayerId::Player).stars = 1;
        assert!(state
            .create_entity(BASIC_UNIT_KEY, pos, PlayerId::Player, false)
            .is_none());
        assert_eq!(state.player_state(PlayerId::Player).stars, 1);

        assert!(state
            .create_entity(BASIC_UNIT_KEY, pos, PlayerId::EnemyAi, true)
            .is_some());
        assert!(state
            .create_entity(BASIC_UNIT_KEY, pos, PlayerId::Player, true)
            .is_none());
    }

    #[test]
    fn test_unit_and_city_share_a_tile() {
        let mut state = flat_state();
        let capital = Position::new(5, 5, 0);
        assert!(state
            .create_entity(BASIC_UNIT_KEY, capital, PlayerId::Player, true)
            .is_some());
        assert!(state
            .create_entity(CITY_KEY, capital, PlayerId::Player, true)
            .is_none());
    }

    #[test]
    fn test_move_unit() {
        let mut state = flat_state();
        let from = Position::new(2, 2, 0);
        let id = state
            .create_entity(BASIC_UNIT_KEY, from, PlayerId::Player, true)
            .unwrap();
        let to = state.neighbors_of(from)[0];

        assert!(state.move_unit(id, to));
        let unit = state.entity(id).unwrap();
        assert_eq!(unit.position, to);
        assert!(unit.has_acted);
        assert!(!state.move_unit(id, from));
    }

    #[test]
    fn test_move_unit_requires_active_owner() {
        let mut state = flat_state();
        let from = Position::new(2, 2, 0);
        let id = state
            .create_entity(BASIC_UNIT_KEY, from, PlayerId::EnemyAi, true)
            .unwrap();
        let to = state.neighbors_of(from)[0];
        assert!(!state.move_unit(id, to));
    }

    #[test]
    fn test_moving_onto_enemy_city_captures_it() {
        let mut state = flat_state();
        let ai_capital = Position::new(9, 9, 0);
        let from = state.neighbors_of(ai_capital)[0];
        let id = state
            .create_entity(BASIC_UNIT_KEY, from, PlayerId::Player, true)
            .unwrap();

        assert!(state.move_unit(id, ai_capital));
        let city = state.city_at(ai_capital).unwrap();
        assert_eq!(city.owner, PlayerId::Player);
        assert_eq!(
            state.grid().get(from).unwrap().owner,
            Some(PlayerId::Player)
        );
        assert_eq!(state.player_state(PlayerId::Player).income, 7);
        assert_eq!(state.player_state(PlayerId::EnemyAi).income, 5);
        assert!(state.capital_of(PlayerId::EnemyAi).is_none());
    }

    #[test]
    fn test_set_terrain() {
        let mut state = flat_state();
        let pos = Position::new(1, 1, 0);
        assert!(state.set_terrain(pos, Terrain::Mountain));
        assert!(!state.set_terrain(pos, Terrain::Mountain));
        assert_eq!(state.grid().terrain(pos), Some(Terrain::Mountain));

        state
            .create_entity(BASIC_UNIT_KEY, Position::new(2, 2, 0), PlayerId::Player, true)
            .unwrap();
        assert!(!state.set_terrain(Position::new(2, 2, 0), Terrain::Void));
        assert!(!state.set_terrain(Position::new(20, 2, 0), Terrain::Ground));
    }

    #[test]
    fn test_regenerate_bumps_seed_and_resets() {
        let mut state = GameState::new(GameConfig::default()).unwrap();
        state.player_state_mut(PlayerId::Player).stars = 99;
        state.turn_number = 7;

        assert!(state.regenerate(Some(12)));
        assert_eq!(state.seed(), config::DEFAULT_SEED + config::REGENERATE_SEED_STEP);
        assert_eq!(state.grid().width(), 12);
        assert_eq!(state.turn_number(), 1);
        assert_eq!(state.player_state(PlayerId::Player).stars, 10);
        assert_eq!(state.cities_of(PlayerId::Player).count(), 1);
        assert_eq!(state.entities().len(), 2);
    }

    #[test]
    fn test_regenerate_rejects_tiny_maps() {
        let mut state = GameState::new(GameConfig::default()).unwrap();
        let before = state.snapshot();
        assert!(!state.regenerate(Some(3)));
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_events_carry_post_mutation_snapshot() {
        let mut state = flat_state();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        state.subscribe(
            EventTopic::EntitySpawned,
            Box::new(move |event: &GameEvent, snapshot: &GameSnapshot| {
                if let GameEvent::EntitySpawned { entity_id, .. } = event {
                    sink.borrow_mut().push(snapshot.entity(*entity_id).is_some());
                }
            }),
        );

        state.create_entity(BASIC_UNIT_KEY, Position::new(1, 1, 0), PlayerId::Player, true);
        assert_eq!(*seen.borrow(), vec![true]);
    }
}
