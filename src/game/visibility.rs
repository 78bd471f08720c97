//! # Fog of War
//!
//! Tri-state visibility for the human player. The scripted opponent sees everything.

use crate::game::{GameEvent, GameState, Position, Visibility};
use std::collections::HashSet;

impl GameState {
    /// Every tile a human-owned entity currently observes, on that entity's layer.
    pub fn visible_positions(&self) -> HashSet<Position> {
        self.entities
            .iter()
            .filter(|entity| entity.owner.is_human())
            .flat_map(|entity| {
                let range = entity.vision_range() + self.config.rules.building_bonus(entity).vision;
                self.tiles_in_range(entity.position, range)
            })
            .collect()
    }

    /// Reclassifies every tile's visibility.
    ///
    /// Observed tiles become Visible, previously Visible tiles outside the observed set
    /// drop to Fogged, and Hidden tiles stay Hidden. Emits one fog event when anything
    /// changed and returns whether it did.
    pub fn update_visibility(&mut self) -> bool {
        let visible = self.visible_positions();
        let mut changed = 0;

        for tile in self.grid.tiles_mut() {
            let next = if visible.contains(&tile.position) {
                Visibility::Visible
            } else if tile.visibility == Visibility::Visible {
                Visibility::Fogged
            } else {
                tile.visibility
            };
            if next != tile.visibility {
                tile.visibility = next;
                changed += 1;
            }
        }

        if changed == 0 {
            return false;
        }
        log::debug!("Fog updated: {} tiles changed", changed);
        self.emit(GameEvent::FogUpdated { changed });
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::game::test_support::flat_state;
    use crate::game::{EventTopic, GameEvent, GameSnapshot, PlayerId, Position, Visibility};
    use crate::rules::{BuildingDefinition, BuildingStats, BASIC_UNIT_KEY};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_capital_reveals_radius_two() {
        let state = flat_state();
        let visible = state
            .grid()
            .tiles()
            .filter(|tile| tile.visibility == Visibility::Visible)
            .count();
        // Capital at (5,5) with default vision 2 on a hex map
        assert_eq!(visible, 19);
        assert_eq!(
            state.grid().get(Position::new(5, 5, 1)).unwrap().visibility,
            Visibility::Hidden
        );
    }

    #[test]
    fn test_building_vision_widens_city_sight() {
        let mut state = flat_state();
        let far = Position::new(5, 8, 0);
        assert_eq!(state.grid().get(far).unwrap().visibility, Visibility::Hidden);

        state.config.rules.buildings.insert(
            "watchtower".to_string(),
            BuildingDefinition {
                id: "watchtower".to_string(),
                name: "Watchtower".to_string(),
                cost: 3,
                tech_required: None,
                stats: BuildingStats {
                    vision: 1,
                    ..BuildingStats::default()
                },
            },
        );
        let capital = state.capital_of(PlayerId::Player).unwrap().id;
        state
            .city_data_mut(capital)
            .unwrap()
            .buildings
            .push("watchtower".to_string());
        state.update_visibility();

        assert_eq!(state.grid().get(far).unwrap().visibility, Visibility::Visible);
        let visible = state
            .grid()
            .tiles()
            .filter(|tile| tile.visibility == Visibility::Visible)
            .count();
        assert_eq!(visible, 37);
    }

    #[test]
    fn test_enemy_entities_reveal_nothing() {
        let state = flat_state();
        assert_eq!(
            state.grid().get(Position::new(9, 9, 0)).unwrap().visibility,
            Visibility::Hidden
        );
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut state = flat_state();
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        state.subscribe(
            EventTopic::FogUpdated,
            Box::new(move |_: &GameEvent, _: &GameSnapshot| {
                counter.set(counter.get() + 1)
            }),
        );

        state.grid.get_mut(Position::new(0, 0, 0)).unwrap().visibility = Visibility::Visible;
        assert!(state.update_visibility());
        assert!(!state.update_visibility());
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_leaving_a_tile_fogs_it() {
        let mut state = flat_state();
        let start = Position::new(1, 1, 0);
        let id = state
            .create_entity(BASIC_UNIT_KEY, start, PlayerId::Player, true)
            .unwrap();
        assert_eq!(
            state.grid().get(Position::new(0, 1, 0)).unwrap().visibility,
            Visibility::Visible
        );

        state.destroy_entity(id);
        assert_eq!(
            state.grid().get(Position::new(0, 1, 0)).unwrap().visibility,
            Visibility::Fogged
        );
        assert_eq!(
            state.grid().get(Position::new(0, 0, 0)).unwrap().visibility,
            Visibility::Hidden
        );
    }
}
