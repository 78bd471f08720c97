//! # Nation Presets
//!
//! Optional per-side starting conditions: star balance, pre-unlocked technologies and
//! starting units placed around the capital.

use crate::game::{EntityId, GameState, PlayerId, Position};
use crate::utils::terrain_passable;
use crate::{WhiteboxError, WhiteboxResult};
use serde::{Deserialize, Serialize};

/// One unit a nation starts with.
///
/// With `spawn_near_capital` the unit goes to the first free passable neighbor of the
/// capital. Otherwise `x`/`y`/`z` are offsets from the capital.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartingUnit {
    #[serde(rename = "type")]
    pub unit_type: String,
    #[serde(default)]
    pub spawn_near_capital: bool,
    #[serde(default)]
    pub x: Option<i32>,
    #[serde(default)]
    pub y: Option<i32>,
    #[serde(default)]
    pub z: Option<i32>,
}

/// A nation preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nation {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub starting_stars: Option<u32>,
    #[serde(default)]
    pub start_techs: Vec<String>,
    #[serde(default)]
    pub starting_units: Vec<StartingUnit>,
}

impl Nation {
    /// Parses a nation preset from JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// use whitebox::Nation;
    ///
    /// let nation = Nation::from_json(r#"{ "id": "oumaji", "startingStars": 12 }"#).unwrap();
    /// assert_eq!(nation.starting_stars, Some(12));
    /// assert!(nation.starting_units.is_empty());
    /// ```
    pub fn from_json(json: &str) -> WhiteboxResult<Self> {
        let nation: Nation = serde_json::from_str(json)?;
        if nation.id.is_empty() {
            return Err(WhiteboxError::InvalidConfig(
                "nation preset has an empty id".to_string(),
            ));
        }
        Ok(nation)
    }
}

impl GameState {
    /// Applies a nation preset to `owner` and returns the ids of the units it spawned.
    ///
    /// Starting units are free. Units whose target tile is invalid or occupied are
    /// skipped; without a capital only `spawn_near_capital == false` units with
    /// absolute coordinates can be placed.
    pub fn apply_nation(&mut self, owner: PlayerId, nation: &Nation) -> Vec<EntityId> {
        log::info!("Applying nation '{}' to {}", nation.id, owner);

        {
            let player = self.player_state_mut(owner);
            if let Some(stars) = nation.starting_stars {
                player.stars = stars;
            }
            for tech in &nation.start_techs {
                player.unlocked_techs.insert(tech.clone());
            }
        }
        self.publish_economy(owner);

        let capital = self.capital_of(owner).map(|city| city.position);
        let mut spawned = Vec::new();

        for unit in &nation.starting_units {
            let target = match (capital, unit.spawn_near_capital) {
                (Some(capital), true) => Some(self.free_spawn_near(capital, &unit.unit_type)),
                (Some(capital), false) => match (unit.x, unit.y) {
                    (Some(dx), Some(dy)) => Some(capital.offset(dx, dy, unit.z.unwrap_or(0))),
                    _ => None,
                },
                (None, false) => match (unit.x, unit.y) {
                    (Some(x), Some(y)) => Some(Position::new(x, y, unit.z.unwrap_or(0))),
                    _ => None,
                },
                (None, true) => None,
            };

            let Some(target) = target else {
                log::debug!("No placement for starting unit '{}'", unit.unit_type);
                continue;
            };

            if let Some(id) = self.create_entity(&unit.unit_type, target, owner, true) {
                spawned.push(id);
            }
        }

        self.update_visibility();
        spawned
    }

    /// First neighbor of `capital` on its layer that is free and passable for
    /// `unit_type`, falling back to the capital tile itself.
    fn free_spawn_near(&self, capital: Position, unit_type: &str) -> Position {
        let can_fly = self
            .config
            .rules
            .unit(unit_type)
            .map(|def| def.components.flying)
            .unwrap_or(false);

        self.neighbors_of(capital)
            .into_iter()
            .find(|&pos| {
                self.unit_at(pos).is_none()
                    && self
                        .grid
                        .terrain(pos)
                        .map(|terrain| terrain_passable(terrain, can_fly, false))
                        .unwrap_or(false)
            })
            .unwrap_or(capital)
    }
}
