//! # Game Module
//!
//! Core game state management, world representation, and the rule systems.
//!
//! This module contains the fundamental building blocks of the engine:
//! - Tiles, layers and the grid ([`world`])
//! - Entities and their typed capability components ([`entities`])
//! - The typed event channel ([`events`])
//! - The engine state and its commands ([`state`]), with the rule systems split out by
//!   concern: [`visibility`], [`combat`], [`economy`], [`research`] and [`turn`]

pub mod combat;
pub mod economy;
pub mod entities;
pub mod events;
pub mod research;
pub mod state;
pub mod turn;
pub mod visibility;
pub mod world;

pub use combat::*;
pub use economy::*;
pub use entities::*;
pub use events::*;
pub use research::*;
pub use state::*;
pub use turn::*;
pub use visibility::*;
pub use world::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tile address: `(x, y)` on the map plus the vertical layer `z`.
///
/// # Examples
///
/// ```
/// use whitebox::Position;
///
/// let pos = Position::new(10, 5, 0);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.planar(), (10, 5));
/// assert_eq!(pos.with_layer(1), Position::new(10, 5, 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the planar `(x, y)` part of this position.
    pub fn planar(self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Returns the same planar cell on another layer.
    pub fn with_layer(self, z: i32) -> Self {
        Self::new(self.x, self.y, z)
    }

    /// Returns this position shifted by a planar and vertical delta.
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// The two fixed owners of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerId {
    /// The human-controlled side
    Player,
    /// The scripted opponent
    EnemyAi,
}

impl PlayerId {
    /// Both owners, human first.
    pub const ALL: [PlayerId; 2] = [PlayerId::Player, PlayerId::EnemyAi];

    /// Stable index used for per-player storage.
    pub fn index(self) -> usize {
        match self {
            PlayerId::Player => 0,
            PlayerId::EnemyAi => 1,
        }
    }

    /// The other owner.
    pub fn opponent(self) -> PlayerId {
        match self {
            PlayerId::Player => PlayerId::EnemyAi,
            PlayerId::EnemyAi => PlayerId::Player,
        }
    }

    /// Whether this owner is driven by the human.
    pub fn is_human(self) -> bool {
        self == PlayerId::Player
    }

    /// Wire name of this owner.
    pub fn as_str(self) -> &'static str {
        match self {
            PlayerId::Player => "player",
            PlayerId::EnemyAi => "enemy_ai",
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique identifier for game entities.
pub type EntityId = Uuid;

/// Creates a new unique entity ID.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4()
}

/// Fixtures shared by the unit tests of the game systems.
#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::{GameConfig, MapConfig};

    /// A default-rules engine whose surface is flattened to plain Ground with no
    /// resources and whose sky layer is entirely Void.
    ///
    /// Capitals stay where generation put them: (5,5,0) for the player and (9,9,0)
    /// for the AI on the 10×10 default.
    pub(crate) fn flat_state() -> GameState {
        flat_state_with(MapConfig::default())
    }

    pub(crate) fn flat_state_with(map: MapConfig) -> GameState {
        let mut state = GameState::new(GameConfig::with_map(map)).unwrap();
        for tile in state.grid.tiles_mut() {
            if tile.position.z == 0 {
                tile.terrain = Terrain::Ground;
                tile.resource = None;
            } else {
                tile.terrain = Terrain::Void;
                tile.resource = None;
                tile.improvement = None;
                tile.owner = None;
                tile.city = None;
            }
        }
        state
    }
}
