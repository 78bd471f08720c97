//! # World Representation
//!
//! Tiles and the layered grid that holds them.
//!
//! The grid is stored as `[z][y][x]`. Tiles are created once by generation and then
//! mutated in place for the rest of the session; they are never removed individually.

use crate::game::{EntityId, PlayerId, Position};
use crate::utils::in_bounds;
use serde::{Deserialize, Serialize};

/// Terrain kinds a tile can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Ground,
    Water,
    Mountain,
    /// Empty space: no resource, improvement, owner or entity may ever sit here
    Void,
}

impl Terrain {
    /// Whether this is empty space.
    pub fn is_void(self) -> bool {
        self == Terrain::Void
    }
}

/// Fog-of-war state of a tile as seen by the human player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Visibility {
    /// Never seen
    #[default]
    Hidden,
    /// Terrain known, contents stale
    Fogged,
    /// Currently observed
    Visible,
}

/// Harvestable resources decorating a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Fruit,
    Game,
    Ore,
    Fish,
}

/// A single map cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Where this tile sits
    pub position: Position,
    /// Terrain kind
    pub terrain: Terrain,
    /// Human fog-of-war state
    pub visibility: Visibility,
    /// Optional resource
    pub resource: Option<Resource>,
    /// Constructed improvement id
    pub improvement: Option<String>,
    /// Territory owner
    pub owner: Option<PlayerId>,
    /// City that manages this tile
    pub city: Option<EntityId>,
}

impl Tile {
    /// Creates an undecorated, unowned, hidden tile.
    pub fn new(position: Position, terrain: Terrain) -> Self {
        Self {
            position,
            terrain,
            visibility: Visibility::Hidden,
            resource: None,
            improvement: None,
            owner: None,
            city: None,
        }
    }

    /// Assigns this tile to a city's territory.
    ///
    /// Returns false and leaves the tile untouched when it is Void.
    pub fn claim(&mut self, owner: PlayerId, city: EntityId) -> bool {
        if self.terrain.is_void() {
            return false;
        }
        self.owner = Some(owner);
        self.city = Some(city);
        true
    }

    /// Sets the terrain, stripping everything a Void tile may not carry.
    pub fn set_terrain(&mut self, terrain: Terrain) {
        self.terrain = terrain;
        if terrain.is_void() {
            self.resource = None;
            self.improvement = None;
            self.owner = None;
            self.city = None;
        }
    }
}

/// The layered tile grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
    layers: Vec<Vec<Vec<Tile>>>,
}

impl Grid {
    /// Creates a grid of the given size with every tile set to `fill`.
    ///
    /// # Examples
    ///
    /// ```
    /// use whitebox::{Grid, Position, Terrain};
    ///
    /// let grid = Grid::new(4, 3, 2, Terrain::Void);
    /// assert_eq!(grid.depth(), 2);
    /// assert!(grid.is_valid(Position::new(3, 2, 1)));
    /// assert!(!grid.is_valid(Position::new(4, 0, 0)));
    /// ```
    pub fn new(width: u32, height: u32, depth: usize, fill: Terrain) -> Self {
        let layers = (0..depth)
            .map(|z| {
                (0..height)
                    .map(|y| {
                        (0..width)
                            .map(|x| Tile::new(Position::new(x as i32, y as i32, z as i32), fill))
                            .collect()
                    })
                    .collect()
            })
            .collect();

        Self {
            width,
            height,
            layers,
        }
    }

    /// Width in tiles.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in tiles.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of layers.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Central coordinate guard: whether `pos` addresses a tile of this grid.
    pub fn is_valid(&self, pos: Position) -> bool {
        pos.z >= 0 && (pos.z as usize) < self.layers.len() && in_bounds(pos.x, pos.y, self.width, self.height)
    }

    /// Gets the tile at `pos`.
    pub fn get(&self, pos: Position) -> Option<&Tile> {
        if !self.is_valid(pos) {
            return None;
        }
        self.layers
            .get(pos.z as usize)
            .and_then(|layer| layer.get(pos.y as usize))
            .and_then(|row| row.get(pos.x as usize))
    }

    /// Gets the tile at `pos` mutably.
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        if !self.is_valid(pos) {
            return None;
        }
        self.layers
            .get_mut(pos.z as usize)
            .and_then(|layer| layer.get_mut(pos.y as usize))
            .and_then(|row| row.get_mut(pos.x as usize))
    }

    /// Terrain at `pos`, if valid.
    pub fn terrain(&self, pos: Position) -> Option<Terrain> {
        self.get(pos).map(|tile| tile.terrain)
    }

    /// Iterates over every tile, layer by layer, row by row.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.layers.iter().flatten().flatten()
    }

    /// Iterates over every tile mutably.
    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.layers.iter_mut().flatten().flatten()
    }

    /// Iterates over the tiles of one layer.
    pub fn layer(&self, z: usize) -> impl Iterator<Item = &Tile> {
        self.layers.get(z).into_iter().flatten().flatten()
    }
}
