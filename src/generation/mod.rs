//! # Generation Module
//!
//! Deterministic procedural generation of the layered map.
//!
//! Generation is driven entirely by a hashed noise function of `(x, y, channel, seed)`,
//! so there is no random-number-generator state: the same [`MapConfig`] always yields
//! the same grid, and regenerating only needs a different seed.

pub mod terrain;

pub use terrain::*;

use crate::game::{Grid, Position, Terrain};
use crate::utils::GridTopology;
use crate::{config, WhiteboxError, WhiteboxResult};
use serde::{Deserialize, Serialize};

/// Names handed out to founded cities.
pub const CITY_NAMES: [&str; 14] = [
    "Imperius", "Bardur", "Oumaji", "Kickoo", "Zebasi", "Ai-Mo", "Quetzali", "Yadakk", "Xin-Xi",
    "Luxidoor", "Vengir", "Elyrion", "Aquarion", "Polaris",
];

/// Noise channel used to pick city names.
pub const NAME_CHANNEL: i32 = 202;

/// Configuration for map generation.
///
/// # Examples
///
/// ```
/// use whitebox::{GridTopology, MapConfig};
///
/// let config = MapConfig::default();
/// assert_eq!((config.width, config.height), (10, 10));
/// assert_eq!(config.topology, GridTopology::Hex);
/// assert!(config.validate().is_ok());
/// assert!(MapConfig::new(3, 10, 1).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Map width in tiles
    pub width: u32,
    /// Map height in tiles
    pub height: u32,
    /// Noise seed
    pub seed: u64,
    /// Neighborhood and distance rules
    #[serde(default)]
    pub topology: GridTopology,
}

impl MapConfig {
    /// Creates a hex map configuration.
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        Self {
            width,
            height,
            seed,
            topology: GridTopology::Hex,
        }
    }

    /// Returns this configuration with another topology.
    pub fn with_topology(mut self, topology: GridTopology) -> Self {
        self.topology = topology;
        self
    }

    /// Checks that both capitals fit on the map.
    pub fn validate(&self) -> WhiteboxResult<()> {
        if self.width < config::MIN_MAP_SIZE || self.height < config::MIN_MAP_SIZE {
            return Err(WhiteboxError::InvalidConfig(format!(
                "map must be at least {0}x{0}, got {1}x{2}",
                config::MIN_MAP_SIZE,
                self.width,
                self.height
            )));
        }
        Ok(())
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self::new(
            config::DEFAULT_MAP_WIDTH,
            config::DEFAULT_MAP_HEIGHT,
            config::DEFAULT_SEED,
        )
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content from the configuration.
    fn generate(&self, config: &MapConfig) -> WhiteboxResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &MapConfig) -> WhiteboxResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// The two capital sites, human first.
///
/// The human capital sits at the map center. The AI capital is offset diagonally from
/// it; a coordinate that would leave the map is pulled back to `dim - 2`.
///
/// # Examples
///
/// ```
/// use whitebox::{capital_sites, MapConfig, Position};
///
/// let [human, ai] = capital_sites(&MapConfig::default());
/// assert_eq!(human, Position::new(5, 5, 0));
/// assert_eq!(ai, Position::new(9, 9, 0));
/// ```
pub fn capital_sites(config: &MapConfig) -> [Position; 2] {
    let cx = (config.width / 2) as i32;
    let cy = (config.height / 2) as i32;

    let clamp = |value: i32, dim: u32| {
        if value >= dim as i32 {
            dim as i32 - 2
        } else {
            value
        }
    };
    let ex = clamp(cx + config::AI_CAPITAL_OFFSET, config.width);
    let ey = clamp(cy + config::AI_CAPITAL_OFFSET, config.height);

    [Position::new(cx, cy, 0), Position::new(ex, ey, 0)]
}

/// Forces the 3×3 block around `center` to resource-free Ground.
pub fn clear_land(grid: &mut Grid, center: Position) {
    for dy in -1..=1 {
        for dx in -1..=1 {
            if let Some(tile) = grid.get_mut(center.offset(dx, dy, 0)) {
                tile.terrain = Terrain::Ground;
                tile.resource = None;
            }
        }
    }
}

/// Deterministic city name for a site.
pub fn city_name(pos: Position, seed: u64) -> &'static str {
    let roll = pseudo_random(pos.x, pos.y, NAME_CHANNEL, seed);
    let index = ((roll * CITY_NAMES.len() as f64) as usize).min(CITY_NAMES.len() - 1);
    CITY_NAMES[index]
}
