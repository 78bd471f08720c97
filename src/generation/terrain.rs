//! # Terrain Generation
//!
//! Noise-based two-layer terrain with smoothing, cellular-automaton cleanup and
//! resource decoration.
//!
//! Layer 0 is the surface: smoothed noise thresholded into continents, cleaned of lone
//! pixels, then decorated with mountains and resources. Layer 1 is the sky: raw noise
//! thresholded high so only scattered islands of Ground float in the Void.

use crate::game::{Grid, Position, Resource, Terrain};
use crate::generation::{capital_sites, clear_land, Generator, MapConfig};
use crate::utils::{in_bounds, SMOOTHING_OFFSETS};
use crate::{config, WhiteboxError, WhiteboxResult};

/// Noise channel for mountains.
pub const MOUNTAIN_CHANNEL: i32 = 99;

/// Noise channel for resources.
pub const RESOURCE_CHANNEL: i32 = 101;

/// Hashed pseudo-noise in `[0, 1)`.
///
/// Pure: identical inputs always give identical output.
///
/// # Examples
///
/// ```
/// use whitebox::pseudo_random;
///
/// let a = pseudo_random(3, 4, 0, 12345);
/// assert_eq!(a, pseudo_random(3, 4, 0, 12345));
/// assert!((0.0..1.0).contains(&a));
/// ```
pub fn pseudo_random(x: i32, y: i32, channel: i32, seed: u64) -> f64 {
    let dot = x as f64 * 12.9898 + y as f64 * 78.233 + channel as f64 * 37.719 + seed as f64;
    ((dot.sin() * 43758.5453).abs()) % 1.0
}

/// One pass of an 8-neighbor box blur. Off-map neighbors are left out of the average.
pub fn smooth(map: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let height = map.len() as u32;
    let width = map.first().map(|row| row.len()).unwrap_or(0) as u32;

    map.iter()
        .enumerate()
        .map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(|(x, &value)| {
                    let (x, y) = (x as i32, y as i32);
                    let mut sum = value;
                    let mut count = 1.0;
                    for (dx, dy) in SMOOTHING_OFFSETS {
                        let (nx, ny) = (x + dx, y + dy);
                        if in_bounds(nx, ny, width, height) {
                            sum += map[ny as usize][nx as usize];
                            count += 1.0;
                        }
                    }
                    sum / count
                })
                .collect()
        })
        .collect()
}

/// Terrain generator with tunable thresholds.
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    /// Smoothed surface noise above this is land
    pub land_threshold: f64,
    /// Raw sky noise above this is a floating island
    pub sky_threshold: f64,
    /// Mountain noise above this raises a mountain
    pub mountain_threshold: f64,
    /// Resource noise above this puts ore in a new mountain
    pub ore_threshold: f64,
    /// Resource noise above this puts game on ground
    pub game_threshold: f64,
    /// Resource noise above this puts fruit on ground
    pub fruit_threshold: f64,
    /// Resource noise above this puts fish in water
    pub fish_threshold: f64,
    /// Box blur passes over the surface noise
    pub smoothing_passes: usize,
    /// Cellular-automaton cleanup passes over the surface
    pub cleanup_passes: usize,
}

impl TerrainGenerator {
    /// Creates a generator with the standard thresholds.
    pub fn new() -> Self {
        Self {
            land_threshold: 0.48,
            sky_threshold: 0.85,
            mountain_threshold: 0.85,
            ore_threshold: 0.6,
            game_threshold: 0.85,
            fruit_threshold: 0.70,
            fish_threshold: 0.85,
            smoothing_passes: 2,
            cleanup_passes: 2,
        }
    }

    fn noise_map(&self, config: &MapConfig, channel: i32) -> Vec<Vec<f64>> {
        (0..config.height as i32)
            .map(|y| {
                (0..config.width as i32)
                    .map(|x| pseudo_random(x, y, channel, config.seed))
                    .collect()
            })
            .collect()
    }

    fn shape_surface(&self, grid: &mut Grid, config: &MapConfig) {
        let mut noise = self.noise_map(config, 0);
        for _ in 0..self.smoothing_passes {
            noise = smooth(&noise);
        }

        for (y, row) in noise.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                if let Some(tile) = grid.get_mut(Position::new(x as i32, y as i32, 0)) {
                    tile.terrain = if value > self.land_threshold {
                        Terrain::Ground
                    } else {
                        Terrain::Water
                    };
                }
            }
        }
    }

    fn shape_sky(&self, grid: &mut Grid, config: &MapConfig) {
        for (y, row) in self.noise_map(config, 1).iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                if let Some(tile) = grid.get_mut(Position::new(x as i32, y as i32, 1)) {
                    tile.terrain = if value > self.sky_threshold {
                        Terrain::Ground
                    } else {
                        Terrain::Void
                    };
                }
            }
        }
    }

    /// Removes lone pixels: water hemmed in by land fills up, isolated land sinks.
    fn clean_surface(&self, grid: &mut Grid, config: &MapConfig) {
        for _ in 0..self.cleanup_passes {
            let mut next = Vec::new();
            for tile in grid.layer(0) {
                let (x, y) = tile.position.planar();
                let land_neighbors = config
                    .topology
                    .neighbors(x, y, config.width, config.height)
                    .into_iter()
                    .filter(|&(nx, ny)| {
                        grid.terrain(Position::new(nx, ny, 0)) != Some(Terrain::Water)
                    })
                    .count();

                let terrain = match tile.terrain {
                    Terrain::Water if land_neighbors > 3 => Terrain::Ground,
                    Terrain::Water => Terrain::Water,
                    _ if land_neighbors < 2 => Terrain::Water,
                    other => other,
                };
                next.push((tile.position, terrain));
            }

            for (pos, terrain) in next {
                if let Some(tile) = grid.get_mut(pos) {
                    tile.terrain = terrain;
                }
            }
        }
    }

    fn decorate_surface(&self, grid: &mut Grid, config: &MapConfig) {
        for tile in grid.tiles_mut().filter(|tile| tile.position.z == 0) {
            let (x, y) = tile.position.planar();
            let mountain = pseudo_random(x, y, MOUNTAIN_CHANNEL, config.seed);
            let resource = pseudo_random(x, y, RESOURCE_CHANNEL, config.seed);

            match tile.terrain {
                Terrain::Ground if mountain > self.mountain_threshold => {
                    tile.terrain = Terrain::Mountain;
                    if resource > self.ore_threshold {
                        tile.resource = Some(Resource::Ore);
                    }
                }
                Terrain::Ground if resource > self.game_threshold => {
                    tile.resource = Some(Resource::Game);
                }
                Terrain::Ground if resource > self.fruit_threshold => {
                    tile.resource = Some(Resource::Fruit);
                }
                Terrain::Water if resource > self.fish_threshold => {
                    tile.resource = Some(Resource::Fish);
                }
                _ => {}
            }
        }
    }
}

impl Default for TerrainGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator<Grid> for TerrainGenerator {
    fn generate(&self, config: &MapConfig) -> WhiteboxResult<Grid> {
        config.validate()?;

        let mut grid = Grid::new(config.width, config.height, config::LAYER_COUNT, Terrain::Void);
        self.shape_surface(&mut grid, config);
        self.shape_sky(&mut grid, config);
        self.clean_surface(&mut grid, config);
        self.decorate_surface(&mut grid, config);

        for site in capital_sites(config) {
            clear_land(&mut grid, site);
        }

        self.validate(&grid, config)?;
        log::debug!(
            "{} produced {}x{} map for seed {}",
            self.generator_type(),
            config.width,
            config.height,
            config.seed
        );
        Ok(grid)
    }

    fn validate(&self, grid: &Grid, config: &MapConfig) -> WhiteboxResult<()> {
        if grid.width() != config.width
            || grid.height() != config.height
            || grid.depth() != config::LAYER_COUNT
        {
            return Err(WhiteboxError::GenerationFailed(
                "grid dimensions do not match the configuration".to_string(),
            ));
        }

        for site in capital_sites(config) {
            if grid.terrain(site) != Some(Terrain::Ground) {
                return Err(WhiteboxError::GenerationFailed(format!(
                    "capital site {} is not ground",
                    site
                )));
            }
        }

        if grid
            .tiles()
            .any(|tile| tile.terrain.is_void() && tile.resource.is_some())
        {
            return Err(WhiteboxError::GenerationFailed(
                "void tile carries a resource".to_string(),
            ));
        }

        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "TerrainGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::GridTopology;

    #[test]
    fn test_pseudo_random_range_and_determinism() {
        for y in 0..10 {
            for x in 0..10 {
                let value = pseudo_random(x, y, 0, 42);
                assert!((0.0..1.0).contains(&value));
                assert_eq!(value, pseudo_random(x, y, 0, 42));
            }
        }
        assert_ne!(pseudo_random(1, 1, 0, 42), pseudo_random(1, 1, 1, 42));
    }

    #[test]
    fn test_smooth_averages_with_neighbors() {
        let map = vec![vec![0.0, 0.0, 0.0], vec![0.0, 0.9, 0.0], vec![0.0, 0.0, 0.0]];
        let smoothed = smooth(&map);
        assert!((smoothed[1][1] - 0.1).abs() < 1e-9);
        // Corner averages itself and three neighbors
        assert!((smoothed[0][0] - 0.225).abs() < 1e-9);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let generator = TerrainGenerator::new();
        let config = MapConfig::default();
        let a = generator.generate(&config).unwrap();
        let b = generator.generate(&config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generation_clears_capital_sites() {
        let generator = TerrainGenerator::new();
        let config = MapConfig::new(12, 9, 987);
        let grid = generator.generate(&config).unwrap();

        for site in capital_sites(&config) {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if let Some(tile) = grid.get(site.offset(dx, dy, 0)) {
                        assert_eq!(tile.terrain, Terrain::Ground);
                        assert!(tile.resource.is_none());
                    }
                }
            }
        }
    }

    #[test]
    fn test_sky_layer_is_ground_or_void() {
        let grid = TerrainGenerator::new()
            .generate(&MapConfig::new(16, 16, 5))
            .unwrap();
        assert!(grid
            .layer(1)
            .all(|tile| matches!(tile.terrain, Terrain::Ground | Terrain::Void)));
        assert!(grid.layer(1).all(|tile| tile.resource.is_none()));
        assert!(grid.layer(0).all(|tile| !tile.terrain.is_void()));
    }

    #[test]
    fn test_only_mountains_carry_ore() {
        let grid = TerrainGenerator::new()
            .generate(&MapConfig::new(24, 24, 31337).with_topology(GridTopology::Square))
            .unwrap();
        for tile in grid.tiles() {
            match tile.resource {
                Some(Resource::Ore) => assert_eq!(tile.terrain, Terrain::Mountain),
                Some(Resource::Fish) => assert_eq!(tile.terrain, Terrain::Water),
                Some(Resource::Game) | Some(Resource::Fruit) => {
                    assert_eq!(tile.terrain, Terrain::Ground)
                }
                None => {}
            }
        }
    }

    #[test]
    fn test_too_small_map_fails() {
        let result = TerrainGenerator::new().generate(&MapConfig::new(4, 4, 1));
        assert!(matches!(result, Err(WhiteboxError::InvalidConfig(_))));
    }

    #[test]
    fn test_different_seeds_differ() {
        let generator = TerrainGenerator::new();
        let a = generator.generate(&MapConfig::new(20, 20, 1)).unwrap();
        let b = generator.generate(&MapConfig::new(20, 20, 124)).unwrap();
        assert_ne!(a, b);
    }
}
