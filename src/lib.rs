//! # Whitebox
//!
//! Simulation core for a hex-grid, turn-based 4X strategy prototype.
//!
//! ## Architecture Overview
//!
//! The engine owns the authoritative game state and every rule that mutates it:
//!
//! - **Geometry**: pure coordinate, neighbor and distance helpers for square and hex grids
//! - **Generation**: deterministic two-layer terrain generation from a seed
//! - **Game State**: the engine itself, with visibility, movement, combat, economy,
//!   research and the turn/AI cycle
//! - **Events**: a typed publish/subscribe channel that hands subscribers an owned
//!   snapshot after every mutation
//! - **Rules**: static unit/tech/improvement/building definitions and nation presets
//!
//! Rule violations never surface as errors. Every command validates its preconditions
//! and returns `false` or `None` when they are not met, leaving state untouched.
//! [`WhiteboxError`] is reserved for configuration and I/O faults.

pub mod game;
pub mod generation;
pub mod pacing;
pub mod rules;
pub mod utils;

pub use game::*;
pub use generation::*;
pub use pacing::*;
pub use rules::*;
pub use utils::*;

/// Core error type for the Whitebox engine.
#[derive(thiserror::Error, Debug)]
pub enum WhiteboxError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Whitebox codebase.
pub type WhiteboxResult<T> = Result<T, WhiteboxError>;

/// Version information for the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine configuration constants.
pub mod config {
    /// Default map width in tiles
    pub const DEFAULT_MAP_WIDTH: u32 = 10;

    /// Default map height in tiles
    pub const DEFAULT_MAP_HEIGHT: u32 = 10;

    /// Default noise seed
    pub const DEFAULT_SEED: u64 = 12345;

    /// Smallest width/height that still fits two distinct capital sites
    pub const MIN_MAP_SIZE: u32 = 5;

    /// Number of vertical layers (0 = surface, 1 = sky)
    pub const LAYER_COUNT: usize = 2;

    /// Stars every player starts a session with
    pub const STARTING_STARS: u32 = 10;

    /// Income every player receives before city and building bonuses
    pub const BASE_INCOME: u32 = 5;

    /// Turns a freshly queued production item takes
    pub const PRODUCTION_LEAD_TURNS: u32 = 1;

    /// Defense added to a city that has built a wall
    pub const WALL_DEFENSE_BONUS: i32 = 3;

    /// Amount the noise seed advances on every regeneration
    pub const REGENERATE_SEED_STEP: u64 = 123;

    /// Vision range of a city without a Vision component
    pub const DEFAULT_CITY_VISION: u32 = 2;

    /// Vision range of a unit without a Vision component
    pub const DEFAULT_UNIT_VISION: u32 = 1;

    /// Radius of territory claimed when a city is founded or captured
    pub const TERRITORY_RADIUS: u32 = 1;

    /// Distance within which a defender can strike back
    pub const MELEE_RANGE: i32 = 1;

    /// Offset of the AI capital from the map center along both axes
    pub const AI_CAPITAL_OFFSET: i32 = 4;

    /// Chance that the AI queues a basic unit in an affordable city
    pub const AI_PRODUCTION_CHANCE: f64 = 0.5;
}
