//! # Utilities Module
//!
//! Grid geometry and movement resolution shared by every game system.

pub mod geometry;
pub mod pathfinding;

pub use geometry::*;
pub use pathfinding::*;
