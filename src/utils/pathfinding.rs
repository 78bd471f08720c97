//! # Pathfinding Algorithms
//!
//! Reachable-tile search for unit movement.
//!
//! Movement is a breadth-first search bounded by the unit's movement range. Horizontal
//! steps follow the map topology; vertical steps move to the same `(x, y)` on the
//! adjacent layer and are only available from a beanstalk or to flyers. A vertical step
//! only needs a non-Void destination; terrain costs apply to horizontal steps. Tiles holding
//! an enemy unit are valid terminal moves (attacks) but are never expanded further.

use crate::game::{Entity, EntityId, GameState, Position, Terrain};
use crate::rules::{BEANSTALK_KEY, CLIMBING_TECH};
use pathfinding::prelude::bfs_reach;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entry of a unit's valid move set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveTarget {
    pub position: Position,
    /// Moving here attacks the enemy unit standing on it
    pub is_attack: bool,
}

/// Whether a unit with the given capabilities may enter `terrain`.
///
/// Void is never enterable, not even by flyers.
///
/// # Examples
///
/// ```
/// use whitebox::{terrain_passable, Terrain};
///
/// assert!(terrain_passable(Terrain::Ground, false, false));
/// assert!(!terrain_passable(Terrain::Water, false, true));
/// assert!(terrain_passable(Terrain::Mountain, false, true));
/// assert!(terrain_passable(Terrain::Water, true, false));
/// assert!(!terrain_passable(Terrain::Void, true, true));
/// ```
pub fn terrain_passable(terrain: Terrain, can_fly: bool, can_climb: bool) -> bool {
    match terrain {
        Terrain::Void => false,
        Terrain::Ground => true,
        Terrain::Water => can_fly,
        Terrain::Mountain => can_fly || can_climb,
    }
}

/// Computes every tile `unit` can move to or attack this turn.
///
/// Empty when the unit has already acted or has no Movement component.
pub fn valid_moves(state: &GameState, unit: &Entity) -> Vec<MoveTarget> {
    if unit.has_acted {
        return Vec::new();
    }
    let Some(movement) = unit.components.movement else {
        return Vec::new();
    };

    let range = movement.range;
    let can_fly = unit.can_fly();
    let can_climb = state.has_tech(unit.owner, CLIMBING_TECH);

    // Classifies a candidate tile: None when blocked, Some(true) for an attack
    let classify = |pos: Position, vertical: bool| -> Option<bool> {
        let terrain = state.grid().terrain(pos)?;
        let enterable = if vertical {
            !terrain.is_void()
        } else {
            terrain_passable(terrain, can_fly, can_climb)
        };
        if !enterable {
            return None;
        }
        match state.unit_at(pos) {
            Some(other) if other.owner == unit.owner => None,
            Some(_) => Some(true),
            None => Some(false),
        }
    };

    let mut depth: HashMap<Position, u32> = HashMap::from([(unit.position, 0)]);
    let mut attacks: HashMap<Position, bool> = HashMap::new();

    let reached: Vec<Position> = bfs_reach(unit.position, |&current: &Position| {
        let dist = depth.get(&current).copied().unwrap_or(range);
        if dist >= range || attacks.get(&current).copied().unwrap_or(false) {
            return Vec::new();
        }

        let mut candidates = Vec::new();
        if can_fly || state.improvement_at(current) == Some(BEANSTALK_KEY) {
            candidates.extend([
                (current.with_layer(current.z + 1), true),
                (current.with_layer(current.z - 1), true),
            ]);
        }
        candidates.extend(state.neighbors_of(current).into_iter().map(|pos| (pos, false)));

        let mut next = Vec::new();
        for (pos, vertical) in candidates {
            if depth.contains_key(&pos) {
                continue;
            }
            if let Some(is_attack) = classify(pos, vertical) {
                depth.insert(pos, dist + 1);
                attacks.insert(pos, is_attack);
                next.push(pos);
            }
        }
        next
    })
    .skip(1)
    .collect();

    reached
        .into_iter()
        .map(|position| MoveTarget {
            position,
            is_attack: attacks.get(&position).copied().unwrap_or(false),
        })
        .collect()
}

impl GameState {
    /// Valid moves of the entity with `id`; empty if it does not exist.
    pub fn get_valid_moves(&self, id: EntityId) -> Vec<MoveTarget> {
        self.entity(id)
            .map(|unit| valid_moves(self, unit))
            .unwrap_or_default()
    }
}
