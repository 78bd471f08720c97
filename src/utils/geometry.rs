//! # Grid Geometry
//!
//! Pure coordinate helpers for the two supported map topologies.
//!
//! Maps are stored as rectangular `(x, y)` arrays. On a [`GridTopology::Hex`] map those
//! coordinates are read as pointy-topped "odd-r" offset coordinates: odd rows are shifted
//! half a tile to the right. Distances on hex maps are computed in axial/cube space.

use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Neighborhood used by the terrain smoothing pass, independent of topology.
pub const SMOOTHING_OFFSETS: [(i32, i32); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const SQUARE_OFFSETS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

const HEX_ODD_ROW_OFFSETS: [(i32, i32); 6] = [(1, 0), (-1, 0), (0, -1), (1, -1), (0, 1), (1, 1)];

const HEX_EVEN_ROW_OFFSETS: [(i32, i32); 6] =
    [(1, 0), (-1, 0), (-1, -1), (0, -1), (-1, 1), (0, 1)];

/// Map topology selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GridTopology {
    /// Four-connected square cells
    Square,
    /// Six-connected pointy-topped hexes in odd-r offset layout
    #[default]
    Hex,
}

impl GridTopology {
    /// Returns the neighbor deltas for a cell in row `y`.
    ///
    /// Hex deltas depend on row parity; square deltas do not.
    pub fn neighbor_offsets(self, y: i32) -> &'static [(i32, i32)] {
        match self {
            GridTopology::Square => &SQUARE_OFFSETS,
            GridTopology::Hex if y.rem_euclid(2) == 1 => &HEX_ODD_ROW_OFFSETS,
            GridTopology::Hex => &HEX_EVEN_ROW_OFFSETS,
        }
    }

    /// Returns the in-bounds neighbors of `(x, y)` on a `width` × `height` map.
    ///
    /// # Examples
    ///
    /// ```
    /// use whitebox::GridTopology;
    ///
    /// assert_eq!(GridTopology::Square.neighbors(0, 0, 10, 10).len(), 2);
    /// assert_eq!(GridTopology::Hex.neighbors(5, 5, 10, 10).len(), 6);
    /// ```
    pub fn neighbors(self, x: i32, y: i32, width: u32, height: u32) -> Vec<(i32, i32)> {
        self.neighbor_offsets(y)
            .iter()
            .map(|(dx, dy)| (x + dx, y + dy))
            .filter(|&(nx, ny)| in_bounds(nx, ny, width, height))
            .collect()
    }

    /// Grid distance between two cells: Manhattan on square maps, hex steps on hex maps.
    ///
    /// # Examples
    ///
    /// ```
    /// use whitebox::GridTopology;
    ///
    /// assert_eq!(GridTopology::Square.distance((0, 0), (3, 4)), 7);
    /// assert_eq!(GridTopology::Hex.distance((0, 0), (3, 0)), 3);
    /// ```
    pub fn distance(self, a: (i32, i32), b: (i32, i32)) -> i32 {
        match self {
            GridTopology::Square => (a.0 - b.0).abs() + (a.1 - b.1).abs(),
            GridTopology::Hex => {
                let (q1, r1) = offset_to_axial(a.0, a.1);
                let (q2, r2) = offset_to_axial(b.0, b.1);
                axial_distance((q1, r1), (q2, r2))
            }
        }
    }
}

/// Checks whether `(x, y)` lies on a `width` × `height` map.
pub fn in_bounds(x: i32, y: i32, width: u32, height: u32) -> bool {
    x >= 0 && y >= 0 && (x as i64) < width as i64 && (y as i64) < height as i64
}

/// Converts odd-r offset coordinates (column, row) to axial (q, r).
pub fn offset_to_axial(col: i32, row: i32) -> (i32, i32) {
    (col - row.div_euclid(2), row)
}

/// Converts axial (q, r) coordinates back to odd-r offset (column, row).
pub fn axial_to_offset(q: i32, r: i32) -> (i32, i32) {
    (q + r.div_euclid(2), r)
}

/// Hex step distance between two axial coordinates.
pub fn axial_distance(a: (i32, i32), b: (i32, i32)) -> i32 {
    let dq = a.0 - b.0;
    let dr = a.1 - b.1;
    let ds = (-a.0 - a.1) - (-b.0 - b.1);
    (dq.abs() + dr.abs() + ds.abs()) / 2
}

/// Breadth-first collection of every cell within `range` steps of `(x, y)`, origin included.
///
/// Cells come back in BFS order, so the origin is always first.
pub fn tiles_in_range(
    topology: GridTopology,
    x: i32,
    y: i32,
    range: u32,
    width: u32,
    height: u32,
) -> Vec<(i32, i32)> {
    let mut results = vec![(x, y)];
    let mut visited = HashSet::from([(x, y)]);
    let mut queue = VecDeque::from([((x, y), 0u32)]);

    while let Some((current, dist)) = queue.pop_front() {
        if dist >= range {
            continue;
        }
        for next in topology.neighbors(current.0, current.1, width, height) {
            if visited.insert(next) {
                results.push(next);
                queue.push_back((next, dist + 1));
            }
        }
    }

    results
}
