//! Square-grid coordinate system for tiles, corners, and edges.
//!
//! This module provides the foundational coordinate types for the board:
//! - `TileCoord`: Identifies individual square tiles
//! - `CornerCoord`: Identifies corners (grid intersections) where settlements
//!   and cities are placed
//! - `EdgeCoord`: Identifies edges (grid-line segments) where roads are placed
//!
//! A board of `rows x cols` tiles has `(rows+1) x (cols+1)` corners. Edges come
//! in two orientations: a horizontal edge at `(r, c)` runs between corners
//! `(r, c)` and `(r, c+1)`, a vertical edge at `(r, c)` runs between corners
//! `(r, c)` and `(r+1, c)`.
//!
//! Coordinates are signed and unbounded; bounds checking belongs to the board,
//! which returns `None` for out-of-range lookups.

use serde::{Deserialize, Serialize};

/// Orientation of an edge on the square grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Runs left-to-right between two corners in the same corner row
    Horizontal,
    /// Runs top-to-bottom between two corners in the same corner column
    Vertical,
}

/// Coordinate of a square tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct TileCoord {
    pub row: i32,
    pub col: i32,
}

impl TileCoord {
    /// Create a new tile coordinate
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The four orthogonally adjacent tiles (up, down, left, right).
    /// Diagonal neighbors are not adjacent.
    pub fn neighbors(&self) -> [TileCoord; 4] {
        [
            TileCoord::new(self.row - 1, self.col),
            TileCoord::new(self.row + 1, self.col),
            TileCoord::new(self.row, self.col - 1),
            TileCoord::new(self.row, self.col + 1),
        ]
    }

    /// The four corners bounding this tile, in order top-left, top-right,
    /// bottom-left, bottom-right.
    pub fn corners(&self) -> [CornerCoord; 4] {
        [
            CornerCoord::new(self.row, self.col),
            CornerCoord::new(self.row, self.col + 1),
            CornerCoord::new(self.row + 1, self.col),
            CornerCoord::new(self.row + 1, self.col + 1),
        ]
    }

    /// The four edges bounding this tile: top and bottom horizontal,
    /// left and right vertical.
    pub fn edges(&self) -> [EdgeCoord; 4] {
        [
            EdgeCoord::horizontal(self.row, self.col),
            EdgeCoord::horizontal(self.row + 1, self.col),
            EdgeCoord::vertical(self.row, self.col),
            EdgeCoord::vertical(self.row, self.col + 1),
        ]
    }
}

/// Coordinate of a corner (grid intersection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct CornerCoord {
    pub row: i32,
    pub col: i32,
}

impl CornerCoord {
    /// Create a new corner coordinate
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The up-to-four edges meeting at this corner: horizontal to the left
    /// and right, vertical above and below. Edges off the board are filtered
    /// out by bounded lookups.
    pub fn touching_edges(&self) -> [EdgeCoord; 4] {
        [
            EdgeCoord::horizontal(self.row, self.col - 1),
            EdgeCoord::horizontal(self.row, self.col),
            EdgeCoord::vertical(self.row - 1, self.col),
            EdgeCoord::vertical(self.row, self.col),
        ]
    }
}

/// Coordinate of an edge (grid-line segment between two adjacent corners).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeCoord {
    pub row: i32,
    pub col: i32,
    pub orientation: Orientation,
}

impl EdgeCoord {
    /// Create a horizontal edge coordinate
    pub const fn horizontal(row: i32, col: i32) -> Self {
        Self {
            row,
            col,
            orientation: Orientation::Horizontal,
        }
    }

    /// Create a vertical edge coordinate
    pub const fn vertical(row: i32, col: i32) -> Self {
        Self {
            row,
            col,
            orientation: Orientation::Vertical,
        }
    }

    /// The two corners this edge connects.
    pub fn endpoints(&self) -> [CornerCoord; 2] {
        match self.orientation {
            Orientation::Horizontal => [
                CornerCoord::new(self.row, self.col),
                CornerCoord::new(self.row, self.col + 1),
            ],
            Orientation::Vertical => [
                CornerCoord::new(self.row, self.col),
                CornerCoord::new(self.row + 1, self.col),
            ],
        }
    }
}
