//! Game board representation: tiles, buildings, and road connectivity.
//!
//! This module contains:
//! - Resource and terrain catalogs
//! - Board layouts (terrain and number-token distributions)
//! - The board grid with bounded coordinate lookups
//! - Building types (settlements, cities, roads)
//! - Road-network reachability used to validate road placement
//! - Resource production for dice rolls

use crate::grid::{CornerCoord, EdgeCoord, Orientation, TileCoord};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Player identifier (0-3 for a 4-player game)
pub type PlayerId = u8;

/// The five resource types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    Wood,
    Brick,
    Ore,
    Grain,
    Wool,
}

impl Resource {
    /// All resource types
    pub const ALL: [Resource; 5] = [
        Resource::Wood,
        Resource::Brick,
        Resource::Ore,
        Resource::Grain,
        Resource::Wool,
    ];
}

/// Terrain type of a tile. Every terrain except desert produces one
/// resource type; presentation layers own all display names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Forest,
    Hills,
    Mountains,
    Fields,
    Pasture,
    Desert,
}

impl Terrain {
    /// The resource this terrain produces, if any
    pub fn resource(&self) -> Option<Resource> {
        match self {
            Terrain::Forest => Some(Resource::Wood),
            Terrain::Hills => Some(Resource::Brick),
            Terrain::Mountains => Some(Resource::Ore),
            Terrain::Fields => Some(Resource::Grain),
            Terrain::Pasture => Some(Resource::Wool),
            Terrain::Desert => None,
        }
    }

    /// Whether this terrain produces a resource
    pub fn produces_resource(&self) -> bool {
        self.resource().is_some()
    }
}

/// A single tile on the board. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Terrain of this tile
    pub terrain: Terrain,
    /// Number token that triggers production (2-12, never 7; `None` for desert)
    pub token: Option<u8>,
}

impl Tile {
    /// Check if this tile is the desert
    pub fn is_desert(&self) -> bool {
        self.terrain == Terrain::Desert
    }

    /// Get the resource this tile produces, if any
    pub fn resource(&self) -> Option<Resource> {
        self.terrain.resource()
    }
}

/// What's built on a corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CornerBuilding {
    /// Nothing built
    #[default]
    Empty,
    /// Settlement (1 resource per adjacent producing tile)
    Settlement(PlayerId),
    /// City (2 resources per adjacent producing tile)
    City(PlayerId),
}

impl CornerBuilding {
    /// Get the owner of this building, if any
    pub fn owner(&self) -> Option<PlayerId> {
        match self {
            CornerBuilding::Empty => None,
            CornerBuilding::Settlement(p) | CornerBuilding::City(p) => Some(*p),
        }
    }

    /// Resource multiplier (units received per production event)
    pub fn resource_multiplier(&self) -> u32 {
        match self {
            CornerBuilding::Empty => 0,
            CornerBuilding::Settlement(_) => 1,
            CornerBuilding::City(_) => 2,
        }
    }
}

/// What's built on an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EdgeBuilding {
    /// Nothing built
    #[default]
    Empty,
    /// Road
    Road(PlayerId),
}

impl EdgeBuilding {
    /// Get the owner of this road, if any
    pub fn owner(&self) -> Option<PlayerId> {
        match self {
            EdgeBuilding::Empty => None,
            EdgeBuilding::Road(p) => Some(*p),
        }
    }
}

/// Errors raised when a board layout is malformed. These are fatal
/// construction errors, never produced during play.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum LayoutError {
    #[error("terrain distribution has {got} entries, layout has {want} playable tiles")]
    TerrainCount { got: usize, want: usize },

    #[error("layout must contain exactly one desert tile, found {0}")]
    DesertCount(usize),

    #[error("token distribution has {got} entries, layout has {want} producing tiles")]
    TokenCount { got: usize, want: usize },

    #[error("number token {0} is outside 2-12 (7 is never used)")]
    InvalidToken(u8),

    #[error("empty cell {0:?} is outside the grid")]
    EmptyCellOutOfRange(TileCoord),
}

/// A board layout: grid dimensions plus the terrain and number-token
/// distributions that get shuffled onto it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardLayout {
    /// Number of tile rows
    pub rows: i32,
    /// Number of tile columns
    pub cols: i32,
    /// Grid cell deliberately left without a tile, if any
    pub empty_cell: Option<TileCoord>,
    /// Terrain multiset, one entry per playable tile
    pub terrain: Vec<Terrain>,
    /// Number-token multiset, one entry per producing tile
    pub tokens: Vec<u8>,
}

impl BoardLayout {
    /// The classic 4x5 layout: 19 tiles around one empty cell, with the
    /// standard tile and token distributions.
    pub fn classic() -> Self {
        let mut terrain = Vec::with_capacity(19);
        terrain.extend(std::iter::repeat(Terrain::Forest).take(4));
        terrain.extend(std::iter::repeat(Terrain::Hills).take(3));
        terrain.extend(std::iter::repeat(Terrain::Mountains).take(3));
        terrain.extend(std::iter::repeat(Terrain::Fields).take(4));
        terrain.extend(std::iter::repeat(Terrain::Pasture).take(4));
        terrain.push(Terrain::Desert);

        Self {
            rows: 4,
            cols: 5,
            empty_cell: Some(TileCoord::new(2, 2)),
            terrain,
            tokens: vec![2, 3, 3, 4, 4, 5, 5, 6, 6, 8, 8, 9, 9, 10, 10, 11, 11, 12],
        }
    }

    /// The denser 6x6 layout: 36 tiles, no empty cell. 35 tokens for the
    /// 35 producing tiles: one 2, one 12, four each of 3-6 and 9-11, five 8s.
    pub fn dense() -> Self {
        let mut terrain = Vec::with_capacity(36);
        terrain.extend(std::iter::repeat(Terrain::Forest).take(8));
        terrain.extend(std::iter::repeat(Terrain::Hills).take(7));
        terrain.extend(std::iter::repeat(Terrain::Mountains).take(7));
        terrain.extend(std::iter::repeat(Terrain::Fields).take(7));
        terrain.extend(std::iter::repeat(Terrain::Pasture).take(6));
        terrain.push(Terrain::Desert);

        let mut tokens = vec![2, 12];
        for n in [3u8, 4, 5, 6, 9, 10, 11] {
            tokens.extend(std::iter::repeat(n).take(4));
        }
        tokens.extend(std::iter::repeat(8u8).take(5));

        Self {
            rows: 6,
            cols: 6,
            empty_cell: None,
            terrain,
            tokens,
        }
    }

    /// Number of grid cells that carry a tile
    pub fn playable_tiles(&self) -> usize {
        let total = (self.rows * self.cols) as usize;
        if self.empty_cell.is_some() {
            total - 1
        } else {
            total
        }
    }

    /// Number of tiles that carry a number token (playable minus the desert)
    pub fn producing_tiles(&self) -> usize {
        self.playable_tiles() - 1
    }

    /// Check that the distributions match the grid exactly.
    fn validate(&self) -> Result<(), LayoutError> {
        if let Some(cell) = self.empty_cell {
            let in_range =
                (0..self.rows).contains(&cell.row) && (0..self.cols).contains(&cell.col);
            if !in_range {
                return Err(LayoutError::EmptyCellOutOfRange(cell));
            }
        }

        if self.terrain.len() != self.playable_tiles() {
            return Err(LayoutError::TerrainCount {
                got: self.terrain.len(),
                want: self.playable_tiles(),
            });
        }

        let deserts = self.terrain.iter().filter(|t| **t == Terrain::Desert).count();
        if deserts != 1 {
            return Err(LayoutError::DesertCount(deserts));
        }

        if self.tokens.len() != self.producing_tiles() {
            return Err(LayoutError::TokenCount {
                got: self.tokens.len(),
                want: self.producing_tiles(),
            });
        }

        if let Some(&bad) = self
            .tokens
            .iter()
            .find(|&&t| !(2..=12).contains(&t) || t == 7)
        {
            return Err(LayoutError::InvalidToken(bad));
        }

        Ok(())
    }
}

/// The complete game board.
///
/// Tiles, corner buildings, and roads are keyed by coordinate; a grid cell
/// with no tile is simply absent from the map. All lookups are bounded and
/// return `None` for out-of-range coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    rows: i32,
    cols: i32,
    /// Grid cell left empty by the layout, if any
    empty_cell: Option<TileCoord>,
    /// Tiles indexed by coordinate
    tiles: HashMap<TileCoord, Tile>,
    /// Buildings on corners
    corners: HashMap<CornerCoord, CornerBuilding>,
    /// Roads on edges
    edges: HashMap<EdgeCoord, EdgeBuilding>,
}

impl Board {
    /// Create a board from a layout, shuffling terrain and tokens with a
    /// thread-local RNG.
    pub fn from_layout(layout: &BoardLayout) -> Result<Self, LayoutError> {
        let mut rng = rand::thread_rng();
        Self::from_layout_with_rng(layout, &mut rng)
    }

    /// Create a board from a layout with a provided RNG.
    /// This allows for deterministic board generation when needed.
    pub fn from_layout_with_rng<R: Rng>(
        layout: &BoardLayout,
        rng: &mut R,
    ) -> Result<Self, LayoutError> {
        layout.validate()?;

        let mut terrain = layout.terrain.clone();
        let mut tokens = layout.tokens.clone();
        terrain.shuffle(rng);
        tokens.shuffle(rng);

        let mut tiles = HashMap::with_capacity(layout.playable_tiles());
        let mut terrain_iter = terrain.into_iter();
        let mut token_iter = tokens.into_iter();

        // Zip the shuffled distributions onto the grid in row-major order,
        // skipping the empty cell; the desert gets no token.
        for row in 0..layout.rows {
            for col in 0..layout.cols {
                let coord = TileCoord::new(row, col);
                if layout.empty_cell == Some(coord) {
                    continue;
                }
                // Counts were validated, so the iterators never run dry.
                let terrain = terrain_iter.next().ok_or(LayoutError::TerrainCount {
                    got: layout.terrain.len(),
                    want: layout.playable_tiles(),
                })?;
                let token = if terrain.produces_resource() {
                    Some(token_iter.next().ok_or(LayoutError::TokenCount {
                        got: layout.tokens.len(),
                        want: layout.producing_tiles(),
                    })?)
                } else {
                    None
                };
                tiles.insert(coord, Tile { terrain, token });
            }
        }

        Ok(Self {
            rows: layout.rows,
            cols: layout.cols,
            empty_cell: layout.empty_cell,
            tiles,
            corners: HashMap::new(),
            edges: HashMap::new(),
        })
    }

    /// Number of tile rows
    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Number of tile columns
    pub fn cols(&self) -> i32 {
        self.cols
    }

    /// Grid cell left without a tile, if the layout reserves one
    pub fn empty_cell(&self) -> Option<TileCoord> {
        self.empty_cell
    }

    // ==================== Bounds ====================

    fn corner_in_bounds(&self, coord: CornerCoord) -> bool {
        (0..=self.rows).contains(&coord.row) && (0..=self.cols).contains(&coord.col)
    }

    fn edge_in_bounds(&self, coord: EdgeCoord) -> bool {
        match coord.orientation {
            Orientation::Horizontal => {
                (0..=self.rows).contains(&coord.row) && (0..self.cols).contains(&coord.col)
            }
            Orientation::Vertical => {
                (0..self.rows).contains(&coord.row) && (0..=self.cols).contains(&coord.col)
            }
        }
    }

    // ==================== Query Methods ====================

    /// Get the tile at a coordinate. `None` for out-of-range coordinates
    /// and for the layout's empty cell.
    pub fn tile(&self, coord: TileCoord) -> Option<&Tile> {
        self.tiles.get(&coord)
    }

    /// Get the building at a corner. `None` for out-of-range coordinates.
    pub fn corner(&self, coord: CornerCoord) -> Option<CornerBuilding> {
        self.corner_in_bounds(coord)
            .then(|| self.corners.get(&coord).copied().unwrap_or_default())
    }

    /// Get the road at an edge. `None` for out-of-range coordinates.
    pub fn edge(&self, coord: EdgeCoord) -> Option<EdgeBuilding> {
        self.edge_in_bounds(coord)
            .then(|| self.edges.get(&coord).copied().unwrap_or_default())
    }

    /// Get the horizontal edge at `(row, col)`
    pub fn horizontal_edge(&self, row: i32, col: i32) -> Option<EdgeBuilding> {
        self.edge(EdgeCoord::horizontal(row, col))
    }

    /// Get the vertical edge at `(row, col)`
    pub fn vertical_edge(&self, row: i32, col: i32) -> Option<EdgeBuilding> {
        self.edge(EdgeCoord::vertical(row, col))
    }

    /// All tiles
    pub fn tiles(&self) -> impl Iterator<Item = (TileCoord, &Tile)> {
        self.tiles.iter().map(|(c, t)| (*c, t))
    }

    /// The up-to-4 orthogonally adjacent tiles, omitting out-of-range and
    /// empty cells.
    pub fn adjacent_tiles(&self, coord: TileCoord) -> Vec<&Tile> {
        coord
            .neighbors()
            .iter()
            .filter_map(|c| self.tiles.get(c))
            .collect()
    }

    /// The corners bounding a tile.
    pub fn corners_of_tile(&self, coord: TileCoord) -> Vec<CornerCoord> {
        coord
            .corners()
            .into_iter()
            .filter(|c| self.corner_in_bounds(*c))
            .collect()
    }

    /// The edges bounding a tile.
    pub fn edges_of_tile(&self, coord: TileCoord) -> Vec<EdgeCoord> {
        coord
            .edges()
            .into_iter()
            .filter(|e| self.edge_in_bounds(*e))
            .collect()
    }

    /// The corners connected by an edge.
    pub fn corners_of_edge(&self, coord: EdgeCoord) -> Vec<CornerCoord> {
        coord
            .endpoints()
            .into_iter()
            .filter(|c| self.corner_in_bounds(*c))
            .collect()
    }

    // ==================== Road Connectivity ====================

    /// Decide whether `player` may place a road at `edge`.
    ///
    /// The edge must exist and be unowned. The placement is anchored if either
    /// endpoint carries one of the player's buildings. During setup
    /// (`allow_unconnected`) no further check applies; otherwise the player's
    /// road network must reach the edge from one of its endpoints.
    ///
    /// Piece stock and payment are the session's concern, not the board's.
    pub fn can_place_road(
        &self,
        edge: EdgeCoord,
        player: PlayerId,
        allow_unconnected: bool,
    ) -> bool {
        match self.edge(edge) {
            Some(EdgeBuilding::Empty) => {}
            _ => return false,
        }

        let endpoints = edge.endpoints();
        let anchored = endpoints
            .iter()
            .any(|&c| self.corner(c).and_then(|b| b.owner()) == Some(player));
        if anchored {
            return true;
        }

        if allow_unconnected {
            return true;
        }

        endpoints
            .iter()
            .any(|&c| self.road_network_reaches_building(c, player))
    }

    /// Iterative depth-first search over the player's owned-edge graph,
    /// starting at `start`, looking for any corner that carries one of the
    /// player's buildings. The visited set keyed by corner coordinate
    /// guarantees termination on cyclic road loops.
    fn road_network_reaches_building(&self, start: CornerCoord, player: PlayerId) -> bool {
        let mut visited: HashSet<CornerCoord> = HashSet::new();
        let mut stack = vec![start];

        while let Some(corner) = stack.pop() {
            if !visited.insert(corner) {
                continue;
            }
            if self.corner(corner).and_then(|b| b.owner()) == Some(player) {
                return true;
            }
            for edge in corner.touching_edges() {
                if self.edge(edge) != Some(EdgeBuilding::Road(player)) {
                    continue;
                }
                for next in edge.endpoints() {
                    if next != corner && !visited.contains(&next) {
                        stack.push(next);
                    }
                }
            }
        }

        false
    }

    // ==================== Mutation Methods ====================

    /// Place a settlement (assumes validation already done)
    pub fn place_settlement(&mut self, corner: CornerCoord, player: PlayerId) {
        self.corners.insert(corner, CornerBuilding::Settlement(player));
    }

    /// Upgrade a settlement to a city (assumes validation already done)
    pub fn upgrade_to_city(&mut self, corner: CornerCoord, player: PlayerId) {
        self.corners.insert(corner, CornerBuilding::City(player));
    }

    /// Place a road (assumes validation already done)
    pub fn place_road(&mut self, edge: EdgeCoord, player: PlayerId) {
        self.edges.insert(edge, EdgeBuilding::Road(player));
    }

    // ==================== Resource Production ====================

    /// Calculate resources produced for a dice roll: for every producing tile
    /// whose token matches, each occupied adjacent corner yields 1 unit per
    /// settlement or 2 per city to its owner. A roll of 7 matches no token.
    pub fn resources_for_roll(&self, roll: u8) -> HashMap<PlayerId, HashMap<Resource, u32>> {
        let mut distribution: HashMap<PlayerId, HashMap<Resource, u32>> = HashMap::new();

        for (coord, tile) in &self.tiles {
            if tile.token != Some(roll) {
                continue;
            }
            let resource = match tile.resource() {
                Some(r) => r,
                None => continue,
            };

            for corner in coord.corners() {
                let building = match self.corner(corner) {
                    Some(b) => b,
                    None => continue,
                };
                if let Some(owner) = building.owner() {
                    *distribution
                        .entry(owner)
                        .or_default()
                        .entry(resource)
                        .or_insert(0) += building.resource_multiplier();
                }
            }
        }

        distribution
    }

    /// Convert to a JSON-friendly representation with arrays instead of
    /// coordinate-keyed maps (JSON doesn't support complex types as keys).
    pub fn to_json_friendly(&self) -> BoardJson {
        BoardJson {
            rows: self.rows,
            cols: self.cols,
            empty_cell: self.empty_cell,
            tiles: self
                .tiles
                .iter()
                .map(|(coord, tile)| TileJson {
                    row: coord.row,
                    col: coord.col,
                    terrain: tile.terrain,
                    token: tile.token,
                })
                .collect(),
            corners: self
                .corners
                .iter()
                .filter_map(|(coord, building)| {
                    if *building == CornerBuilding::Empty {
                        None
                    } else {
                        Some(CornerJson {
                            row: coord.row,
                            col: coord.col,
                            building: *building,
                        })
                    }
                })
                .collect(),
            edges: self
                .edges
                .iter()
                .filter_map(|(coord, building)| {
                    if *building == EdgeBuilding::Empty {
                        None
                    } else {
                        Some(EdgeJson {
                            row: coord.row,
                            col: coord.col,
                            orientation: coord.orientation,
                            building: *building,
                        })
                    }
                })
                .collect(),
        }
    }
}

/// JSON-friendly board representation with arrays instead of maps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardJson {
    pub rows: i32,
    pub cols: i32,
    pub empty_cell: Option<TileCoord>,
    pub tiles: Vec<TileJson>,
    pub corners: Vec<CornerJson>,
    pub edges: Vec<EdgeJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileJson {
    pub row: i32,
    pub col: i32,
    pub terrain: Terrain,
    pub token: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CornerJson {
    pub row: i32,
    pub col: i32,
    pub building: CornerBuilding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeJson {
    pub row: i32,
    pub col: i32,
    pub orientation: Orientation,
    pub building: EdgeBuilding,
}
