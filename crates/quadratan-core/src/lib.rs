//! Quadratan - a settlement game engine on a square grid
//!
//! This crate provides the core game logic for Quadratan, including:
//! - Square-grid coordinate system for tiles, corners, and edges
//! - Board representation with terrain, number tokens, and buildings
//! - Player state, resource hands, and the building economy
//! - Game state machine with full rule enforcement
//!
//! # Architecture
//!
//! The engine is platform-agnostic and purely in-memory: a presentation
//! layer drives it by calling [`GameState::apply_action`] and rendering the
//! returned events, or by serializing [`GameState::snapshot`] as JSON.
//!
//! # Modules
//!
//! - [`grid`]: Coordinate system for square tiles, corners, and edges
//! - [`board`]: Game board representation and connectivity queries
//! - [`player`]: Player state, resources, and building costs
//! - [`actions`]: Commands and the events they produce
//! - [`game`]: Game state machine

pub mod actions;
pub mod board;
pub mod game;
pub mod grid;
pub mod player;

// Re-export commonly used types
pub use actions::{GameAction, GameEvent};
pub use board::{
    Board, BoardLayout, CornerBuilding, EdgeBuilding, LayoutError, PlayerId, Resource, Terrain,
    Tile,
};
pub use game::{
    GameError, GamePhase, GameState, GameStateJson, SetupDirection, SetupError,
    VICTORY_POINTS_TO_WIN,
};
pub use grid::{CornerCoord, EdgeCoord, Orientation, TileCoord};
pub use player::{
    costs, BuildingKind, Player, ResourceHand, STARTING_CITIES, STARTING_ROADS,
    STARTING_SETTLEMENTS,
};
