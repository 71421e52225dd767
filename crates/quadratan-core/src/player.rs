//! Player state and the building economy.
//!
//! This module contains:
//! - ResourceHand for managing per-resource stock
//! - Building kinds and their fixed resource costs
//! - Player struct with resources, piece stock, and victory points

use crate::board::{PlayerId, Resource};
use serde::{Deserialize, Serialize};

/// Starting number of settlement pieces per player
pub const STARTING_SETTLEMENTS: u32 = 5;
/// Starting number of city pieces per player
pub const STARTING_CITIES: u32 = 4;
/// Starting number of road pieces per player
pub const STARTING_ROADS: u32 = 15;

/// A hand of resources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHand {
    pub wood: u32,
    pub brick: u32,
    pub ore: u32,
    pub grain: u32,
    pub wool: u32,
}

impl ResourceHand {
    /// Create an empty hand
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hand with specific amounts
    pub fn with_amounts(wood: u32, brick: u32, ore: u32, grain: u32, wool: u32) -> Self {
        Self {
            wood,
            brick,
            ore,
            grain,
            wool,
        }
    }

    /// Create a hand with a single resource
    pub fn single(resource: Resource, amount: u32) -> Self {
        let mut hand = Self::new();
        hand.add(resource, amount);
        hand
    }

    /// Total number of resource units
    pub fn total(&self) -> u32 {
        self.wood + self.brick + self.ore + self.grain + self.wool
    }

    /// Check if hand is empty
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Get count of a specific resource
    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Wood => self.wood,
            Resource::Brick => self.brick,
            Resource::Ore => self.ore,
            Resource::Grain => self.grain,
            Resource::Wool => self.wool,
        }
    }

    /// Add resources to the hand
    pub fn add(&mut self, resource: Resource, amount: u32) {
        match resource {
            Resource::Wood => self.wood += amount,
            Resource::Brick => self.brick += amount,
            Resource::Ore => self.ore += amount,
            Resource::Grain => self.grain += amount,
            Resource::Wool => self.wool += amount,
        }
    }

    /// Remove resources from the hand. Fails without mutating if the
    /// current stock is insufficient.
    pub fn remove(&mut self, resource: Resource, amount: u32) -> bool {
        if self.get(resource) < amount {
            return false;
        }
        match resource {
            Resource::Wood => self.wood -= amount,
            Resource::Brick => self.brick -= amount,
            Resource::Ore => self.ore -= amount,
            Resource::Grain => self.grain -= amount,
            Resource::Wool => self.wool -= amount,
        }
        true
    }

    /// Check if the hand covers a cost in every resource
    pub fn can_afford(&self, cost: &ResourceHand) -> bool {
        self.wood >= cost.wood
            && self.brick >= cost.brick
            && self.ore >= cost.ore
            && self.grain >= cost.grain
            && self.wool >= cost.wool
    }

    /// Try to subtract a cost, all or nothing. Returns false and leaves the
    /// hand unchanged if any resource falls short.
    pub fn try_subtract(&mut self, cost: &ResourceHand) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.wood -= cost.wood;
        self.brick -= cost.brick;
        self.ore -= cost.ore;
        self.grain -= cost.grain;
        self.wool -= cost.wool;
        true
    }
}

/// The three building kinds a player can place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    Settlement,
    City,
    Road,
}

/// Fixed building costs. Not configurable at runtime.
pub mod costs {
    use super::{BuildingKind, ResourceHand};

    /// Cost to build a settlement: 1 wood, 1 brick, 1 grain, 1 wool
    pub fn settlement() -> ResourceHand {
        ResourceHand::with_amounts(1, 1, 0, 1, 1)
    }

    /// Cost to upgrade to a city: 3 ore, 2 grain
    pub fn city() -> ResourceHand {
        ResourceHand::with_amounts(0, 0, 3, 2, 0)
    }

    /// Cost to build a road: 1 wood, 1 brick
    pub fn road() -> ResourceHand {
        ResourceHand::with_amounts(1, 1, 0, 0, 0)
    }

    /// Cost table lookup by building kind
    pub fn of(kind: BuildingKind) -> ResourceHand {
        match kind {
            BuildingKind::Settlement => settlement(),
            BuildingKind::City => city(),
            BuildingKind::Road => road(),
        }
    }
}

/// A single player's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Player ID (0-3)
    pub id: PlayerId,
    /// Display name
    pub name: String,
    /// Current resources
    pub resources: ResourceHand,
    /// Settlement pieces remaining to build
    pub settlements_remaining: u32,
    /// City pieces remaining to build
    pub cities_remaining: u32,
    /// Road pieces remaining to build
    pub roads_remaining: u32,
    /// Accumulated victory points; never decreases
    pub victory_points: u32,
}

impl Player {
    /// Create a new player with the starting piece stock and no resources
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            resources: ResourceHand::new(),
            settlements_remaining: STARTING_SETTLEMENTS,
            cities_remaining: STARTING_CITIES,
            roads_remaining: STARTING_ROADS,
            victory_points: 0,
        }
    }

    /// Check if the player's resources cover a building's cost.
    /// Piece stock is a separate rule checked by the session.
    pub fn can_afford(&self, kind: BuildingKind) -> bool {
        self.resources.can_afford(&costs::of(kind))
    }

    /// Check if the player still has a piece of the given kind
    pub fn has_piece(&self, kind: BuildingKind) -> bool {
        match kind {
            BuildingKind::Settlement => self.settlements_remaining > 0,
            BuildingKind::City => self.cities_remaining > 0,
            BuildingKind::Road => self.roads_remaining > 0,
        }
    }

    /// Pay for a building. Re-checks affordability and deducts the full cost,
    /// or returns false and deducts nothing.
    pub fn pay(&mut self, kind: BuildingKind) -> bool {
        self.resources.try_subtract(&costs::of(kind))
    }
}
