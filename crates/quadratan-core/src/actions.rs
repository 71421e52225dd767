//! Game commands that players can issue and the events that result.

use crate::board::{PlayerId, Resource};
use crate::grid::{CornerCoord, EdgeCoord};
use serde::{Deserialize, Serialize};

/// All commands a presentation layer can issue against the session.
///
/// Every command returns success or a rule-violation error; none of them
/// panic or partially apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    /// Build a settlement at a corner (free during setup, paid in play)
    BuildSettlement(CornerCoord),
    /// Upgrade an owned settlement to a city (play phase only)
    BuildCity(CornerCoord),
    /// Build a road at an edge (connectivity applies in the play phase)
    BuildRoad(EdgeCoord),
    /// Roll the dice; triggers production and advances the turn (play phase)
    RollDice,
    /// End the setup phase. Idempotent no-op outside setup.
    EndSetupPhase,
    /// Give `quantity` units of `give` to another player in exchange for
    /// `quantity` units of `take`
    Trade {
        to: PlayerId,
        give: Resource,
        take: Resource,
        quantity: u32,
    },
}

/// Events that occur as a result of commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A settlement was built
    SettlementBuilt {
        player: PlayerId,
        location: CornerCoord,
    },

    /// A settlement was upgraded to a city
    CityBuilt {
        player: PlayerId,
        location: CornerCoord,
    },

    /// A road was built
    RoadBuilt {
        player: PlayerId,
        location: EdgeCoord,
    },

    /// Dice were rolled
    DiceRolled {
        player: PlayerId,
        roll: (u8, u8),
        total: u8,
    },

    /// Resources were distributed after a dice roll
    ResourcesDistributed {
        distributions: Vec<(PlayerId, Resource, u32)>,
    },

    /// Setup moved on to the next player
    SetupTurnAdvanced { next_player: PlayerId },

    /// Setup finished; play begins with the first player
    SetupPhaseEnded,

    /// The turn passed to the next player
    TurnEnded {
        player: PlayerId,
        next_player: PlayerId,
    },

    /// A bilateral trade was completed
    TradeCompleted {
        from: PlayerId,
        to: PlayerId,
        give: Resource,
        take: Resource,
        quantity: u32,
    },

    /// A player reached the victory threshold
    GameWon {
        player: PlayerId,
        victory_points: u32,
    },
}
