//! Core game state machine.
//!
//! This module contains the `GameState` session object and all turn, phase,
//! and rule-enforcement logic. Commands are applied through
//! [`GameState::apply_action`]; every rule violation is reported as a
//! [`GameError`] and leaves the state untouched.

use crate::actions::{GameAction, GameEvent};
use crate::board::{
    Board, BoardLayout, CornerBuilding, EdgeBuilding, LayoutError, PlayerId, Resource,
};
use crate::grid::{CornerCoord, EdgeCoord};
use crate::player::{BuildingKind, Player};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Victory points needed to win
pub const VICTORY_POINTS_TO_WIN: u32 = 10;

/// Direction of the setup round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetupDirection {
    /// First placements, player 0 through N-1
    Forward,
    /// Second placements, player N-1 back down to 0
    Backward,
}

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Initial placement phase: one free settlement and road per player turn
    Setup { direction: SetupDirection },
    /// Open play: building costs resources, roads require connectivity,
    /// rolling the dice advances the turn
    Play,
    /// Terminal: no further mutation is legal
    GameOver { winner: PlayerId },
}

/// Fatal errors raised once at session construction, never during play
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("player count must be between 2 and 4, got {0}")]
    PlayerCount(u8),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Rule violations reported by commands. The offending command is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("not your turn")]
    NotYourTurn,

    #[error("action is not legal in the current phase")]
    InvalidPhase,

    #[error("no such location on the board")]
    InvalidLocation,

    #[error("location is already occupied")]
    AlreadyOccupied,

    #[error("no pieces of that kind remaining")]
    NoPiecesRemaining,

    #[error("cannot afford this")]
    CannotAfford,

    #[error("edge is not connected to your road network")]
    NotConnected,

    #[error("setup requires one settlement, then one road")]
    SetupOrderViolation,

    #[error("invalid trade")]
    InvalidTrade,

    #[error("game is over")]
    GameOver,
}

/// The complete game session state.
///
/// Exactly one logical actor mutates the session at a time; every command
/// runs to completion and either fully applies or fully rejects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// The game board
    pub board: Board,
    /// All players, in seating order
    pub players: Vec<Player>,
    /// Index of the player whose turn it is
    current_player: PlayerId,
    /// Current game phase
    phase: GamePhase,
    /// Last dice roll, `None` until the first roll of the play phase
    dice_roll: Option<(u8, u8)>,
    /// Whether the current player has placed their setup settlement this turn
    settlement_built: bool,
    /// Whether the current player has placed their setup road this turn
    road_built: bool,
}

impl GameState {
    /// Create a new session on the classic board layout.
    /// Fails for player counts outside 2-4.
    pub fn new(player_count: u8) -> Result<Self, SetupError> {
        Self::with_layout(player_count, &BoardLayout::classic())
    }

    /// Create a new session with a specific board layout
    pub fn with_layout(player_count: u8, layout: &BoardLayout) -> Result<Self, SetupError> {
        let mut rng = rand::thread_rng();
        Self::new_with_rng(player_count, layout, &mut rng)
    }

    /// Create a new session with a provided RNG for deterministic boards
    pub fn new_with_rng<R: Rng>(
        player_count: u8,
        layout: &BoardLayout,
        rng: &mut R,
    ) -> Result<Self, SetupError> {
        if !(2..=4).contains(&player_count) {
            return Err(SetupError::PlayerCount(player_count));
        }

        let board = Board::from_layout_with_rng(layout, rng)?;
        let players = (0..player_count)
            .map(|i| Player::new(i, format!("Player {}", i + 1)))
            .collect();

        Ok(Self {
            board,
            players,
            current_player: 0,
            phase: GamePhase::Setup {
                direction: SetupDirection::Forward,
            },
            dice_roll: None,
            settlement_built: false,
            road_built: false,
        })
    }

    // ==================== Queries ====================

    /// Number of players in the session
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Get a player by ID
    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id as usize)
    }

    /// The player whose turn it is
    pub fn current_player(&self) -> &Player {
        // current_player always indexes a valid player
        &self.players[self.current_player as usize]
    }

    /// Index of the player whose turn it is
    pub fn current_player_index(&self) -> PlayerId {
        self.current_player
    }

    /// Current phase
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Setup sub-order, if the game is still in setup
    pub fn setup_direction(&self) -> Option<SetupDirection> {
        match self.phase {
            GamePhase::Setup { direction } => Some(direction),
            _ => None,
        }
    }

    /// Last dice roll as the individual dice, if any
    pub fn dice_roll(&self) -> Option<(u8, u8)> {
        self.dice_roll
    }

    /// Last dice total, if any
    pub fn last_roll(&self) -> Option<u8> {
        self.dice_roll.map(|(a, b)| a + b)
    }

    /// Whether the current player has placed their setup settlement this turn
    pub fn settlement_built(&self) -> bool {
        self.settlement_built
    }

    /// Whether the current player has placed their setup road this turn
    pub fn road_built(&self) -> bool {
        self.road_built
    }

    /// Check if the game is finished
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver { .. })
    }

    /// Get the winner if the game is finished
    pub fn winner(&self) -> Option<PlayerId> {
        match self.phase {
            GamePhase::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    // ==================== Command Entry Point ====================

    /// Apply a command issued by `player`.
    ///
    /// Returns the events that occurred, or a [`GameError`] if the command
    /// violates a rule; a rejected command mutates nothing. Every mutating
    /// command after the game has ended fails with [`GameError::GameOver`].
    pub fn apply_action(
        &mut self,
        player: PlayerId,
        action: GameAction,
    ) -> Result<Vec<GameEvent>, GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }

        match action {
            GameAction::BuildSettlement(corner) => self.build_settlement(player, corner),
            GameAction::BuildCity(corner) => self.build_city(player, corner),
            GameAction::BuildRoad(edge) => self.build_road(player, edge),
            GameAction::RollDice => {
                let mut rng = rand::thread_rng();
                self.roll_dice_with_rng(player, &mut rng)
            }
            GameAction::EndSetupPhase => Ok(self.end_setup_phase()),
            GameAction::Trade {
                to,
                give,
                take,
                quantity,
            } => self.trade(player, to, give, take, quantity),
        }
    }

    // ==================== Building ====================

    fn build_settlement(
        &mut self,
        player: PlayerId,
        corner: CornerCoord,
    ) -> Result<Vec<GameEvent>, GameError> {
        if player != self.current_player {
            return Err(GameError::NotYourTurn);
        }

        let in_setup = matches!(self.phase, GamePhase::Setup { .. });
        if in_setup && self.settlement_built {
            return Err(GameError::SetupOrderViolation);
        }

        match self.board.corner(corner).ok_or(GameError::InvalidLocation)? {
            CornerBuilding::Empty => {}
            _ => return Err(GameError::AlreadyOccupied),
        }

        if !self.player(player).has_piece(BuildingKind::Settlement) {
            return Err(GameError::NoPiecesRemaining);
        }

        // Setup placements are free; in play the full cost is deducted
        // before the board is touched.
        if !in_setup && !self.player_mut(player).pay(BuildingKind::Settlement) {
            return Err(GameError::CannotAfford);
        }

        self.board.place_settlement(corner, player);
        let p = self.player_mut(player);
        p.settlements_remaining -= 1;
        p.victory_points += 1;

        if in_setup {
            self.settlement_built = true;
        }

        let mut events = vec![GameEvent::SettlementBuilt {
            player,
            location: corner,
        }];
        events.extend(self.check_win(player));
        Ok(events)
    }

    fn build_city(
        &mut self,
        player: PlayerId,
        corner: CornerCoord,
    ) -> Result<Vec<GameEvent>, GameError> {
        if player != self.current_player {
            return Err(GameError::NotYourTurn);
        }
        // Cities cannot be built during setup
        if self.phase != GamePhase::Play {
            return Err(GameError::InvalidPhase);
        }

        match self.board.corner(corner).ok_or(GameError::InvalidLocation)? {
            CornerBuilding::Settlement(owner) if owner == player => {}
            _ => return Err(GameError::InvalidLocation),
        }

        if !self.player(player).has_piece(BuildingKind::City) {
            return Err(GameError::NoPiecesRemaining);
        }

        if !self.player_mut(player).pay(BuildingKind::City) {
            return Err(GameError::CannotAfford);
        }

        self.board.upgrade_to_city(corner, player);
        let p = self.player_mut(player);
        p.cities_remaining -= 1;
        // The settlement piece under the city returns to the player's stock
        p.settlements_remaining += 1;
        p.victory_points += 1;

        let mut events = vec![GameEvent::CityBuilt {
            player,
            location: corner,
        }];
        events.extend(self.check_win(player));
        Ok(events)
    }

    fn build_road(
        &mut self,
        player: PlayerId,
        edge: EdgeCoord,
    ) -> Result<Vec<GameEvent>, GameError> {
        if player != self.current_player {
            return Err(GameError::NotYourTurn);
        }

        let in_setup = matches!(self.phase, GamePhase::Setup { .. });
        if in_setup {
            // One settlement, then one road, per setup turn
            if !self.settlement_built {
                return Err(GameError::SetupOrderViolation);
            }
            if self.road_built {
                return Err(GameError::SetupOrderViolation);
            }
        }

        match self.board.edge(edge).ok_or(GameError::InvalidLocation)? {
            EdgeBuilding::Empty => {}
            _ => return Err(GameError::AlreadyOccupied),
        }

        if !self.player(player).has_piece(BuildingKind::Road) {
            return Err(GameError::NoPiecesRemaining);
        }

        if !in_setup {
            if !self.player(player).can_afford(BuildingKind::Road) {
                return Err(GameError::CannotAfford);
            }
            if !self.board.can_place_road(edge, player, false) {
                return Err(GameError::NotConnected);
            }
            if !self.player_mut(player).pay(BuildingKind::Road) {
                return Err(GameError::CannotAfford);
            }
        }

        self.board.place_road(edge, player);
        self.player_mut(player).roads_remaining -= 1;

        let mut events = vec![GameEvent::RoadBuilt {
            player,
            location: edge,
        }];

        if in_setup {
            self.road_built = true;
            // Settlement and road are both down; the setup turn passes on
            events.extend(self.advance_setup());
        }

        Ok(events)
    }

    // ==================== Dice & Production ====================

    /// Roll the dice with a provided RNG. Legal only in the play phase;
    /// distributes production and then advances the turn.
    pub fn roll_dice_with_rng<R: Rng>(
        &mut self,
        player: PlayerId,
        rng: &mut R,
    ) -> Result<Vec<GameEvent>, GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }
        if player != self.current_player {
            return Err(GameError::NotYourTurn);
        }
        if self.phase != GamePhase::Play {
            return Err(GameError::InvalidPhase);
        }

        let die1 = rng.gen_range(1..=6);
        let die2 = rng.gen_range(1..=6);
        let total = die1 + die2;
        self.dice_roll = Some((die1, die2));

        let mut events = vec![GameEvent::DiceRolled {
            player,
            roll: (die1, die2),
            total,
        }];

        let distribution = self.board.resources_for_roll(total);
        let mut granted = Vec::new();
        for p in self.players.iter_mut() {
            let Some(resources) = distribution.get(&p.id) else {
                continue;
            };
            for resource in Resource::ALL {
                let amount = resources.get(&resource).copied().unwrap_or(0);
                if amount > 0 {
                    p.resources.add(resource, amount);
                    granted.push((p.id, resource, amount));
                }
            }
        }
        if !granted.is_empty() {
            events.push(GameEvent::ResourcesDistributed {
                distributions: granted,
            });
        }

        // Rolling is the only action that passes the turn
        let next_player = (self.current_player + 1) % self.player_count() as PlayerId;
        events.push(GameEvent::TurnEnded {
            player,
            next_player,
        });
        self.current_player = next_player;

        Ok(events)
    }

    // ==================== Trading ====================

    fn trade(
        &mut self,
        player: PlayerId,
        to: PlayerId,
        give: Resource,
        take: Resource,
        quantity: u32,
    ) -> Result<Vec<GameEvent>, GameError> {
        if quantity == 0 || player == to {
            return Err(GameError::InvalidTrade);
        }
        if self.get_player(player).is_none() || self.get_player(to).is_none() {
            return Err(GameError::InvalidTrade);
        }

        // Both sides must hold what they are giving away before anything moves
        if self.player(player).resources.get(give) < quantity {
            return Err(GameError::CannotAfford);
        }
        if self.player(to).resources.get(take) < quantity {
            return Err(GameError::CannotAfford);
        }

        let from_hand = &mut self.player_mut(player).resources;
        from_hand.remove(give, quantity);
        from_hand.add(take, quantity);

        let to_hand = &mut self.player_mut(to).resources;
        to_hand.remove(take, quantity);
        to_hand.add(give, quantity);

        Ok(vec![GameEvent::TradeCompleted {
            from: player,
            to,
            give,
            take,
            quantity,
        }])
    }

    // ==================== Phase Transitions ====================

    /// End the setup phase if the game is still in it; otherwise a no-op.
    fn end_setup_phase(&mut self) -> Vec<GameEvent> {
        if matches!(self.phase, GamePhase::Setup { .. }) {
            self.finish_setup();
            vec![GameEvent::SetupPhaseEnded]
        } else {
            Vec::new()
        }
    }

    /// Pass the setup turn after a completed settlement+road pair.
    ///
    /// Forward order runs 0..N-1; the last player then opens the backward
    /// round without the turn changing hands, and backward runs N-1..0.
    /// Decrementing past 0 ends setup.
    fn advance_setup(&mut self) -> Vec<GameEvent> {
        let direction = match self.phase {
            GamePhase::Setup { direction } => direction,
            _ => return Vec::new(),
        };

        self.settlement_built = false;
        self.road_built = false;

        let last = self.player_count() as PlayerId - 1;
        match direction {
            SetupDirection::Forward => {
                if self.current_player < last {
                    self.current_player += 1;
                } else {
                    // The last player immediately takes the first backward turn
                    self.phase = GamePhase::Setup {
                        direction: SetupDirection::Backward,
                    };
                }
                vec![GameEvent::SetupTurnAdvanced {
                    next_player: self.current_player,
                }]
            }
            SetupDirection::Backward => {
                if self.current_player > 0 {
                    self.current_player -= 1;
                    vec![GameEvent::SetupTurnAdvanced {
                        next_player: self.current_player,
                    }]
                } else {
                    self.finish_setup();
                    vec![GameEvent::SetupPhaseEnded]
                }
            }
        }
    }

    fn finish_setup(&mut self) {
        self.phase = GamePhase::Play;
        self.current_player = 0;
        self.dice_roll = None;
        self.settlement_built = false;
        self.road_built = false;
    }

    // ==================== Helpers ====================

    fn player(&self, id: PlayerId) -> &Player {
        // Callers only pass ids validated against the roster
        &self.players[id as usize]
    }

    fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id as usize]
    }

    fn check_win(&mut self, player: PlayerId) -> Option<GameEvent> {
        let victory_points = self.player(player).victory_points;
        if victory_points >= VICTORY_POINTS_TO_WIN {
            self.phase = GamePhase::GameOver { winner: player };
            Some(GameEvent::GameWon {
                player,
                victory_points,
            })
        } else {
            None
        }
    }

    /// Convert to a JSON-friendly snapshot for presentation layers
    pub fn snapshot(&self) -> GameStateJson {
        GameStateJson {
            board: self.board.to_json_friendly(),
            players: self.players.clone(),
            current_player: self.current_player,
            phase: self.phase,
            dice_roll: self.dice_roll,
            settlement_built: self.settlement_built,
            road_built: self.road_built,
        }
    }

    /// Serialize the snapshot to a JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.snapshot())
    }
}

/// JSON-friendly session snapshot with array-based board state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStateJson {
    pub board: crate::board::BoardJson,
    pub players: Vec<Player>,
    pub current_player: PlayerId,
    pub phase: GamePhase,
    pub dice_roll: Option<(u8, u8)>,
    pub settlement_built: bool,
    pub road_built: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::ResourceHand;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn new_game(player_count: u8) -> GameState {
        let mut rng = StdRng::seed_from_u64(42);
        GameState::new_with_rng(player_count, &BoardLayout::classic(), &mut rng).unwrap()
    }

    /// Drive a 2-player game through setup with fixed placements.
    /// Visiting order is 0, 1, 1, 0.
    fn setup_two_player() -> GameState {
        let mut game = new_game(2);
        let placements = [
            (0u8, CornerCoord::new(0, 0), EdgeCoord::horizontal(0, 0)),
            (1, CornerCoord::new(0, 2), EdgeCoord::horizontal(0, 2)),
            (1, CornerCoord::new(0, 4), EdgeCoord::horizontal(0, 4)),
            (0, CornerCoord::new(2, 0), EdgeCoord::horizontal(2, 0)),
        ];
        for (player, corner, edge) in placements {
            assert_eq!(game.current_player_index(), player);
            game.apply_action(player, GameAction::BuildSettlement(corner))
                .unwrap();
            game.apply_action(player, GameAction::BuildRoad(edge))
                .unwrap();
        }
        assert_eq!(game.phase(), GamePhase::Play);
        game
    }

    #[test]
    fn test_invalid_player_count() {
        assert_eq!(GameState::new(1).unwrap_err(), SetupError::PlayerCount(1));
        assert_eq!(GameState::new(5).unwrap_err(), SetupError::PlayerCount(5));
    }

    #[test]
    fn test_new_game_starts_in_forward_setup() {
        let game = new_game(3);
        assert_eq!(
            game.phase(),
            GamePhase::Setup {
                direction: SetupDirection::Forward
            }
        );
        assert_eq!(game.current_player_index(), 0);
        assert_eq!(game.last_roll(), None);
        assert_eq!(game.player_count(), 3);
    }

    #[test]
    fn test_setup_settlement_is_free_and_scores() {
        let mut game = new_game(2);
        game.apply_action(0, GameAction::BuildSettlement(CornerCoord::new(0, 0)))
            .unwrap();

        let p = game.get_player(0).unwrap();
        assert_eq!(p.settlements_remaining, 4);
        assert_eq!(p.victory_points, 1);
        assert!(p.resources.is_empty());
        assert!(game.settlement_built());
    }

    #[test]
    fn test_setup_rejects_second_settlement_before_road() {
        let mut game = new_game(2);
        game.apply_action(0, GameAction::BuildSettlement(CornerCoord::new(0, 0)))
            .unwrap();
        let err = game
            .apply_action(0, GameAction::BuildSettlement(CornerCoord::new(3, 3)))
            .unwrap_err();
        assert_eq!(err, GameError::SetupOrderViolation);
    }

    #[test]
    fn test_setup_rejects_road_before_settlement() {
        let mut game = new_game(2);
        let err = game
            .apply_action(0, GameAction::BuildRoad(EdgeCoord::horizontal(0, 0)))
            .unwrap_err();
        assert_eq!(err, GameError::SetupOrderViolation);
    }

    #[test]
    fn test_setup_road_needs_no_connection() {
        let mut game = new_game(2);
        game.apply_action(0, GameAction::BuildSettlement(CornerCoord::new(0, 0)))
            .unwrap();
        // Far away from the settlement - allowed during setup
        game.apply_action(0, GameAction::BuildRoad(EdgeCoord::vertical(3, 5)))
            .unwrap();
        assert_eq!(game.current_player_index(), 1);
    }

    #[test]
    fn test_setup_wrong_player_rejected() {
        let mut game = new_game(2);
        let err = game
            .apply_action(1, GameAction::BuildSettlement(CornerCoord::new(0, 0)))
            .unwrap_err();
        assert_eq!(err, GameError::NotYourTurn);
    }

    #[test]
    fn test_setup_occupied_corner_rejected() {
        let mut game = new_game(2);
        game.apply_action(0, GameAction::BuildSettlement(CornerCoord::new(0, 0)))
            .unwrap();
        game.apply_action(0, GameAction::BuildRoad(EdgeCoord::horizontal(0, 0)))
            .unwrap();
        let err = game
            .apply_action(1, GameAction::BuildSettlement(CornerCoord::new(0, 0)))
            .unwrap_err();
        assert_eq!(err, GameError::AlreadyOccupied);
    }

    #[test]
    fn test_no_city_during_setup() {
        let mut game = new_game(2);
        game.apply_action(0, GameAction::BuildSettlement(CornerCoord::new(0, 0)))
            .unwrap();
        let err = game
            .apply_action(0, GameAction::BuildCity(CornerCoord::new(0, 0)))
            .unwrap_err();
        assert_eq!(err, GameError::InvalidPhase);
    }

    #[test]
    fn test_no_dice_during_setup() {
        let mut game = new_game(2);
        let err = game.apply_action(0, GameAction::RollDice).unwrap_err();
        assert_eq!(err, GameError::InvalidPhase);
    }

    #[test]
    fn test_two_player_setup_order_and_transition() {
        let game = setup_two_player();
        assert_eq!(game.phase(), GamePhase::Play);
        assert_eq!(game.current_player_index(), 0);
        assert_eq!(game.last_roll(), None);

        for p in &game.players {
            assert_eq!(p.settlements_remaining, 3);
            assert_eq!(p.roads_remaining, 13);
            assert_eq!(p.victory_points, 2);
        }
    }

    #[test]
    fn test_end_setup_phase_is_idempotent() {
        let mut game = new_game(2);
        let events = game.apply_action(0, GameAction::EndSetupPhase).unwrap();
        assert_eq!(events, vec![GameEvent::SetupPhaseEnded]);
        assert_eq!(game.phase(), GamePhase::Play);

        // Outside setup it is a successful no-op
        let events = game.apply_action(0, GameAction::EndSetupPhase).unwrap();
        assert!(events.is_empty());
        assert_eq!(game.phase(), GamePhase::Play);
    }

    #[test]
    fn test_play_settlement_requires_payment() {
        let mut game = setup_two_player();
        let err = game
            .apply_action(0, GameAction::BuildSettlement(CornerCoord::new(4, 5)))
            .unwrap_err();
        assert_eq!(err, GameError::CannotAfford);

        game.players[0].resources = ResourceHand::with_amounts(1, 1, 0, 1, 1);
        game.apply_action(0, GameAction::BuildSettlement(CornerCoord::new(4, 5)))
            .unwrap();
        let p = game.get_player(0).unwrap();
        assert!(p.resources.is_empty());
        assert_eq!(p.victory_points, 3);
    }

    #[test]
    fn test_play_road_fails_on_payment_even_when_anchored() {
        let mut game = setup_two_player();
        // Vertical edge at the player's own settlement corner, but 0 wood
        let err = game
            .apply_action(0, GameAction::BuildRoad(EdgeCoord::vertical(0, 0)))
            .unwrap_err();
        assert_eq!(err, GameError::CannotAfford);
    }

    #[test]
    fn test_play_road_connectivity_gate() {
        let mut game = setup_two_player();
        game.players[0].resources = ResourceHand::with_amounts(2, 2, 0, 0, 0);

        // No adjacent building, no road path
        let err = game
            .apply_action(0, GameAction::BuildRoad(EdgeCoord::horizontal(4, 0)))
            .unwrap_err();
        assert_eq!(err, GameError::NotConnected);

        // Reachable through the road placed during setup
        game.apply_action(0, GameAction::BuildRoad(EdgeCoord::horizontal(0, 1)))
            .unwrap();
        assert_eq!(game.get_player(0).unwrap().roads_remaining, 12);
        // Building does not pass the turn
        assert_eq!(game.current_player_index(), 0);
    }

    #[test]
    fn test_city_upgrade() {
        let mut game = setup_two_player();
        game.players[0].resources = ResourceHand::with_amounts(0, 0, 3, 2, 0);

        game.apply_action(0, GameAction::BuildCity(CornerCoord::new(0, 0)))
            .unwrap();
        let p = game.get_player(0).unwrap();
        assert_eq!(p.cities_remaining, 3);
        // The settlement piece came back
        assert_eq!(p.settlements_remaining, 4);
        assert_eq!(p.victory_points, 3);
        assert_eq!(
            game.board.corner(CornerCoord::new(0, 0)),
            Some(CornerBuilding::City(0))
        );
    }

    #[test]
    fn test_city_requires_own_settlement() {
        let mut game = setup_two_player();
        game.players[0].resources = ResourceHand::with_amounts(0, 0, 3, 2, 0);

        // Player 1 owns (0,2); an empty corner is just as illegal
        let err = game
            .apply_action(0, GameAction::BuildCity(CornerCoord::new(0, 2)))
            .unwrap_err();
        assert_eq!(err, GameError::InvalidLocation);
        let err = game
            .apply_action(0, GameAction::BuildCity(CornerCoord::new(4, 4)))
            .unwrap_err();
        assert_eq!(err, GameError::InvalidLocation);
    }

    #[test]
    fn test_roll_dice_advances_turn() {
        let mut game = setup_two_player();
        let mut rng = StdRng::seed_from_u64(7);

        let events = game.roll_dice_with_rng(0, &mut rng).unwrap();
        let total = game.last_roll().unwrap();
        assert!((2..=12).contains(&total));
        assert!(matches!(events[0], GameEvent::DiceRolled { total: t, .. } if t == total));
        assert!(matches!(
            events.last(),
            Some(GameEvent::TurnEnded {
                player: 0,
                next_player: 1
            })
        ));
        assert_eq!(game.current_player_index(), 1);

        // Only the current player may roll
        assert_eq!(
            game.roll_dice_with_rng(0, &mut rng).unwrap_err(),
            GameError::NotYourTurn
        );
    }

    #[test]
    fn test_trade() {
        let mut game = setup_two_player();
        game.players[0].resources = ResourceHand::with_amounts(2, 0, 0, 0, 0);
        game.players[1].resources = ResourceHand::with_amounts(0, 3, 0, 0, 0);

        game.apply_action(
            0,
            GameAction::Trade {
                to: 1,
                give: Resource::Wood,
                take: Resource::Brick,
                quantity: 2,
            },
        )
        .unwrap();

        assert_eq!(
            game.get_player(0).unwrap().resources,
            ResourceHand::with_amounts(0, 2, 0, 0, 0)
        );
        assert_eq!(
            game.get_player(1).unwrap().resources,
            ResourceHand::with_amounts(2, 1, 0, 0, 0)
        );
    }

    #[test]
    fn test_trade_rejected_without_stock() {
        let mut game = setup_two_player();
        game.players[0].resources = ResourceHand::with_amounts(1, 0, 0, 0, 0);

        let err = game
            .apply_action(
                0,
                GameAction::Trade {
                    to: 1,
                    give: Resource::Wood,
                    take: Resource::Brick,
                    quantity: 2,
                },
            )
            .unwrap_err();
        assert_eq!(err, GameError::CannotAfford);
        // Nothing moved
        assert_eq!(
            game.get_player(0).unwrap().resources,
            ResourceHand::with_amounts(1, 0, 0, 0, 0)
        );
    }

    #[test]
    fn test_trade_with_self_or_unknown_rejected() {
        let mut game = setup_two_player();
        let trade = |to| GameAction::Trade {
            to,
            give: Resource::Wood,
            take: Resource::Brick,
            quantity: 1,
        };
        assert_eq!(game.apply_action(0, trade(0)).unwrap_err(), GameError::InvalidTrade);
        assert_eq!(game.apply_action(0, trade(9)).unwrap_err(), GameError::InvalidTrade);
    }

    #[test]
    fn test_win_at_ten_points() {
        let mut game = setup_two_player();
        game.players[0].victory_points = 9;
        game.players[0].resources = ResourceHand::with_amounts(1, 1, 0, 1, 1);

        let events = game
            .apply_action(0, GameAction::BuildSettlement(CornerCoord::new(4, 5)))
            .unwrap();
        assert!(events.contains(&GameEvent::GameWon {
            player: 0,
            victory_points: 10
        }));
        assert_eq!(game.phase(), GamePhase::GameOver { winner: 0 });
        assert_eq!(game.winner(), Some(0));
    }

    #[test]
    fn test_nine_points_does_not_win() {
        let mut game = setup_two_player();
        game.players[0].victory_points = 8;
        game.players[0].resources = ResourceHand::with_amounts(1, 1, 0, 1, 1);

        game.apply_action(0, GameAction::BuildSettlement(CornerCoord::new(4, 5)))
            .unwrap();
        assert_eq!(game.get_player(0).unwrap().victory_points, 9);
        assert!(!game.is_finished());
    }

    #[test]
    fn test_no_actions_after_game_over() {
        let mut game = setup_two_player();
        game.players[0].victory_points = 9;
        game.players[0].resources = ResourceHand::with_amounts(1, 1, 0, 1, 1);
        game.apply_action(0, GameAction::BuildSettlement(CornerCoord::new(4, 5)))
            .unwrap();

        for action in [
            GameAction::BuildSettlement(CornerCoord::new(4, 4)),
            GameAction::BuildRoad(EdgeCoord::horizontal(4, 3)),
            GameAction::RollDice,
            GameAction::EndSetupPhase,
            GameAction::Trade {
                to: 1,
                give: Resource::Wood,
                take: Resource::Brick,
                quantity: 1,
            },
        ] {
            assert_eq!(game.apply_action(0, action).unwrap_err(), GameError::GameOver);
        }
    }

    #[test]
    fn test_snapshot_serializes() {
        let game = setup_two_player();
        let json = game.to_json().unwrap();
        assert!(json.contains("\"players\""));

        let decoded: GameStateJson = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.players.len(), 2);
        assert_eq!(decoded.phase, GamePhase::Play);
    }
}
