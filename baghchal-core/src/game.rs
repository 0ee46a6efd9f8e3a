//! Game state, win detection and the undoable game wrapper.

use serde::{Deserialize, Serialize};

use crate::{
    Board, Cell, History, Move, MoveError, Role, StateError, KILLS_TO_WIN, MAX_GOATS,
    TIGER_COUNT,
};

/// Everything needed to continue a game: the board plus counters.
///
/// This is a plain value; copying it is how history snapshots are taken.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "GameStateParts")]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) goats_placed: u8,
    pub(crate) goats_killed: u8,
    pub(crate) turn: Role,
}

impl GameState {
    /// Starting position: four corner tigers, no goats, goat to move.
    pub fn new() -> GameState {
        GameState {
            board: Board::new(),
            goats_placed: 0,
            goats_killed: 0,
            turn: Role::Goat,
        }
    }

    /// Build a state from its parts, rejecting anything that breaks the invariants.
    pub fn from_parts(
        board: Board,
        goats_placed: u8,
        goats_killed: u8,
        turn: Role,
    ) -> Result<GameState, StateError> {
        let state = GameState {
            board,
            goats_placed,
            goats_killed,
            turn,
        };
        state.check_invariants()?;
        Ok(state)
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn goats_placed(&self) -> u8 {
        self.goats_placed
    }

    #[inline]
    pub fn goats_killed(&self) -> u8 {
        self.goats_killed
    }

    /// Side to move.
    #[inline]
    pub fn turn(&self) -> Role {
        self.turn
    }

    /// Goats are still being added to the board.
    #[inline]
    pub fn is_placement_phase(&self) -> bool {
        self.goats_placed < MAX_GOATS
    }

    /// Goats not yet placed.
    #[inline]
    pub fn goats_in_hand(&self) -> u8 {
        MAX_GOATS.saturating_sub(self.goats_placed)
    }

    /// Verify piece counts against the counters.
    ///
    /// - exactly 4 tigers
    /// - goats_placed <= 20 and goats_killed <= goats_placed
    /// - goats on board == goats_placed - goats_killed
    pub fn check_invariants(&self) -> Result<(), StateError> {
        let tigers = self.board.count(Cell::Tiger);
        if tigers != TIGER_COUNT {
            return Err(StateError::TigerCount(tigers));
        }
        if self.goats_placed > MAX_GOATS {
            return Err(StateError::TooManyPlaced {
                placed: self.goats_placed,
            });
        }
        if self.goats_killed > self.goats_placed {
            return Err(StateError::TooManyKilled {
                placed: self.goats_placed,
                killed: self.goats_killed,
            });
        }
        let on_board = self.board.count(Cell::Goat);
        let expected = (self.goats_placed - self.goats_killed) as usize;
        if on_board != expected {
            return Err(StateError::GoatCount { on_board, expected });
        }
        Ok(())
    }

    // ========== Win Detection ==========

    /// Decide the outcome of the position, if it is terminal.
    ///
    /// Checked in order:
    /// 1. five goats captured: tigers win (whoever is to move)
    /// 2. tigers to move and none can move: goats win
    /// 3. goats to move, all placed, none can move: tigers win
    pub fn winner(&self) -> Option<Role> {
        if self.goats_killed >= KILLS_TO_WIN {
            return Some(Role::Tiger);
        }
        match self.turn {
            Role::Tiger if !self.can_any_piece_move(Role::Tiger) => Some(Role::Goat),
            Role::Goat if !self.is_placement_phase() && !self.can_any_piece_move(Role::Goat) => {
                Some(Role::Tiger)
            }
            _ => None,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Unchecked wire form of [`GameState`].
#[derive(Deserialize)]
struct GameStateParts {
    board: Board,
    goats_placed: u8,
    goats_killed: u8,
    turn: Role,
}

impl TryFrom<GameStateParts> for GameState {
    type Error = StateError;

    fn try_from(parts: GameStateParts) -> Result<Self, Self::Error> {
        GameState::from_parts(parts.board, parts.goats_placed, parts.goats_killed, parts.turn)
    }
}

/// A live game: the current state plus the snapshots needed to undo.
#[derive(Clone, Debug, Default)]
pub struct Game {
    state: GameState,
    history: History,
}

impl Game {
    /// Fresh game from the starting position.
    pub fn new() -> Game {
        Game::from_state(GameState::new())
    }

    /// Continue from an arbitrary state, with no history.
    pub fn from_state(state: GameState) -> Game {
        Game {
            state,
            history: History::new(),
        }
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Outcome of the current position.
    #[inline]
    pub fn winner(&self) -> Option<Role> {
        self.state.winner()
    }

    /// Check a move for the side to move.
    pub fn validate(&self, mov: Move) -> Result<(), MoveError> {
        self.state.check(self.state.turn, mov)
    }

    /// Commit a move, snapshotting the current state first.
    ///
    /// Does NOT validate - call [`Game::validate`] first, or use [`Game::play`].
    pub fn apply(&mut self, mov: Move) {
        self.history.push(self.state);
        self.state.apply(mov);
    }

    /// Validate, apply and evaluate a move in one step.
    /// Returns the winner after the move, if the game just ended.
    pub fn play(&mut self, mov: Move) -> Result<Option<Role>, MoveError> {
        self.validate(mov)?;
        self.apply(mov);
        Ok(self.state.winner())
    }

    /// Roll back the most recent move.
    /// Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.state = previous;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pos;

    fn p(row: u8, col: u8) -> Pos {
        Pos::from_row_col(row, col)
    }

    /// Board with the four corner tigers plus goats at the given cells.
    fn corners_with_goats(goats: &[Pos]) -> Board {
        let mut board = Board::new();
        for &pos in goats {
            board.set(pos, Cell::Goat);
        }
        board
    }

    // ========== Game State ==========

    #[test]
    fn test_initial_state() {
        let state = GameState::new();
        assert_eq!(state.turn(), Role::Goat);
        assert_eq!(state.goats_placed(), 0);
        assert_eq!(state.goats_killed(), 0);
        assert_eq!(state.goats_in_hand(), 20);
        assert!(state.is_placement_phase());
        assert_eq!(state.board().count(Cell::Tiger), 4);
        assert_eq!(state.board().count(Cell::Goat), 0);
        assert!(state.check_invariants().is_ok());
        assert_eq!(state.winner(), None);
    }

    #[test]
    fn test_invariant_tiger_count() {
        let mut board = Board::new();
        board.set(p(0, 0), Cell::Empty);
        assert_eq!(
            GameState::from_parts(board, 0, 0, Role::Goat),
            Err(StateError::TigerCount(3))
        );
    }

    #[test]
    fn test_invariant_goat_counts() {
        let board = corners_with_goats(&[p(2, 2)]);
        assert!(GameState::from_parts(board, 1, 0, Role::Tiger).is_ok());
        assert!(GameState::from_parts(board, 2, 1, Role::Tiger).is_ok());
        assert_eq!(
            GameState::from_parts(board, 2, 0, Role::Tiger),
            Err(StateError::GoatCount {
                on_board: 1,
                expected: 2
            })
        );
        assert_eq!(
            GameState::from_parts(board, 1, 2, Role::Tiger),
            Err(StateError::TooManyKilled {
                placed: 1,
                killed: 2
            })
        );
        assert_eq!(
            GameState::from_parts(board, 21, 20, Role::Tiger),
            Err(StateError::TooManyPlaced { placed: 21 })
        );
    }

    #[test]
    fn test_state_json_shape() {
        let json = serde_json::to_value(GameState::new()).unwrap();
        assert_eq!(json["goats_placed"], 0);
        assert_eq!(json["goats_killed"], 0);
        assert_eq!(json["turn"], "Goat");
        assert_eq!(json["board"][4][4], "T");
    }

    #[test]
    fn test_state_deserialize_checks_invariants() {
        let mut json = serde_json::to_value(GameState::new()).unwrap();
        let back: GameState = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(back, GameState::new());

        json["goats_placed"] = serde_json::json!(3);
        assert!(serde_json::from_value::<GameState>(json).is_err());
    }

    // ========== Win Detection ==========

    #[test]
    fn test_tiger_wins_after_five_kills_either_turn() {
        let board = corners_with_goats(&[p(2, 2)]);
        for turn in [Role::Tiger, Role::Goat] {
            let state = GameState::from_parts(board, 6, 5, turn).unwrap();
            assert_eq!(state.winner(), Some(Role::Tiger));
        }
    }

    #[test]
    fn test_four_kills_not_enough() {
        let board = corners_with_goats(&[p(2, 2)]);
        let state = GameState::from_parts(board, 5, 4, Role::Goat).unwrap();
        assert_eq!(state.winner(), None);
    }

    #[test]
    fn test_goats_win_when_tigers_trapped() {
        // Tigers at (0,0) (0,4) (4,0) (4,4), boxed in two deep.
        let goats = [
            p(0, 1), p(0, 2), p(1, 0), p(1, 1), p(2, 0), p(2, 2),
            p(0, 3), p(1, 4), p(1, 3), p(2, 4),
            p(3, 0), p(4, 1), p(3, 1), p(4, 2),
            p(3, 4), p(4, 3), p(3, 3),
        ];
        let board = corners_with_goats(&goats);
        let state = GameState::from_parts(board, 17, 0, Role::Tiger).unwrap();
        assert!(!state.can_any_piece_move(Role::Tiger));
        assert_eq!(state.winner(), Some(Role::Goat));

        // Same position with goats to move is not terminal.
        let state = GameState::from_parts(board, 17, 0, Role::Goat).unwrap();
        assert_eq!(state.winner(), None);
    }

    #[test]
    fn test_tiger_wins_when_goats_trapped() {
        // Only (0,1) is empty and every line into it starts at a tiger.
        let mut board = Board::empty();
        for pos in Pos::all() {
            board.set(pos, Cell::Goat);
        }
        board.set(p(0, 1), Cell::Empty);
        for pos in [p(0, 0), p(0, 2), p(1, 1), p(4, 4)] {
            board.set(pos, Cell::Tiger);
        }
        let state = GameState::from_parts(board, 20, 0, Role::Goat).unwrap();
        assert!(!state.can_any_piece_move(Role::Goat));
        assert_eq!(state.winner(), Some(Role::Tiger));
    }

    #[test]
    fn test_trapped_goats_during_placement_not_terminal() {
        let board = corners_with_goats(&[]);
        let state = GameState::from_parts(board, 0, 0, Role::Goat).unwrap();
        assert!(!state.can_any_piece_move(Role::Goat));
        assert_eq!(state.winner(), None);
    }

    #[test]
    fn test_winner_is_pure() {
        let state = GameState::new();
        let before = state;
        for _ in 0..3 {
            assert_eq!(state.winner(), None);
        }
        assert_eq!(state, before);
    }

    // ========== Game / Undo ==========

    #[test]
    fn test_play_placement() {
        let mut game = Game::new();
        let winner = game.play(Move::Place { to: p(2, 2) }).unwrap();
        assert_eq!(winner, None);
        assert_eq!(game.state().turn(), Role::Tiger);
        assert_eq!(game.state().goats_placed(), 1);
        assert_eq!(game.state().board().get(p(2, 2)), Cell::Goat);
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn test_play_rejects_illegal_without_change() {
        let mut game = Game::new();
        let err = game.play(Move::Place { to: p(0, 0) }).unwrap_err();
        assert_eq!(err, MoveError::Occupied(p(0, 0)));
        assert_eq!(*game.state(), GameState::new());
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_play_rejects_wrong_side() {
        let mut game = Game::new();
        // Goat to move; a tiger slide is not a goat move.
        let err = game
            .play(Move::Slide {
                from: p(0, 0),
                to: p(0, 1),
            })
            .unwrap_err();
        assert_eq!(err, MoveError::PlacementInProgress);
    }

    #[test]
    fn test_play_continues_after_win() {
        let board = corners_with_goats(&[p(2, 2)]);
        let state = GameState::from_parts(board, 6, 5, Role::Goat).unwrap();
        let mut game = Game::from_state(state);
        assert_eq!(game.winner(), Some(Role::Tiger));
        assert!(game.state().validate_move(0, 0, 3, 3));

        // A decided game still accepts legal moves and keeps reporting the winner.
        assert_eq!(game.play(Move::Place { to: p(3, 3) }), Ok(Some(Role::Tiger)));
        assert_eq!(game.state().goats_placed(), 7);
        assert_eq!(game.state().turn(), Role::Tiger);
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn test_undo_restores_previous_state() {
        let mut game = Game::new();
        game.play(Move::Place { to: p(1, 1) }).unwrap();
        let after_first = *game.state();
        game.play(Move::Slide {
            from: p(0, 4),
            to: p(1, 4),
        })
        .unwrap();

        assert!(game.undo());
        assert_eq!(*game.state(), after_first);
        assert!(game.undo());
        assert_eq!(*game.state(), GameState::new());
        assert!(!game.undo());
        assert_eq!(*game.state(), GameState::new());
    }

    #[test]
    fn test_undo_restores_capture() {
        let board = corners_with_goats(&[p(0, 1)]);
        let state = GameState::from_parts(board, 1, 0, Role::Tiger).unwrap();
        let mut game = Game::from_state(state);

        game.play(Move::Slide {
            from: p(0, 0),
            to: p(0, 2),
        })
        .unwrap();
        assert_eq!(game.state().goats_killed(), 1);
        assert!(game.undo());
        assert_eq!(*game.state(), state);
    }

    #[test]
    fn test_undo_does_not_touch_turn_independently() {
        let mut game = Game::new();
        game.play(Move::Place { to: p(1, 1) }).unwrap();
        assert_eq!(game.state().turn(), Role::Tiger);
        game.undo();
        assert_eq!(game.state().turn(), Role::Goat);
    }
}
