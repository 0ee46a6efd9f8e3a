//! Move legality and move application.
//!
//! Legality is a pure function of the state and an explicit role, so the
//! mobility scan used by win detection never touches the turn.

use crate::{Cell, GameState, Move, MoveError, Pos, Role};

/// One step along a board line: orthogonal always, diagonal only from an
/// intersection with diagonals.
pub(crate) fn is_step(from: Pos, to: Pos) -> bool {
    let row_diff = from.row().abs_diff(to.row());
    let col_diff = from.col().abs_diff(to.col());
    match (row_diff, col_diff) {
        (1, 0) | (0, 1) => true,
        (1, 1) => from.has_diagonals(),
        _ => false,
    }
}

/// The intersection jumped over by a straight two-step line from `from` to
/// `to`, if the geometry allows a jump at all.
pub(crate) fn jump_over(from: Pos, to: Pos) -> Option<Pos> {
    let row_diff = from.row().abs_diff(to.row());
    let col_diff = from.col().abs_diff(to.col());
    let straight = match (row_diff, col_diff) {
        (2, 0) | (0, 2) => true,
        (2, 2) => from.has_diagonals(),
        _ => false,
    };
    straight.then(|| Pos::from_row_col((from.row() + to.row()) / 2, (from.col() + to.col()) / 2))
}

impl GameState {
    // ========== Interpretation ==========

    /// Turn raw request coordinates into a move for the side to move.
    ///
    /// While goats are being placed, a goat move is a placement and the start
    /// coordinates are ignored (they may be absent).
    pub fn interpret(&self, start: Option<(i64, i64)>, end: (i64, i64)) -> Result<Move, MoveError> {
        let to = Pos::checked(end.0, end.1).ok_or(MoveError::OutOfBounds)?;
        if self.turn == Role::Goat && self.is_placement_phase() {
            return Ok(Move::Place { to });
        }
        let (row, col) = start.ok_or(MoveError::MissingOrigin)?;
        let from = Pos::checked(row, col).ok_or(MoveError::OutOfBounds)?;
        Ok(Move::Slide { from, to })
    }

    /// Coordinate-level legality check for the side to move.
    pub fn validate_move(&self, start_row: i64, start_col: i64, end_row: i64, end_col: i64) -> bool {
        self.interpret(Some((start_row, start_col)), (end_row, end_col))
            .and_then(|mov| self.check(self.turn, mov))
            .is_ok()
    }

    // ========== Legality ==========

    /// Is `mov` legal for `role` in this position?
    ///
    /// Ignores whose turn it is; callers pass the role they want to test.
    pub fn check(&self, role: Role, mov: Move) -> Result<(), MoveError> {
        let to = mov.to();
        if !self.board.is_empty(to) {
            return Err(MoveError::Occupied(to));
        }
        match role {
            Role::Goat => self.check_goat(mov),
            Role::Tiger => self.check_tiger(mov),
        }
    }

    fn check_goat(&self, mov: Move) -> Result<(), MoveError> {
        match mov {
            Move::Place { .. } if self.is_placement_phase() => Ok(()),
            Move::Place { .. } => Err(MoveError::PlacementFinished),
            Move::Slide { .. } if self.is_placement_phase() => Err(MoveError::PlacementInProgress),
            Move::Slide { from, to } => {
                self.expect_piece(Role::Goat, from)?;
                if is_step(from, to) {
                    Ok(())
                } else {
                    Err(MoveError::NotAdjacent { from, to })
                }
            }
        }
    }

    fn check_tiger(&self, mov: Move) -> Result<(), MoveError> {
        let Move::Slide { from, to } = mov else {
            return Err(MoveError::TigerCannotPlace);
        };
        self.expect_piece(Role::Tiger, from)?;
        if is_step(from, to) {
            return Ok(());
        }
        match jump_over(from, to) {
            Some(over) if self.board.get(over) == Cell::Goat => Ok(()),
            Some(over) => Err(MoveError::NothingToCapture(over)),
            None => Err(MoveError::NotAdjacent { from, to }),
        }
    }

    fn expect_piece(&self, role: Role, pos: Pos) -> Result<(), MoveError> {
        if self.board.get(pos) == role.piece() {
            Ok(())
        } else {
            Err(MoveError::NotYourPiece { role, pos })
        }
    }

    // ========== Mobility ==========

    /// Candidate moves for the piece at `from`: every destination within two
    /// steps in any direction.
    fn candidates(&self, role: Role, from: Pos) -> impl Iterator<Item = Move> + '_ {
        let placing = role == Role::Goat && self.is_placement_phase();
        (-2i8..=2)
            .flat_map(move |dr| (-2i8..=2).map(move |dc| (dr, dc)))
            .filter_map(move |(dr, dc)| from.offset(dr, dc))
            .map(move |to| {
                if placing {
                    Move::Place { to }
                } else {
                    Move::Slide { from, to }
                }
            })
    }

    /// Legal moves for `role`, in board order.
    ///
    /// During placement only cells within two steps of a goat already on the
    /// board are reached, matching [`GameState::can_any_piece_move`]; use
    /// [`GameState::placements`] for every empty cell.
    fn reachable_moves(&self, role: Role) -> impl Iterator<Item = Move> + '_ {
        self.board
            .positions_of(role.piece())
            .flat_map(move |from| self.candidates(role, from))
            .filter(move |&mov| self.check(role, mov).is_ok())
    }

    /// Whether any piece of `role` has a legal move.
    ///
    /// Scans each piece against its 5x5 neighbourhood and stops at the first
    /// legal move. The turn is not consulted or changed.
    pub fn can_any_piece_move(&self, role: Role) -> bool {
        self.reachable_moves(role).next().is_some()
    }

    /// Every empty cell a goat could be placed on right now.
    pub fn placements(&self) -> Vec<Move> {
        if !self.is_placement_phase() {
            return Vec::new();
        }
        self.board
            .positions_of(Cell::Empty)
            .map(|to| Move::Place { to })
            .collect()
    }

    /// Every legal move for `role`.
    pub fn legal_moves(&self, role: Role) -> Vec<Move> {
        if role == Role::Goat && self.is_placement_phase() {
            return self.placements();
        }
        self.reachable_moves(role).collect()
    }

    /// Destinations reachable from `from` by the piece standing there.
    pub fn destinations(&self, from: Pos) -> Vec<Pos> {
        let Some(role) = self.board.get(from).role() else {
            return Vec::new();
        };
        if role == Role::Goat && self.is_placement_phase() {
            return Vec::new();
        }
        self.candidates(role, from)
            .filter(|&mov| self.check(role, mov).is_ok())
            .map(|mov| mov.to())
            .collect()
    }

    // ========== Application ==========

    /// Mutate the state by `mov` and pass the turn.
    ///
    /// Does NOT validate - the move must already have passed [`GameState::check`].
    pub(crate) fn apply(&mut self, mov: Move) {
        match mov {
            Move::Place { to } => {
                self.board.set(to, Cell::Goat);
                self.goats_placed += 1;
            }
            Move::Slide { from, to } => {
                let piece = self.board.get(from);
                if piece == Cell::Tiger {
                    if let Some(over) = jump_over(from, to) {
                        if self.board.get(over) == Cell::Goat {
                            self.board.set(over, Cell::Empty);
                            self.goats_killed += 1;
                        }
                    }
                }
                self.board.set(to, piece);
                self.board.set(from, Cell::Empty);
            }
        }
        self.turn = self.turn.opponent();
    }
}
