use crate::{Pos, Role};

/// Why a move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("coordinates are outside the board")]
    OutOfBounds,

    #[error("destination {0} is occupied")]
    Occupied(Pos),

    #[error("no {role} at {pos}")]
    NotYourPiece { role: Role, pos: Pos },

    #[error("{from} and {to} are not connected by a line")]
    NotAdjacent { from: Pos, to: Pos },

    #[error("no goat to capture at {0}")]
    NothingToCapture(Pos),

    #[error("goats must all be placed before any goat moves")]
    PlacementInProgress,

    #[error("all goats have already been placed")]
    PlacementFinished,

    #[error("tigers cannot be placed")]
    TigerCannotPlace,

    #[error("move has no starting position")]
    MissingOrigin,
}

/// A board or game state that breaks the game's invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("board must be 5x5, got {rows} rows")]
    RowCount { rows: usize },

    #[error("row {row} has {len} cells, expected 5")]
    RowLength { row: usize, len: usize },

    #[error("expected 4 tigers, found {0}")]
    TigerCount(usize),

    #[error("{placed} goats placed exceeds the limit of 20")]
    TooManyPlaced { placed: u8 },

    #[error("{killed} goats killed but only {placed} placed")]
    TooManyKilled { placed: u8, killed: u8 },

    #[error("{on_board} goats on board, expected {expected}")]
    GoatCount { on_board: usize, expected: usize },
}
