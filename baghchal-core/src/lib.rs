//! Baghchal (Tigers and Goats) game logic and two-player session handling.
//!
//! # Board
//!
//! ```text
//! Intersections are indexed row-major, (row, col) in [0,5) x [0,5):
//!
//!   (0,0)=0  (0,1)=1  (0,2)=2  (0,3)=3  (0,4)=4
//!   (1,0)=5  (1,1)=6  (1,2)=7  (1,3)=8  (1,4)=9
//!   (2,0)=10 (2,1)=11 (2,2)=12 (2,3)=13 (2,4)=14
//!   (3,0)=15 (3,1)=16 (3,2)=17 (3,3)=18 (3,4)=19
//!   (4,0)=20 (4,1)=21 (4,2)=22 (4,3)=23 (4,4)=24
//!
//! Lines on the physical board:
//!
//!   T---.---.---.---T
//!   | \ | / | \ | / |
//!   .---.---.---.---.
//!   | / | \ | / | \ |
//!   .---.---.---.---.
//!   | \ | / | \ | / |
//!   .---.---.---.---.
//!   | / | \ | / | \ |
//!   T---.---.---.---T
//! ```
//!
//! Orthogonal neighbours are always connected. Diagonal lines only leave
//! intersections whose `row + col` is even.
//!
//! # Layout
//!
//! - [`Board`] / [`GameState`]: the grid plus placement, capture and turn counters.
//! - Rules (`GameState::check`, `GameState::apply`): legality and mutation for both roles.
//! - [`GameState::winner`]: terminal outcome.
//! - [`Game`] / [`History`]: live state with a snapshot stack for undo.
//! - [`session::SessionManager`]: waiting slot and room registry.
//! - [`protocol`]: events exchanged with clients.

mod board;
mod error;
mod game;
mod history;
mod rules;

pub mod protocol;
pub mod session;

#[cfg(feature = "wasm")]
pub mod wasm;

use serde::{Deserialize, Serialize};

pub use board::Board;
pub use error::{MoveError, StateError};
pub use game::{Game, GameState};
pub use history::History;

/// Board side length.
pub const BOARD_SIZE: u8 = 5;

/// Number of intersections on the board.
pub const CELL_COUNT: usize = 25;

/// Number of tigers; they are never removed.
pub const TIGER_COUNT: usize = 4;

/// Goats available to place over the whole game.
pub const MAX_GOATS: u8 = 20;

/// Captures needed for the tigers to win.
pub const KILLS_TO_WIN: u8 = 5;

/// One side of the game.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Role {
    Tiger,
    Goat,
}

impl Role {
    /// The other side.
    #[inline]
    pub fn opponent(self) -> Role {
        match self {
            Role::Tiger => Role::Goat,
            Role::Goat => Role::Tiger,
        }
    }

    /// The cell value occupied by a piece of this role.
    #[inline]
    pub fn piece(self) -> Cell {
        match self {
            Role::Tiger => Cell::Tiger,
            Role::Goat => Cell::Goat,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Tiger => f.write_str("Tiger"),
            Role::Goat => f.write_str("Goat"),
        }
    }
}

/// Content of a single intersection.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    #[serde(rename = ".")]
    Empty,
    #[serde(rename = "T")]
    Tiger,
    #[serde(rename = "G")]
    Goat,
}

impl Cell {
    /// The role owning the piece in this cell, if any.
    #[inline]
    pub fn role(self) -> Option<Role> {
        match self {
            Cell::Empty => None,
            Cell::Tiger => Some(Role::Tiger),
            Cell::Goat => Some(Role::Goat),
        }
    }

    /// Single-character form used by the board diagram and the wire format.
    #[inline]
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Tiger => 'T',
            Cell::Goat => 'G',
        }
    }
}

/// Intersection on the 5x5 board (0-24, row-major).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct Pos(pub u8);

impl Pos {
    /// Create a position from row and column (0-4 each).
    #[inline]
    pub fn from_row_col(row: u8, col: u8) -> Pos {
        debug_assert!(row < BOARD_SIZE && col < BOARD_SIZE);
        Pos(row * BOARD_SIZE + col)
    }

    /// Create a position from untrusted coordinates.
    /// Returns None when either coordinate falls outside the board.
    pub fn checked(row: i64, col: i64) -> Option<Pos> {
        let size = i64::from(BOARD_SIZE);
        if (0..size).contains(&row) && (0..size).contains(&col) {
            Some(Pos::from_row_col(row as u8, col as u8))
        } else {
            None
        }
    }

    /// Get the row (0-4).
    #[inline]
    pub fn row(self) -> u8 {
        self.0 / BOARD_SIZE
    }

    /// Get the column (0-4).
    #[inline]
    pub fn col(self) -> u8 {
        self.0 % BOARD_SIZE
    }

    /// Check if this is a valid position (0-24).
    #[inline]
    pub fn is_valid(self) -> bool {
        (self.0 as usize) < CELL_COUNT
    }

    /// Whether diagonal lines pass through this intersection.
    #[inline]
    pub fn has_diagonals(self) -> bool {
        (self.row() + self.col()) % 2 == 0
    }

    /// Shift by a row/column delta, staying on the board.
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Pos> {
        Pos::checked(
            i64::from(self.row()) + i64::from(d_row),
            i64::from(self.col()) + i64::from(d_col),
        )
    }

    /// Iterate over all 25 positions.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..CELL_COUNT as u8).map(Pos)
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row(), self.col())
    }
}

/// A move in the game.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Move {
    /// Put a new goat on the board (placement phase only).
    Place { to: Pos },
    /// Move a piece already on the board: a one-step slide, or a tiger jump.
    Slide { from: Pos, to: Pos },
}

impl Move {
    /// Get the destination position of the move.
    #[inline]
    pub fn to(&self) -> Pos {
        match self {
            Move::Place { to } => *to,
            Move::Slide { to, .. } => *to,
        }
    }

    /// Get the origin, if the move starts from the board.
    #[inline]
    pub fn from(&self) -> Option<Pos> {
        match self {
            Move::Place { .. } => None,
            Move::Slide { from, .. } => Some(*from),
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::Place { to } => write!(f, "G{}", to),
            Move::Slide { from, to } => write!(f, "{}->{}", from, to),
        }
    }
}
