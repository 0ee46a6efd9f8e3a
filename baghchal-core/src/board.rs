//! The 5x5 grid.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Cell, Pos, StateError, BOARD_SIZE, CELL_COUNT};

/// The four corner intersections where the tigers start.
const TIGER_HOMES: [Pos; 4] = [Pos(0), Pos(4), Pos(20), Pos(24)];

/// Board contents, row-major.
///
/// Serialized as a 5x5 array of `"."`, `"T"` and `"G"`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<Cell>>", try_from = "Vec<Vec<Cell>>")]
pub struct Board([Cell; CELL_COUNT]);

impl Board {
    /// Starting layout: a tiger on each corner, nothing else.
    pub fn new() -> Board {
        let mut board = Board::empty();
        for pos in TIGER_HOMES {
            board.set(pos, Cell::Tiger);
        }
        board
    }

    /// A board with no pieces at all.
    #[inline]
    pub fn empty() -> Board {
        Board([Cell::Empty; CELL_COUNT])
    }

    /// Content of the cell at `pos`.
    #[inline]
    pub fn get(&self, pos: Pos) -> Cell {
        self.0[pos.0 as usize]
    }

    /// Overwrite the cell at `pos`.
    /// Does NOT validate - callers keep the piece counts consistent.
    #[inline]
    pub fn set(&mut self, pos: Pos, cell: Cell) {
        self.0[pos.0 as usize] = cell;
    }

    /// Check if a cell is empty.
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.get(pos) == Cell::Empty
    }

    /// Number of cells holding `cell`.
    pub fn count(&self, cell: Cell) -> usize {
        self.0.iter().filter(|&&c| c == cell).count()
    }

    /// Positions holding `cell`, in row-major order.
    pub fn positions_of(&self, cell: Cell) -> impl Iterator<Item = Pos> + '_ {
        Pos::all().filter(move |&pos| self.get(pos) == cell)
    }

    /// Cells of one row (0-4).
    pub fn row(&self, row: u8) -> &[Cell] {
        let start = (row * BOARD_SIZE) as usize;
        &self.0[start..start + BOARD_SIZE as usize]
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Board> for Vec<Vec<Cell>> {
    fn from(board: Board) -> Self {
        (0..BOARD_SIZE).map(|row| board.row(row).to_vec()).collect()
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Board {
    type Error = StateError;

    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self, Self::Error> {
        if rows.len() != BOARD_SIZE as usize {
            return Err(StateError::RowCount { rows: rows.len() });
        }
        let mut board = Board::empty();
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != BOARD_SIZE as usize {
                return Err(StateError::RowLength {
                    row,
                    len: cells.len(),
                });
            }
            for (col, &cell) in cells.iter().enumerate() {
                board.set(Pos::from_row_col(row as u8, col as u8), cell);
            }
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            let line: String = self.row(row).iter().map(|c| c.symbol()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
