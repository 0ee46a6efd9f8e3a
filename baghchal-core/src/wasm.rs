//! WASM bindings for baghchal-core
//!
//! Lets the browser client compute move hints with the same rules the server
//! enforces. The server stays authoritative; nothing here is trusted.

use wasm_bindgen::prelude::*;

use crate::{Game, GameState, Move, Pos, Role};

/// WASM-friendly wrapper around Game
#[wasm_bindgen]
pub struct WasmGame {
    inner: Game,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a game in the starting position
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame { inner: Game::new() }
    }

    /// Load a state received from the server (`gameStart` / `gameStateUpdate`)
    #[wasm_bindgen(js_name = fromState)]
    pub fn from_state(state: JsValue) -> Result<WasmGame, JsValue> {
        let state: GameState = serde_wasm_bindgen::from_value(state)?;
        Ok(WasmGame {
            inner: Game::from_state(state),
        })
    }

    /// Current state in the wire format
    pub fn state(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(self.inner.state())?)
    }

    /// Side to move: "Tiger" or "Goat"
    pub fn turn(&self) -> String {
        self.inner.state().turn().to_string()
    }

    /// Winner ("Tiger" / "Goat") or undefined while the game is running
    pub fn winner(&self) -> Option<String> {
        self.inner.winner().map(|role| role.to_string())
    }

    /// Check a move for the side to move (start is ignored during placement)
    #[wasm_bindgen(js_name = isValidMove)]
    pub fn is_valid_move(&self, start_row: i32, start_col: i32, end_row: i32, end_col: i32) -> bool {
        self.inner.state().validate_move(
            i64::from(start_row),
            i64::from(start_col),
            i64::from(end_row),
            i64::from(end_col),
        )
    }

    /// Destinations for the piece at (row, col) as [row, col, row, col, ...]
    ///
    /// During goat placement, returns every empty cell instead.
    pub fn destinations(&self, row: u8, col: u8) -> Vec<u8> {
        let state = self.inner.state();
        let targets: Vec<Pos> = if state.turn() == Role::Goat && state.is_placement_phase() {
            state.placements().iter().map(Move::to).collect()
        } else {
            match Pos::checked(i64::from(row), i64::from(col)) {
                Some(from) => state.destinations(from),
                None => Vec::new(),
            }
        };
        targets.iter().flat_map(|pos| [pos.row(), pos.col()]).collect()
    }

    /// Apply a move locally. Returns true if it was legal.
    #[wasm_bindgen(js_name = applyMove)]
    pub fn apply_move(&mut self, start_row: i32, start_col: i32, end_row: i32, end_col: i32) -> bool {
        let mov = self.inner.state().interpret(
            Some((i64::from(start_row), i64::from(start_col))),
            (i64::from(end_row), i64::from(end_col)),
        );
        match mov {
            Ok(mov) => self.inner.play(mov).is_ok(),
            Err(_) => false,
        }
    }

    /// Take back the last local move
    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }

    /// Whether undo would do anything
    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        !self.inner.history().is_empty()
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}
