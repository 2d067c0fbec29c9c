//! WASM bindings for merge2048-core
//!
//! Provides a JavaScript-friendly API for the game logic.

use wasm_bindgen::prelude::*;
use crate::{tile_value, Direction, Game, Pos};

/// WASM-friendly wrapper around Game
#[wasm_bindgen]
pub struct WasmGame {
    inner: Game,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create an empty game whose spawns are reproducible from `seed`
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> WasmGame {
        WasmGame { inner: Game::seeded(seed) }
    }

    /// Clear the board, reset the score and deal two tiles
    pub fn initialize(&mut self) {
        self.inner.initialize();
    }

    /// Move in a direction ("up", "down", "left", "right" or w/a/s/d).
    /// Returns false for an unknown direction.
    pub fn shift(&mut self, direction: &str) -> bool {
        match Direction::from_key(direction) {
            Some(dir) => {
                self.inner.play(dir);
                true
            }
            None => false,
        }
    }

    /// Tile value at (row, col), or -1 if the position is off the board.
    /// Returned as a JS number so tiles up to 2^31 stay positive.
    pub fn tile(&self, row: i32, col: i32) -> f64 {
        match Pos::checked(row as i64, col as i64) {
            Ok(pos) => f64::from(self.inner.board().get(pos)),
            Err(_) => -1.0,
        }
    }

    /// Set a tile. Returns false if the position or value is invalid.
    #[wasm_bindgen(js_name = setTile)]
    pub fn set_tile(&mut self, row: i32, col: i32, value: i32) -> bool {
        let checked = Pos::checked(row as i64, col as i64)
            .and_then(|pos| Ok((pos, tile_value(value as i64)?)));
        match checked {
            Ok((pos, value)) => self.inner.set_tile(pos.row(), pos.col(), value).is_ok(),
            Err(_) => false,
        }
    }

    pub fn score(&self) -> f64 {
        self.inner.score() as f64
    }

    #[wasm_bindgen(js_name = isWon)]
    pub fn is_won(&self) -> bool {
        self.inner.is_won()
    }

    #[wasm_bindgen(js_name = isOver)]
    pub fn is_over(&self) -> bool {
        self.inner.is_over()
    }

    /// Text rendering: score line followed by the grid
    pub fn render(&self) -> String {
        self.inner.to_string()
    }

    /// Board and score as `{ tiles: number[][], score: number }`.
    /// Throws if the score is past JS's safe integer range.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.snapshot()).map_err(JsValue::from)
    }
}
