//! Board state and move mechanics for a 4x4 sliding-tile merge puzzle.
//!
//! # Board Layout
//!
//! ```text
//! Cells are addressed by (row, col), row-major:
//!   (0,0)  (0,1)  (0,2)  (0,3)
//!   (1,0)  (1,1)  (1,2)  (1,3)
//!   (2,0)  (2,1)  (2,2)  (2,3)
//!   (3,0)  (3,1)  (3,2)  (3,3)
//!
//! Tile values: 0 = empty, otherwise a power of two (2, 4, 8, ... 2048).
//! ```
//!
//! # Moves
//!
//! Every move runs the same line collapse over the four rows (left/right) or
//! the four columns (up/down). Left and up read each line from index 0,
//! right and down read it from index 3, so the collapse always slides toward
//! the front of the line it is handed.

#[cfg(feature = "wasm")]
pub mod wasm;

mod error;
mod game;
mod rng;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use error::TileError;
pub use game::{spawn_tile, Game, GameSnapshot, Spawn, Turn};
pub use rng::{FixedSequence, RandomSource};

/// Width and height of the board.
pub const BOARD_SIZE: usize = 4;

/// Tile value that wins the game.
pub const WIN_TILE: u32 = 2048;

/// Largest storable tile. Two of these never merge, since the result would
/// not fit in a cell.
pub const MAX_TILE: u32 = 1 << 31;

/// Whether two equal neighbours holding `value` would merge.
#[inline]
fn can_merge(value: u32) -> bool {
    value != 0 && value < MAX_TILE
}

/// Check whether a value may be stored in a cell.
#[inline]
pub fn is_tile(value: u32) -> bool {
    value == 0 || value.is_power_of_two()
}

/// Validate a signed tile value read from a host.
pub fn tile_value(value: i64) -> Result<u32, TileError> {
    match u32::try_from(value) {
        Ok(tile) if is_tile(tile) => Ok(tile),
        _ => Err(TileError::InvalidTileValue { value }),
    }
}

/// Move direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Parse a `w/a/s/d` key or a direction name, ignoring case.
    pub fn from_key(key: &str) -> Option<Direction> {
        match key.trim().to_ascii_lowercase().as_str() {
            "w" | "up" => Some(Direction::Up),
            "s" | "down" => Some(Direction::Down),
            "a" | "left" => Some(Direction::Left),
            "d" | "right" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Lines are rows for horizontal moves and columns for vertical ones.
    #[inline]
    fn axis(self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::Rows,
            Direction::Up | Direction::Down => Axis::Columns,
        }
    }

    /// Whether tiles slide toward the high-index edge.
    #[inline]
    fn reversed(self) -> bool {
        matches!(self, Direction::Down | Direction::Right)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug)]
enum Axis {
    Rows,
    Columns,
}

/// A validated cell position.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct Pos {
    row: u8,
    col: u8,
}

impl Pos {
    /// Create a position, rejecting anything off the board.
    pub fn new(row: usize, col: usize) -> Result<Pos, TileError> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Ok(Pos {
                row: row as u8,
                col: col as u8,
            })
        } else {
            Err(TileError::InvalidPosition {
                row: row as i64,
                col: col as i64,
            })
        }
    }

    /// Create a position from signed host input.
    pub fn checked(row: i64, col: i64) -> Result<Pos, TileError> {
        let invalid = TileError::InvalidPosition { row, col };
        match (usize::try_from(row), usize::try_from(col)) {
            (Ok(r), Ok(c)) => Pos::new(r, c).map_err(|_| invalid),
            _ => Err(invalid),
        }
    }

    #[inline]
    pub fn row(self) -> usize {
        self.row as usize
    }

    #[inline]
    pub fn col(self) -> usize {
        self.col as usize
    }

    /// Iterate over all cells in row-major order.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..BOARD_SIZE * BOARD_SIZE).map(|i| Pos {
            row: (i / BOARD_SIZE) as u8,
            col: (i % BOARD_SIZE) as u8,
        })
    }
}

/// Result of collapsing one line.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Collapse {
    /// The collapsed line, front first.
    pub line: [u32; BOARD_SIZE],
    /// Sum of all tiles created by merges.
    pub gained: u64,
}

/// Slide and merge one line toward its front (index 0).
///
/// Gaps are dropped, then equal neighbours merge front to back. A tile
/// produced by a merge never merges again in the same pass, so `[2, 2, 2, 0]`
/// becomes `[4, 2, 0, 0]`. Tiles at [`MAX_TILE`] slide but never merge.
pub fn collapse_line(line: [u32; BOARD_SIZE]) -> Collapse {
    let mut out = [0u32; BOARD_SIZE];
    let mut gained = 0;
    let mut cursor = 0;

    for value in line.into_iter().filter(|&v| v != 0) {
        if out[cursor] == value && can_merge(value) {
            out[cursor] *= 2;
            gained += u64::from(out[cursor]);
            cursor += 1;
        } else {
            if out[cursor] != 0 {
                cursor += 1;
            }
            out[cursor] = value;
        }
    }

    Collapse { line: out, gained }
}

/// The 4x4 grid of tile values.
///
/// Every cell holds 0 or a power of two. External writes go through
/// [`Board::set_tile`], which rejects anything else.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Board([[u32; BOARD_SIZE]; BOARD_SIZE]);

impl Board {
    /// Create an empty board.
    #[inline]
    pub fn new() -> Board {
        Board([[0; BOARD_SIZE]; BOARD_SIZE])
    }

    /// Build a board from rows, validating every value.
    pub fn from_rows(rows: [[u32; BOARD_SIZE]; BOARD_SIZE]) -> Result<Board, TileError> {
        let mut board = Board::new();
        for pos in Pos::all() {
            board.set_tile(pos.row(), pos.col(), rows[pos.row()][pos.col()])?;
        }
        Ok(board)
    }

    /// Get the tile at (row, col).
    pub fn tile(&self, row: usize, col: usize) -> Result<u32, TileError> {
        Pos::new(row, col).map(|pos| self.get(pos))
    }

    /// Set the tile at (row, col). The board is untouched on error.
    pub fn set_tile(&mut self, row: usize, col: usize, value: u32) -> Result<(), TileError> {
        let pos = Pos::new(row, col)?;
        if !is_tile(value) {
            return Err(TileError::InvalidTileValue {
                value: value as i64,
            });
        }
        self.put(pos, value);
        Ok(())
    }

    #[inline]
    pub fn get(&self, pos: Pos) -> u32 {
        self.0[pos.row()][pos.col()]
    }

    #[inline]
    pub(crate) fn put(&mut self, pos: Pos, value: u32) {
        debug_assert!(is_tile(value), "non power-of-two tile {value}");
        self.0[pos.row()][pos.col()] = value;
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        *self = Board::new();
    }

    /// Rows, top to bottom.
    #[inline]
    pub fn rows(&self) -> &[[u32; BOARD_SIZE]; BOARD_SIZE] {
        &self.0
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        Pos::all().filter(move |&pos| self.get(pos) == 0)
    }

    pub fn empty_count(&self) -> usize {
        self.empty_cells().count()
    }

    pub fn max_tile(&self) -> u32 {
        self.0.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn contains(&self, value: u32) -> bool {
        self.0.iter().flatten().any(|&v| v == value)
    }

    /// Check for two horizontally or vertically adjacent equal tiles.
    ///
    /// Each of the 12 horizontal and 12 vertical neighbour pairs is looked at
    /// once. Empty cells and [`MAX_TILE`] pairs never count.
    pub fn has_adjacent_pair(&self) -> bool {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE - 1 {
                let v = self.0[row][col];
                if can_merge(v) && v == self.0[row][col + 1] {
                    return true;
                }
            }
        }
        for row in 0..BOARD_SIZE - 1 {
            for col in 0..BOARD_SIZE {
                let v = self.0[row][col];
                if can_merge(v) && v == self.0[row + 1][col] {
                    return true;
                }
            }
        }
        false
    }

    /// True once a winning tile is on the board.
    pub fn is_won(&self) -> bool {
        self.contains(WIN_TILE)
    }

    /// True when won, or when the board is full with no mergeable pair.
    pub fn is_over(&self) -> bool {
        if self.is_won() {
            return true;
        }
        self.empty_count() == 0 && !self.has_adjacent_pair()
    }

    /// Cells of one line in travel order.
    fn line_cells(axis: Axis, line: usize, reversed: bool) -> [Pos; BOARD_SIZE] {
        std::array::from_fn(|i| {
            let offset = if reversed { BOARD_SIZE - 1 - i } else { i };
            let (row, col) = match axis {
                Axis::Rows => (line, offset),
                Axis::Columns => (offset, line),
            };
            Pos {
                row: row as u8,
                col: col as u8,
            }
        })
    }

    /// Apply a move without spawning.
    ///
    /// Returns the collapsed board and the score gained from merges.
    pub fn slide(&self, direction: Direction) -> (Board, u64) {
        let axis = direction.axis();
        let reversed = direction.reversed();
        let mut next = *self;
        let mut gained = 0;

        for line in 0..BOARD_SIZE {
            let cells = Self::line_cells(axis, line, reversed);
            let values = cells.map(|pos| self.get(pos));
            if values.iter().all(|&v| v == 0) {
                continue;
            }

            let collapse = collapse_line(values);
            gained += collapse.gained;
            for (pos, value) in cells.into_iter().zip(collapse.line) {
                next.put(pos, value);
            }
        }

        (next, gained)
    }
}

/// Grid only: rows joined by two tabs, empty cells as `.`.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.0 {
            let cells: Vec<String> = row
                .iter()
                .map(|&v| if v == 0 { ".".to_string() } else { v.to_string() })
                .collect();
            writeln!(f, "{}", cells.join("\t\t"))?;
        }
        Ok(())
    }
}
