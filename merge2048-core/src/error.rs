use std::fmt;

/// Rejected tile access.
///
/// Positions and values are carried as signed integers so that hosts reading
/// raw (possibly negative) input can report exactly what was passed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileError {
    /// Row or column outside `[0, BOARD_SIZE)`.
    InvalidPosition { row: i64, col: i64 },
    /// Value that is neither 0 nor a power of two.
    InvalidTileValue { value: i64 },
}

impl fmt::Display for TileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPosition { row, col } => {
                write!(f, "invalid tile position: ({row}, {col})")
            }
            Self::InvalidTileValue { value } => {
                write!(f, "invalid tile value: {value} (must be 0 or a power of two)")
            }
        }
    }
}

impl std::error::Error for TileError {}
