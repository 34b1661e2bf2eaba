use thiserror::Error;

/// Problems with a maze layout handed to the simulation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("layout has no cells")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown glyph {glyph:?} at row {row}, col {col}")]
    UnknownGlyph { row: usize, col: usize, glyph: char },

    #[error("warp row {row} is outside a grid of {rows} rows")]
    WarpRowOutOfRange { row: usize, rows: usize },

    #[error("warp row {row} must be open at both ends")]
    WarpEndpointBlocked { row: usize },

    #[error("no levels to play")]
    NoLevels,
}
