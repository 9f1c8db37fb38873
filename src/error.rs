//! Error types for the Klotski engine.

use thiserror::Error;

/// A board matrix or layout that cannot be used as search input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidBoard {
    /// The matrix would need more bits than a layout key holds.
    #[error("board needs {bits} bits but a layout key holds 64")]
    TooWide { bits: usize },

    /// The matrix is not 5 rows by 4 columns.
    #[error("board must be 5x4, got {rows} rows and a row of {cols} columns")]
    Dimensions { rows: usize, cols: usize },

    /// A cell holds a code that is not a piece kind.
    #[error("unknown piece code {code} at row {row}, column {col}")]
    UnknownPiece { row: usize, col: usize, code: u8 },

    /// A cell's group does not form its piece's footprint.
    #[error("malformed piece at row {row}, column {col}")]
    MalformedPiece { row: usize, col: usize },

    /// The board must hold exactly one 2x2 piece.
    #[error("board must hold exactly one 2x2 piece, found {0}")]
    BigPieceCount(usize),
}

/// Errors surfaced by the persistence layer and command-line front end.
#[derive(Debug, Error)]
pub enum KlotskiError {
    #[error(transparent)]
    InvalidBoard(#[from] InvalidBoard),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown layout `{0}`")]
    UnknownLayout(String),
}

/// Result type alias for fallible front-end operations.
pub type Result<T> = std::result::Result<T, KlotskiError>;
