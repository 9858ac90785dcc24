//! Error types for the engine
//!
//! Every fallible operation reports one of these variants before it mutates
//! anything, so a failed call leaves the position exactly as it was.

use thiserror::Error;

use crate::square::Square;

/// Errors that can occur while building, moving or searching a position.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Square name outside A-H / 1-8
    #[error("Invalid location {0}")]
    InvalidLocation(String),

    /// Move requested from a square holding no piece
    #[error("There is no piece at {0}")]
    EmptyOriginSquare(Square),

    /// Search depth outside the supported levels
    #[error("Invalid level {0}. You can choose 0, 1, 2 or 3")]
    UnsupportedSearchLevel(i64),

    /// Move that is not in the legal-move index of the side to move
    #[error("Illegal move from {from} to {to}")]
    IllegalMove { from: Square, to: Square },

    /// Descriptor or placement that breaks a board invariant
    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    /// Deadline or stop flag tripped during a search
    #[error("Search cancelled")]
    SearchCancelled,
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
