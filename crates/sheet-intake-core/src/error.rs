//! Error types for sheet-intake-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sheet-intake-core
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid column letters (empty, non-alphabetic, or too long to index)
    #[error("Invalid column letters: {0}")]
    InvalidColumnLetters(String),

    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Column index out of bounds
    #[error("Column index {0} out of bounds (count: {1})")]
    ColumnOutOfBounds(usize, usize),
}
