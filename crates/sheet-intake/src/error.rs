//! Error types for the ingestion engine

use thiserror::Error;

use crate::field::FieldName;
use crate::validate::ValidationError;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building profiles or editing a mapping
#[derive(Debug, Error)]
pub enum Error {
    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] sheet_intake_core::Error),

    /// Field pattern failed to compile
    #[error("Invalid field pattern: {0}")]
    Regex(#[from] regex::Error),

    /// Profile configuration could not be parsed
    #[error("Invalid profile configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// Spreadsheet file could not be loaded
    #[error("CSV error: {0}")]
    Csv(#[from] sheet_intake_csv::CsvError),

    /// No loader for this file extension
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The loaded grid has no non-blank cells
    #[error("Spreadsheet contains no data")]
    EmptyGrid,

    /// Field is not part of the active profile
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// A synthetic column was requested for a field that already has a column
    #[error("Field '{field}' is already mapped to column {column}")]
    FieldAlreadyMapped { field: FieldName, column: usize },

    /// Column index out of bounds
    #[error("Column index {column} out of bounds (count: {count})")]
    ColumnOutOfBounds { column: usize, count: usize },

    /// Row index out of bounds
    #[error("Row index {row} out of bounds (count: {count})")]
    RowOutOfBounds { row: usize, count: usize },

    /// An operation needs a confirmed header row
    #[error("No header row has been selected")]
    HeaderRowNotSet,

    /// Profile definition is inconsistent
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    /// Mapping failed the submission gate
    #[error("{0}")]
    Validation(#[from] ValidationError),
}
