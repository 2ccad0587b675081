//! # sheet-intake-core
//!
//! Core data structures for the sheet-intake ingestion engine.
//!
//! This crate provides the fundamental types used throughout sheet-intake:
//! - [`Cell`] and [`LinkedCell`] - Raw cell values as handed over by a spreadsheet parser
//! - [`column_to_letters`] / [`letters_to_column`] - Spreadsheet column coordinates
//! - [`CellAddress`] and [`CellRange`] - A1-style addressing
//! - [`Grid`] - The in-memory 2-D cell grid a header row is searched in
//!
//! ## Example
//!
//! ```rust
//! use sheet_intake_core::{Cell, Grid};
//!
//! let grid = Grid::from_rows(vec![
//!     vec![Cell::from("Style #"), Cell::from("Brand")],
//!     vec![Cell::from("AB123"), Cell::from("Acme")],
//! ]);
//!
//! assert_eq!(grid.row_values(0), vec!["Style #", "Brand"]);
//! assert_eq!(grid.cell(1, 1).to_string(), "Acme");
//! ```

pub mod cell;
pub mod error;
pub mod grid;

// Re-exports for convenience
pub use cell::{column_to_letters, letters_to_column, Cell, CellAddress, CellRange, LinkedCell};
pub use error::{Error, Result};
pub use grid::Grid;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: usize = 16_384;
