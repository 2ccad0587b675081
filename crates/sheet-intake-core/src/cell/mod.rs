//! Cell-related types and utilities
//!
//! This module contains:
//! - [`Cell`] - A raw cell value and its canonical display text
//! - [`LinkedCell`] - Rich cell objects (error / formula result / text / hyperlink)
//! - [`CellAddress`] and [`CellRange`] - A1-style coordinates
//! - [`column_to_letters`] / [`letters_to_column`] - The column coordinate codec

mod address;
mod value;

pub use address::{column_to_letters, letters_to_column, CellAddress, CellRange};
pub use value::{format_number, Cell, LinkedCell, DISPLAY_DATETIME_FORMAT};
