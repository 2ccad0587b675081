//! # sheet-intake-csv
//!
//! Loads delimited text files into a [`Grid`](sheet_intake_core::Grid).
//!
//! No header handling happens here: every record, including whatever row
//! turns out to hold column names, becomes a grid row.

mod error;
mod options;
mod reader;

pub use error::{CsvError, CsvResult};
pub use options::CsvReadOptions;
pub use reader::CsvReader;
