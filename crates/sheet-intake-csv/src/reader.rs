//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use lazy_regex::regex_is_match;
use sheet_intake_core::{Cell, Grid};

use crate::error::CsvResult;
use crate::options::CsvReadOptions;

/// Longest digit run an `f64` holds exactly
const MAX_SIGNIFICANT_DIGITS: usize = 15;

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a grid
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Grid> {
        let path = path.as_ref();
        tracing::debug!("Reading CSV from {}", path.display());
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read CSV from a reader into a grid.
    ///
    /// Records may have differing lengths; the grid keeps them ragged.
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Grid> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .trim(if options.trim {
                csv::Trim::All
            } else {
                csv::Trim::None
            })
            .from_reader(reader);

        let mut grid = Grid::new();

        for result in csv_reader.records() {
            let record = result?;

            let row = record
                .iter()
                .map(|field| {
                    if options.auto_detect_types {
                        Self::detect_type(field)
                    } else if field.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::text(field)
                    }
                })
                .collect();

            grid.push_row(row);
        }

        tracing::debug!(
            "Loaded {} rows x {} columns",
            grid.row_count(),
            grid.column_count()
        );
        Ok(grid)
    }

    /// Detect the type of a field value
    fn detect_type(field: &str) -> Cell {
        let trimmed = field.trim();

        if trimmed.is_empty() {
            return Cell::Empty;
        }

        if trimmed.eq_ignore_ascii_case("true") {
            return Cell::Boolean(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Cell::Boolean(false);
        }

        // Codes like "00123" are identifiers, not numbers
        if Self::has_leading_zero(trimmed) {
            return Cell::text(field);
        }

        if Self::is_plain_number(trimmed) {
            if let Ok(n) = trimmed.parse::<f64>() {
                return Cell::Number(n);
            }
        }

        for format in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Cell::DateTime(dt);
            }
        }
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Cell::from(d);
        }

        Cell::text(field)
    }

    /// Plain decimal notation with no more digits than survive an `f64`.
    /// Exponent forms (`12E4`) and long digit runs stay text.
    fn is_plain_number(field: &str) -> bool {
        if !regex_is_match!(r"^-?\d+(?:\.\d+)?$", field) {
            return false;
        }
        let significant = field
            .chars()
            .filter(char::is_ascii_digit)
            .skip_while(|&c| c == '0')
            .count();
        significant <= MAX_SIGNIFICANT_DIGITS
    }

    fn has_leading_zero(field: &str) -> bool {
        let mut chars = field.chars();
        chars.next() == Some('0') && chars.next().map_or(false, |c| c.is_ascii_digit())
    }
}
