//! The in-memory cell grid

use crate::cell::{Cell, CellRange};
use crate::error::{Error, Result};
use crate::MAX_COLS;

static EMPTY_CELL: Cell = Cell::Empty;

/// An ordered sequence of rows of cells.
///
/// Rows may be ragged: a cell missing from a short row reads as
/// [`Cell::Empty`]. Apart from [`Grid::insert_column`] the grid is never
/// mutated after it is loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    /// Create an empty grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a grid from rows of cells
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Create a grid of text cells
    pub fn from_strings<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|s| Cell::Text(s.into())).collect())
                .collect(),
        }
    }

    /// Append a row
    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// True when there are no rows or every cell is blank
    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(Cell::is_blank)
    }

    /// All rows
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// A single row, as stored (may be shorter than [`Grid::column_count`])
    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    /// The cell at (row, col); out-of-range positions read as empty
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Normalized, trimmed, non-empty values of a row, in column order.
    ///
    /// This is the view header detection works on; column positions are not
    /// preserved.
    pub fn row_values(&self, row: usize) -> Vec<String> {
        self.row(row)
            .unwrap_or_default()
            .iter()
            .map(|cell| cell.normalize().trim().to_string())
            .filter(|value| !value.is_empty())
            .collect()
    }

    /// Normalized, trimmed text of every column of a row, index-aligned with
    /// the grid (padded to [`Grid::column_count`]).
    pub fn header_strings(&self, row: usize) -> Vec<String> {
        (0..self.column_count())
            .map(|col| self.cell(row, col).normalize().trim().to_string())
            .collect()
    }

    /// Every row strictly after `header_row`
    pub fn body_rows(&self, header_row: usize) -> &[Vec<Cell>] {
        self.rows.get(header_row + 1..).unwrap_or_default()
    }

    /// Number of rows strictly after `header_row`
    pub fn body_row_count(&self, header_row: usize) -> usize {
        self.row_count().saturating_sub(header_row + 1)
    }

    /// Smallest range covering every non-blank cell
    pub fn used_range(&self) -> Option<CellRange> {
        let mut bounds: Option<(usize, usize, usize, usize)> = None;

        for (r, row) in self.rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if cell.is_blank() {
                    continue;
                }
                bounds = Some(match bounds {
                    None => (r, c, r, c),
                    Some((r0, c0, r1, c1)) => (r0.min(r), c0.min(c), r1.max(r), c1.max(c)),
                });
            }
        }

        bounds.map(|(r0, c0, r1, c1)| CellRange::from_indices(r0, c0, r1, c1))
    }

    /// Splice a column holding `value` in every row at index `at`.
    ///
    /// Rows shorter than `at` are padded with empty cells first, so the new
    /// column lands at the same index in every row. `at` may equal
    /// [`Grid::column_count`] to append.
    pub fn insert_column(&mut self, at: usize, value: Cell) -> Result<()> {
        let width = self.column_count();
        if at > width {
            return Err(Error::ColumnOutOfBounds(at, width));
        }
        if width >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(width, MAX_COLS));
        }

        for row in &mut self.rows {
            if row.len() < at {
                row.resize(at, Cell::Empty);
            }
            row.insert(at, value.clone());
        }

        Ok(())
    }
}

impl From<Vec<Vec<Cell>>> for Grid {
    fn from(rows: Vec<Vec<Cell>>) -> Self {
        Self::from_rows(rows)
    }
}
