//! Read-only preview of the header and first body rows

use serde::Serialize;
use sheet_intake_core::{column_to_letters, Grid};

use crate::field::FieldName;
use crate::mapping::ColumnMapping;

/// One column of a preview
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewColumn {
    /// Zero-based column index
    pub index: usize,
    /// Spreadsheet column letters
    pub letters: String,
    /// Header text (trimmed)
    pub header: String,
    /// Field currently mapped to this column
    pub field: Option<FieldName>,
}

/// Headers plus the first few body rows, rendered as display strings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    /// One-based header row number
    pub header_row: usize,
    /// Columns, index-aligned
    pub columns: Vec<PreviewColumn>,
    /// Body rows, each padded to the column count
    pub rows: Vec<Vec<String>>,
    /// Total rows after the header (the preview may show fewer)
    pub total_rows: usize,
}

impl Preview {
    /// Project `grid` around `header_row`, showing up to `max_rows` body rows
    pub fn build(grid: &Grid, header_row: usize, mapping: &ColumnMapping, max_rows: usize) -> Self {
        let columns = grid
            .header_strings(header_row)
            .into_iter()
            .enumerate()
            .map(|(index, header)| PreviewColumn {
                index,
                letters: column_to_letters(index),
                header,
                field: mapping.field_at(index).cloned(),
            })
            .collect::<Vec<_>>();

        let rows = (header_row + 1..grid.row_count())
            .take(max_rows)
            .map(|row| {
                (0..columns.len())
                    .map(|col| grid.cell(row, col).normalize())
                    .collect()
            })
            .collect();

        Self {
            header_row: header_row + 1,
            columns,
            rows,
            total_rows: grid.body_row_count(header_row),
        }
    }

    /// Header texts only
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_preview_build() {
        let grid = Grid::from_strings(vec![
            vec!["Order sheet"],
            vec!["Style", "Brand", "Notes"],
            vec!["A1", "Acme"],
            vec!["A2", "Acme", "rush"],
            vec!["A3", "Acme", ""],
        ]);
        let mapping: ColumnMapping = [("style", Some(0)), ("brand", Some(1))].into_iter().collect();

        let preview = Preview::build(&grid, 1, &mapping, 2);

        assert_eq!(preview.header_row, 2);
        assert_eq!(preview.headers(), vec!["Style", "Brand", "Notes"]);
        assert_eq!(preview.columns[1].letters, "B");
        assert_eq!(preview.columns[1].field, Some(FieldName::from("brand")));
        assert_eq!(preview.columns[2].field, None);
        assert_eq!(
            preview.rows,
            vec![vec!["A1", "Acme", ""], vec!["A2", "Acme", "rush"]]
        );
        assert_eq!(preview.total_rows, 3);
    }

    #[test]
    fn test_preview_header_on_last_row() {
        let grid = Grid::from_strings(vec![vec!["Style", "Brand"]]);
        let preview = Preview::build(&grid, 0, &ColumnMapping::new(), 10);
        assert!(preview.rows.is_empty());
        assert_eq!(preview.total_rows, 0);
    }
}
