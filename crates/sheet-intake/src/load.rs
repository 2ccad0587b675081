//! Opening spreadsheet files by extension

use sheet_intake_core::Grid;
use sheet_intake_csv::{CsvReadOptions, CsvReader};
use std::path::Path;

use crate::error::{Error, Result};

/// Extension trait for Grid to add file loading
pub trait GridExt {
    /// Open a grid from a file, picking the loader from its extension
    fn open<P: AsRef<Path>>(path: P) -> Result<Grid>;
}

impl GridExt for Grid {
    fn open<P: AsRef<Path>>(path: P) -> Result<Grid> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("csv") | Some("txt") => Ok(CsvReader::read_file(path, &CsvReadOptions::default())?),
            Some("tsv") | Some("tab") => Ok(CsvReader::read_file(path, &CsvReadOptions::tsv())?),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let csv = dir.path().join("offer.CSV");
        std::fs::write(&csv, "Style,Brand\nAB1,Acme\n").unwrap();
        assert_eq!(Grid::open(&csv).unwrap().row_values(0), vec!["Style", "Brand"]);

        let tsv = dir.path().join("offer.tsv");
        std::fs::write(&tsv, "Style\tBrand\nAB1\tAcme\n").unwrap();
        assert_eq!(Grid::open(&tsv).unwrap().column_count(), 2);

        assert!(matches!(
            Grid::open(dir.path().join("offer.xlsx")),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(matches!(
            Grid::open(dir.path().join("missing.csv")),
            Err(Error::Csv(_))
        ));
    }
}
