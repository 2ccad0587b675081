//! # sheet-intake
//!
//! Turns an uploaded spreadsheet into a validated column mapping.
//!
//! Given a [`Grid`] of raw cells and an [`IntakeProfile`] describing one
//! upload workflow, the engine:
//!
//! - finds the header row ([`HeaderDetector`])
//! - classifies header cells into canonical fields ([`auto_map`])
//! - lets the user correct the result ([`MappingEditor`])
//! - checks the required fields ([`validate`]) and renders the mapping as
//!   spreadsheet column letters ([`SubmissionPayload`])
//!
//! ## Example
//!
//! ```rust
//! use sheet_intake::prelude::*;
//!
//! let grid = Grid::from_strings(vec![
//!     vec!["Spring order"],
//!     vec!["Style #", "Colour", "Category"],
//!     vec!["AB123", "Red", "Shoes"],
//! ]);
//!
//! let mut editor = MappingEditor::new(grid, IntakeProfile::offer()).unwrap();
//! assert_eq!(editor.header_row(), Some(1));
//!
//! // no brand column in the file: add one holding a constant
//! editor.insert_synthetic_column(1, "brand", "Acme").unwrap();
//!
//! let payload = editor.submit().unwrap();
//! assert_eq!(payload.header_row, 2);
//! assert_eq!(payload.letters("brand"), Some("B"));
//! ```

pub mod classify;
pub mod config;
pub mod detect;
pub mod editor;
pub mod error;
pub mod field;
pub mod load;
pub mod mapping;
pub mod prelude;
pub mod preview;
pub mod profile;
pub mod submission;
pub mod validate;

pub use classify::{auto_map, normalize_header, unmapped_fields};
pub use config::{FieldConfig, ProfileConfig};
pub use detect::{
    detect_header_row, DetectionSource, HeaderDetection, HeaderDetector, MIN_HEADER_VALUES,
};
pub use editor::{ColumnInsertion, MappingEditor};
pub use error::{Error, Result};
pub use field::FieldName;
pub use load::GridExt;
pub use mapping::ColumnMapping;
pub use preview::{Preview, PreviewColumn};
pub use profile::{
    FieldSpec, HeaderFallback, IntakeProfile, IntakeProfileBuilder, DEFAULT_MAX_SCAN_ROWS,
    DEFAULT_PREVIEW_ROWS, OFFER_PRIORITY, WAREHOUSE_PRIORITY,
};
pub use submission::{SubmissionPayload, SubmittedColumn, HEADER_INDEX_KEY};
pub use validate::{validate, validate_submission, MappingValidation, ValidationError};

// Re-export core types
pub use sheet_intake_core::{column_to_letters, letters_to_column, Cell, Grid, LinkedCell};

// Re-export I/O types
pub use sheet_intake_csv::{CsvError, CsvReadOptions, CsvReader};
