//! Prelude module - common imports for sheet-intake users
//!
//! ```rust
//! use sheet_intake::prelude::*;
//! ```

pub use crate::{
    // Cell types
    Cell,
    ColumnMapping,
    CsvReadOptions,
    CsvReader,

    // Error types
    Error,
    FieldName,
    FieldSpec,
    Grid,
    // Extension traits
    GridExt,
    HeaderFallback,
    IntakeProfile,
    LinkedCell,
    MappingEditor,
    MappingValidation,
    Result,
    SubmissionPayload,
    ValidationError,
};
