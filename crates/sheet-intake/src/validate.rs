//! Pre-submission checks

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::field::FieldName;
use crate::mapping::ColumnMapping;

/// Outcome of checking a mapping against the required fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MappingValidation {
    /// Every required field has a column
    Ok,
    /// These required fields have no column, in the order they were required
    Missing { missing: Vec<FieldName> },
}

impl MappingValidation {
    /// Whether every required field is mapped
    pub fn is_ok(&self) -> bool {
        matches!(self, MappingValidation::Ok)
    }

    /// Required fields without a column (empty when ok)
    pub fn missing(&self) -> &[FieldName] {
        match self {
            MappingValidation::Ok => &[],
            MappingValidation::Missing { missing } => missing,
        }
    }
}

/// Collect required fields that have no column
///
/// ```
/// use sheet_intake::{validate, ColumnMapping, FieldName};
///
/// let mapping: ColumnMapping = [("style", Some(0)), ("brand", None)].into_iter().collect();
/// let required = [FieldName::from("style"), FieldName::from("brand")];
///
/// assert_eq!(validate(&mapping, &required).missing(), &[FieldName::from("brand")]);
/// ```
pub fn validate(mapping: &ColumnMapping, required: &[FieldName]) -> MappingValidation {
    let missing: Vec<FieldName> = required
        .iter()
        .filter(|field| mapping.get(field.as_str()).is_none())
        .cloned()
        .collect();

    if missing.is_empty() {
        MappingValidation::Ok
    } else {
        MappingValidation::Missing { missing }
    }
}

/// Why a mapping cannot be submitted yet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No header row has been detected or chosen
    #[error("No header row selected")]
    NoHeaderRow,

    /// Nothing follows the header row
    #[error("No data rows after header row {}", .header_row + 1)]
    NoBodyRows { header_row: usize },

    /// Required fields without a column
    #[error("Missing required fields: {}", FieldList(.0))]
    MissingRequiredFields(Vec<FieldName>),
}

struct FieldList<'a>(&'a [FieldName]);

impl fmt::Display for FieldList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", field)?;
        }
        Ok(())
    }
}

/// The gate run right before handing a mapping to the submitter.
///
/// Checks, in order: a header row is set, at least one row follows it, and
/// every required field is mapped.
pub fn validate_submission(
    mapping: &ColumnMapping,
    required: &[FieldName],
    header_row: Option<usize>,
    body_rows: usize,
) -> Result<(), ValidationError> {
    let header_row = header_row.ok_or(ValidationError::NoHeaderRow)?;

    if body_rows == 0 {
        return Err(ValidationError::NoBodyRows { header_row });
    }

    match validate(mapping, required) {
        MappingValidation::Ok => Ok(()),
        MappingValidation::Missing { missing } => {
            Err(ValidationError::MissingRequiredFields(missing))
        }
    }
}
