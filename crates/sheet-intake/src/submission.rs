//! Submission payload handed to the batch upload endpoint

use serde::Serialize;
use sheet_intake_core::column_to_letters;

use crate::field::FieldName;
use crate::mapping::ColumnMapping;
use crate::profile::IntakeProfile;

/// Form field carrying the one-based header row number
pub const HEADER_INDEX_KEY: &str = "headerIndex";

/// A mapped field as the endpoint sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmittedColumn {
    /// Canonical field
    pub field: FieldName,
    /// Spreadsheet column letters
    pub letters: String,
    /// Form field name carrying the letters
    pub form_key: String,
}

/// Finalized mapping in spreadsheet coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionPayload {
    /// Profile the mapping was made for
    pub profile: String,
    /// One-based header row number
    pub header_row: usize,
    /// Rows after the header
    pub body_rows: usize,
    /// Mapped fields, in the profile's priority order, synthetic fields last
    pub columns: Vec<SubmittedColumn>,
}

impl SubmissionPayload {
    /// Render a validated mapping. `header_row` is zero-based.
    pub fn build(
        profile: &IntakeProfile,
        mapping: &ColumnMapping,
        header_row: usize,
        body_rows: usize,
    ) -> Self {
        let in_profile = profile
            .fields()
            .iter()
            .filter_map(|spec| mapping.get(spec.name().as_str()).map(|col| (spec.name(), col)));
        let synthetic = mapping
            .mapped()
            .filter(|(field, _)| !profile.contains(field.as_str()));

        let columns = in_profile
            .chain(synthetic)
            .map(|(field, col)| SubmittedColumn {
                field: field.clone(),
                letters: column_to_letters(col),
                form_key: profile.form_key_for(field),
            })
            .collect();

        Self {
            profile: profile.name().to_string(),
            header_row: header_row + 1,
            body_rows,
            columns,
        }
    }

    /// Letters for `field`, if mapped
    pub fn letters(&self, field: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.field == *field)
            .map(|c| c.letters.as_str())
    }

    /// Key/value pairs for a multipart form: the header index first, then
    /// one entry per mapped field
    pub fn form_fields(&self) -> Vec<(String, String)> {
        std::iter::once((HEADER_INDEX_KEY.to_string(), self.header_row.to_string()))
            .chain(
                self.columns
                    .iter()
                    .map(|c| (c.form_key.clone(), c.letters.clone())),
            )
            .collect()
    }
}
