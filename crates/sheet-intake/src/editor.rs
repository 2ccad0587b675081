//! Stateful mapping editor
//!
//! A [`MappingEditor`] owns the loaded grid, the active profile, the current
//! header row and the column mapping, and applies the user's edits one at a
//! time. Every transition keeps the mapping invariants; there is no terminal
//! state, so the editor can be submitted, edited and submitted again.

use serde::Serialize;
use sheet_intake_core::{Cell, Grid};

use crate::classify::{auto_map, unmapped_fields};
use crate::detect::{DetectionSource, HeaderDetection, HeaderDetector};
use crate::error::{Error, Result};
use crate::field::FieldName;
use crate::mapping::ColumnMapping;
use crate::preview::Preview;
use crate::profile::IntakeProfile;
use crate::submission::SubmissionPayload;
use crate::validate::{validate, validate_submission, MappingValidation};

/// A constant-valued column added by the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInsertion {
    /// Current index of the column
    pub at: usize,
    /// Field the column was created for
    pub field: FieldName,
    /// Value written into every row
    pub value: Cell,
}

/// Interactive column-mapping session over one grid
#[derive(Debug, Clone)]
pub struct MappingEditor {
    profile: IntakeProfile,
    grid: Grid,
    detection: Option<HeaderDetection>,
    mapping: ColumnMapping,
    insertions: Vec<ColumnInsertion>,
}

impl MappingEditor {
    /// Start a session: detect the header row and auto-map its columns.
    ///
    /// When detection finds nothing (manual fallback), the session starts
    /// with no header row and every field unmapped.
    pub fn new(grid: Grid, profile: IntakeProfile) -> Result<Self> {
        if grid.is_empty() {
            return Err(Error::EmptyGrid);
        }

        let detection = HeaderDetector::for_profile(&profile).detect(&grid);
        let mapping = match detection {
            Some(detection) => auto_map(&grid.header_strings(detection.row), &profile),
            None => ColumnMapping::for_profile(&profile),
        };

        let editor = Self {
            profile,
            grid,
            detection,
            mapping,
            insertions: Vec::new(),
        };

        match editor.detection {
            Some(detection) => tracing::info!(
                "Profile '{}': header row {} ({:?}), {} of {} fields mapped",
                editor.profile.name(),
                detection.row + 1,
                detection.source,
                editor.mapping.mapped_count(),
                editor.profile.fields().len()
            ),
            None => tracing::info!(
                "Profile '{}': no header row detected",
                editor.profile.name()
            ),
        }

        Ok(editor)
    }

    /// Active profile
    pub fn profile(&self) -> &IntakeProfile {
        &self.profile
    }

    /// The grid, including any synthetic columns
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Zero-based header row, if one is set
    pub fn header_row(&self) -> Option<usize> {
        self.detection.map(|d| d.row)
    }

    /// How the current header row was chosen
    pub fn detection(&self) -> Option<HeaderDetection> {
        self.detection
    }

    /// Current mapping
    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    /// Synthetic columns, in insertion order
    pub fn insertions(&self) -> &[ColumnInsertion] {
        &self.insertions
    }

    /// Header texts of the current header row (empty when unset)
    pub fn headers(&self) -> Vec<String> {
        self.header_row()
            .map(|row| self.grid.header_strings(row))
            .unwrap_or_default()
    }

    /// Rows strictly after the header row (empty when unset)
    pub fn body_rows(&self) -> &[Vec<Cell>] {
        match self.header_row() {
            Some(row) => self.grid.body_rows(row),
            None => &[],
        }
    }

    /// Profile fields still without a column
    pub fn unmapped_fields(&self) -> Vec<FieldName> {
        unmapped_fields(&self.mapping, &self.profile)
    }

    /// Point `column` at `field`, or clear it when `field` is `None`.
    ///
    /// The field loses its previous column, and whatever field held
    /// `column` before is unmapped.
    pub fn reassign(&mut self, column: usize, field: Option<&str>) -> Result<()> {
        self.check_column(column)?;

        let field = match field {
            Some(name) => Some(self.known_field(name)?),
            None => None,
        };

        match &field {
            Some(field) => tracing::debug!("Column {} reassigned to {}", column, field),
            None => tracing::debug!("Column {} cleared", column),
        }
        self.mapping.reassign(column, field);
        Ok(())
    }

    /// Unmap whatever field holds `column`, returning it
    pub fn clear(&mut self, column: usize) -> Result<Option<FieldName>> {
        self.check_column(column)?;
        Ok(self.mapping.clear_column(column))
    }

    /// Use `row` as the header row and re-run auto-mapping from scratch.
    ///
    /// Manual edits are discarded. Synthetic columns get their field back
    /// when auto-mapping left that field unmapped and their column free.
    pub fn change_header_row(&mut self, row: usize) -> Result<()> {
        let count = self.grid.row_count();
        if row >= count {
            return Err(Error::RowOutOfBounds { row, count });
        }

        self.detection = Some(HeaderDetection {
            row,
            source: DetectionSource::Manual,
        });
        self.mapping = auto_map(&self.grid.header_strings(row), &self.profile);

        for insertion in &self.insertions {
            self.mapping.ensure_field(insertion.field.clone());
            if self.mapping.get(insertion.field.as_str()).is_none()
                && self.mapping.field_at(insertion.at).is_none()
            {
                self.mapping
                    .reassign(insertion.at, Some(insertion.field.clone()));
            }
        }

        tracing::info!(
            "Header row changed to {}, {} fields mapped",
            row + 1,
            self.mapping.mapped_count()
        );
        Ok(())
    }

    /// Splice a column holding `value` in every row at `at` and map `field`
    /// to it. Every mapped column at or after `at` moves right by one.
    ///
    /// `field` must not already have a column. It may be a field outside
    /// the profile, such as `brand_manual`.
    pub fn insert_synthetic_column<V: Into<Cell>>(
        &mut self,
        at: usize,
        field: &str,
        value: V,
    ) -> Result<()> {
        let count = self.grid.column_count();
        if at > count {
            return Err(Error::ColumnOutOfBounds { column: at, count });
        }

        let field = FieldName::from(field);
        if let Some(column) = self.mapping.get(field.as_str()) {
            return Err(Error::FieldAlreadyMapped { field, column });
        }

        let value = value.into();
        self.grid.insert_column(at, value.clone())?;
        self.mapping.insert_column(at, field.clone())?;

        for insertion in &mut self.insertions {
            if insertion.at >= at {
                insertion.at += 1;
            }
        }

        tracing::info!(
            "Inserted synthetic column {} for {} ({:?})",
            at,
            field,
            value.normalize()
        );
        self.insertions.push(ColumnInsertion { at, field, value });
        Ok(())
    }

    /// Headers plus the profile's preview rows
    pub fn preview(&self) -> Result<Preview> {
        self.preview_with(self.profile.preview_rows())
    }

    /// Headers plus up to `max_rows` body rows
    pub fn preview_with(&self, max_rows: usize) -> Result<Preview> {
        let row = self.header_row().ok_or(Error::HeaderRowNotSet)?;
        Ok(Preview::build(&self.grid, row, &self.mapping, max_rows))
    }

    /// Check the required fields without touching any state
    pub fn validate(&self) -> MappingValidation {
        validate(&self.mapping, &self.profile.required_fields())
    }

    /// Run the submission gate and render the payload
    pub fn submit(&self) -> Result<SubmissionPayload> {
        let body_rows = self.body_rows().len();
        validate_submission(
            &self.mapping,
            &self.profile.required_fields(),
            self.header_row(),
            body_rows,
        )?;

        // validate_submission rejects a missing header row
        let header_row = self.header_row().ok_or(Error::HeaderRowNotSet)?;
        let payload =
            SubmissionPayload::build(&self.profile, &self.mapping, header_row, body_rows);

        tracing::info!(
            "Submitting {} rows with header row {}",
            payload.body_rows,
            payload.header_row
        );
        Ok(payload)
    }

    fn check_column(&self, column: usize) -> Result<()> {
        let count = self.grid.column_count();
        if column >= count {
            return Err(Error::ColumnOutOfBounds { column, count });
        }
        Ok(())
    }

    fn known_field(&self, name: &str) -> Result<FieldName> {
        if self.profile.contains(name) || self.mapping.contains_field(name) {
            Ok(FieldName::from(name))
        } else {
            Err(Error::UnknownField(name.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::ValidationError;
    use pretty_assertions::assert_eq;

    fn offer_grid() -> Grid {
        Grid::from_strings(vec![
            vec!["Spring order"],
            vec!["Style #", "Color", "Notes", "Category"],
            vec!["AB123", "Red", "", "Shoes"],
            vec!["AB124", "Blue", "rush", "Shoes"],
        ])
    }

    fn editor() -> MappingEditor {
        MappingEditor::new(offer_grid(), IntakeProfile::offer()).unwrap()
    }

    #[test]
    fn test_new_detects_and_maps() {
        let editor = editor();

        assert_eq!(editor.header_row(), Some(1));
        assert!(editor.detection().unwrap().is_confident());
        assert_eq!(editor.mapping().get("style"), Some(0));
        assert_eq!(editor.mapping().get("colorName"), Some(1));
        assert_eq!(editor.mapping().get("category"), Some(3));
        assert_eq!(editor.mapping().get("brand"), None);
        assert_eq!(editor.body_rows().len(), 2);
        assert!(editor.unmapped_fields().contains(&FieldName::from("brand")));
    }

    #[test]
    fn test_new_rejects_empty_grid() {
        let grid = Grid::from_strings(vec![vec!["", " "]]);
        assert!(matches!(
            MappingEditor::new(grid, IntakeProfile::offer()),
            Err(Error::EmptyGrid)
        ));
    }

    #[test]
    fn test_manual_fallback_leaves_header_unset() {
        let grid = Grid::from_strings(vec![vec!["a", "b"], vec!["c", "d"]]);
        let mut editor = MappingEditor::new(grid, IntakeProfile::offer()).unwrap();

        assert_eq!(editor.header_row(), None);
        assert!(editor.headers().is_empty());
        assert!(matches!(editor.preview(), Err(Error::HeaderRowNotSet)));
        assert!(matches!(
            editor.submit(),
            Err(Error::Validation(ValidationError::NoHeaderRow))
        ));

        editor.change_header_row(0).unwrap();
        assert_eq!(editor.header_row(), Some(0));
        assert_eq!(
            editor.detection().unwrap().source,
            DetectionSource::Manual
        );
    }

    #[test]
    fn test_reassign_and_clear() {
        let mut editor = editor();

        editor.reassign(2, Some("brand")).unwrap();
        assert_eq!(editor.mapping().get("brand"), Some(2));

        editor.reassign(0, Some("brand")).unwrap();
        assert_eq!(editor.mapping().get("brand"), Some(0));
        assert_eq!(editor.mapping().get("style"), None);
        assert_eq!(editor.mapping().field_at(2), None);

        assert_eq!(editor.clear(0).unwrap(), Some(FieldName::from("brand")));
        assert_eq!(editor.clear(0).unwrap(), None);
    }

    #[test]
    fn test_reassign_rejects_bad_input() {
        let mut editor = editor();
        assert!(matches!(
            editor.reassign(0, Some("msrp")),
            Err(Error::UnknownField(_))
        ));
        assert!(matches!(
            editor.reassign(4, Some("brand")),
            Err(Error::ColumnOutOfBounds { column: 4, count: 4 })
        ));
        assert!(matches!(
            editor.clear(9),
            Err(Error::ColumnOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_change_header_row_discards_edits() {
        let mut editor = editor();
        editor.reassign(2, Some("brand")).unwrap();

        editor.change_header_row(1).unwrap();
        assert_eq!(editor.mapping().get("brand"), None);
        assert_eq!(editor.mapping().get("style"), Some(0));

        assert!(matches!(
            editor.change_header_row(4),
            Err(Error::RowOutOfBounds { row: 4, count: 4 })
        ));
    }

    #[test]
    fn test_insert_synthetic_column() {
        let mut editor = editor();
        editor.insert_synthetic_column(1, "brand", "Acme").unwrap();

        assert_eq!(editor.mapping().get("style"), Some(0));
        assert_eq!(editor.mapping().get("brand"), Some(1));
        assert_eq!(editor.mapping().get("colorName"), Some(2));
        assert_eq!(editor.mapping().get("category"), Some(4));
        assert_eq!(editor.grid().column_count(), 5);
        for row in 0..editor.grid().row_count() {
            assert_eq!(editor.grid().cell(row, 1).normalize(), "Acme");
        }
        assert_eq!(editor.insertions().len(), 1);
    }

    #[test]
    fn test_insert_rejects_mapped_field() {
        let mut editor = editor();
        let err = editor
            .insert_synthetic_column(0, "style", "x")
            .unwrap_err();
        assert!(matches!(err, Error::FieldAlreadyMapped { column: 0, .. }));
        assert_eq!(editor.grid().column_count(), 4);

        assert!(matches!(
            editor.insert_synthetic_column(5, "brand", "x"),
            Err(Error::ColumnOutOfBounds { column: 5, count: 4 })
        ));
    }

    #[test]
    fn test_insertions_shift_and_rebind() {
        let mut editor = editor();
        editor.insert_synthetic_column(2, "brand", "Acme").unwrap();
        editor
            .insert_synthetic_column(0, "brand_manual", "Acme Co")
            .unwrap();

        assert_eq!(editor.insertions()[0].at, 3);
        assert_eq!(editor.insertions()[1].at, 0);
        assert_eq!(editor.mapping().get("brand"), Some(3));

        // the new header row does not name a brand, so the synthetic
        // columns keep their fields
        editor.change_header_row(1).unwrap();
        assert_eq!(editor.mapping().get("brand"), Some(3));
        assert_eq!(editor.mapping().get("brand_manual"), Some(0));
        assert_eq!(editor.mapping().get("style"), Some(1));
    }

    #[test]
    fn test_submit() {
        let mut editor = editor();
        assert!(matches!(
            editor.submit(),
            Err(Error::Validation(ValidationError::MissingRequiredFields(_)))
        ));
        assert_eq!(editor.validate().missing(), &[FieldName::from("brand")]);

        editor.insert_synthetic_column(1, "brand", "Acme").unwrap();
        assert!(editor.validate().is_ok());

        let payload = editor.submit().unwrap();
        assert_eq!(payload.header_row, 2);
        assert_eq!(payload.body_rows, 2);
        assert_eq!(payload.letters("style"), Some("A"));
        assert_eq!(payload.letters("brand"), Some("B"));
        assert_eq!(payload.letters("category"), Some("E"));
    }

    #[test]
    fn test_submit_needs_body_rows() {
        let grid = Grid::from_strings(vec![vec!["Style", "Brand"]]);
        let editor = MappingEditor::new(grid, IntakeProfile::offer()).unwrap();

        assert_eq!(editor.header_row(), Some(0));
        assert!(editor.validate().is_ok());
        assert!(matches!(
            editor.submit(),
            Err(Error::Validation(ValidationError::NoBodyRows { header_row: 0 }))
        ));
    }

    #[test]
    fn test_preview() {
        let preview = editor().preview().unwrap();
        assert_eq!(preview.header_row, 2);
        assert_eq!(preview.headers(), vec!["Style #", "Color", "Notes", "Category"]);
        assert_eq!(preview.rows.len(), 2);

        let short = editor().preview_with(1).unwrap();
        assert_eq!(short.rows.len(), 1);
        assert_eq!(short.total_rows, 2);
    }
}
