//! Field → column assignments
//!
//! A [`ColumnMapping`] always satisfies two invariants, enforced by every
//! mutating method rather than checked after the fact:
//!
//! - a field points at no more than one column;
//! - a column is pointed at by no more than one field.

use serde::Serialize;
use sheet_intake_core::column_to_letters;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::field::FieldName;
use crate::profile::IntakeProfile;

/// Assignment of canonical fields to zero-based column indices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    fields: BTreeMap<FieldName, Option<usize>>,
}

impl ColumnMapping {
    /// Create an empty mapping with no known fields
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mapping where every given field is unmapped
    pub fn with_fields<I, F>(fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FieldName>,
    {
        Self {
            fields: fields.into_iter().map(|f| (f.into(), None)).collect(),
        }
    }

    /// Create a mapping with every field of `profile` unmapped
    pub fn for_profile(profile: &IntakeProfile) -> Self {
        Self::with_fields(profile.fields().iter().map(|f| f.name().clone()))
    }

    /// Column assigned to `field`, if any
    pub fn get(&self, field: &str) -> Option<usize> {
        self.fields.get(field).copied().flatten()
    }

    /// Whether `field` is known to this mapping (mapped or not)
    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Field assigned to `column`, if any
    pub fn field_at(&self, column: usize) -> Option<&FieldName> {
        self.fields
            .iter()
            .find(|(_, col)| **col == Some(column))
            .map(|(field, _)| field)
    }

    /// Known fields, in name order
    pub fn fields(&self) -> impl Iterator<Item = &FieldName> {
        self.fields.keys()
    }

    /// Every known field with its column, in name order
    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, Option<usize>)> {
        self.fields.iter().map(|(field, col)| (field, *col))
    }

    /// Only the mapped fields, in name order
    pub fn mapped(&self) -> impl Iterator<Item = (&FieldName, usize)> {
        self.fields
            .iter()
            .filter_map(|(field, col)| col.map(|c| (field, c)))
    }

    /// Number of mapped fields
    pub fn mapped_count(&self) -> usize {
        self.mapped().count()
    }

    /// Make `field` known without mapping it
    pub fn ensure_field<F: Into<FieldName>>(&mut self, field: F) {
        self.fields.entry(field.into()).or_insert(None);
    }

    /// Point `field` at `column`, or just free `column` when `field` is `None`.
    ///
    /// Whatever field held `column` before is cleared first, then `field`'s
    /// previous column (if any) is released. Unknown fields become known.
    pub fn reassign(&mut self, column: usize, field: Option<FieldName>) {
        self.clear_column(column);

        if let Some(field) = field {
            self.fields.insert(field, Some(column));
        }
    }

    /// Free `column`, returning the field that held it
    pub fn clear_column(&mut self, column: usize) -> Option<FieldName> {
        let field = self.field_at(column).cloned()?;
        self.fields.insert(field.clone(), None);
        Some(field)
    }

    /// Unmap `field`, returning the column it held
    pub fn clear_field(&mut self, field: &str) -> Option<usize> {
        self.fields.get_mut(field).and_then(Option::take)
    }

    /// Record a column spliced in at `at`: every mapped column at or after
    /// `at` moves right by one, then `field` takes `at`.
    ///
    /// Fails if `field` already has a column.
    pub fn insert_column<F: Into<FieldName>>(&mut self, at: usize, field: F) -> Result<()> {
        let field = field.into();
        if let Some(column) = self.get(field.as_str()) {
            return Err(Error::FieldAlreadyMapped { field, column });
        }

        for col in self.fields.values_mut().flatten() {
            if *col >= at {
                *col += 1;
            }
        }
        self.fields.insert(field, Some(at));
        Ok(())
    }

    /// Whether no two fields share a column
    pub fn is_consistent(&self) -> bool {
        let mut seen: Vec<usize> = self.mapped().map(|(_, col)| col).collect();
        let total = seen.len();
        seen.sort_unstable();
        seen.dedup();
        seen.len() == total
    }

    /// Mapped fields rendered as spreadsheet column letters
    pub fn to_letters(&self) -> BTreeMap<FieldName, String> {
        self.mapped()
            .map(|(field, col)| (field.clone(), column_to_letters(col)))
            .collect()
    }
}

impl<F: Into<FieldName>> FromIterator<(F, Option<usize>)> for ColumnMapping {
    /// Later pairs win over earlier ones that claim the same column
    fn from_iter<I: IntoIterator<Item = (F, Option<usize>)>>(iter: I) -> Self {
        let mut mapping = ColumnMapping::new();
        for (field, column) in iter {
            let field = field.into();
            match column {
                Some(col) => mapping.reassign(col, Some(field)),
                None => {
                    mapping.fields.insert(field, None);
                }
            }
        }
        mapping
    }
}
