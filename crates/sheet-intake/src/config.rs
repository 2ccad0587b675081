//! Custom profiles loaded from JSON
//!
//! ```json
//! {
//!   "name": "returns",
//!   "fields": [
//!     { "name": "style", "pattern": "style|sku", "required": true, "form_key": "searchColumn" },
//!     { "name": "reason", "pattern": "reason|return\\s*reason", "required": true },
//!     { "name": "qty", "pattern": "qty|quantity" }
//!   ],
//!   "header_fallback": "first_row"
//! }
//! ```
//!
//! Field order in the file is classification priority.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::profile::{
    FieldSpec, HeaderFallback, IntakeProfile, DEFAULT_MAX_SCAN_ROWS, DEFAULT_PREVIEW_ROWS,
};

/// One field entry of a [`ProfileConfig`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    /// Whole-header pattern, matched case-insensitively
    pub pattern: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_key: Option<String>,
}

/// Serialized form of an [`IntakeProfile`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub name: String,
    pub fields: Vec<FieldConfig>,
    /// Field used for header detection (default: first required field)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(default = "default_max_scan_rows")]
    pub max_scan_rows: usize,
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
    #[serde(default)]
    pub header_fallback: HeaderFallback,
}

fn default_max_scan_rows() -> usize {
    DEFAULT_MAX_SCAN_ROWS
}

fn default_preview_rows() -> usize {
    DEFAULT_PREVIEW_ROWS
}

impl ProfileConfig {
    /// Compile patterns and validate into a profile
    pub fn into_profile(self) -> Result<IntakeProfile> {
        let mut builder = IntakeProfile::builder(self.name)
            .max_scan_rows(self.max_scan_rows)
            .preview_rows(self.preview_rows)
            .header_fallback(self.header_fallback);

        for field in self.fields {
            let spec = if field.required {
                FieldSpec::required(field.name, &field.pattern)?
            } else {
                FieldSpec::optional(field.name, &field.pattern)?
            };
            builder = builder.field(match field.form_key {
                Some(key) => spec.with_form_key(key),
                None => spec,
            });
        }

        if let Some(primary) = self.primary {
            builder = builder.primary(primary);
        }

        builder.build()
    }
}

impl IntakeProfile {
    /// Parse a profile from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ProfileConfig = serde_json::from_str(json)?;
        config.into_profile()
    }

    /// Read a profile from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading profile from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::field::FieldName;
    use pretty_assertions::assert_eq;

    const RETURNS: &str = r#"{
        "name": "returns",
        "fields": [
            { "name": "style", "pattern": "style|sku", "required": true, "form_key": "searchColumn" },
            { "name": "reason", "pattern": "reason|return\\s*reason", "required": true },
            { "name": "qty", "pattern": "qty|quantity" }
        ],
        "header_fallback": "first_row"
    }"#;

    #[test]
    fn test_from_json_str() {
        let profile = IntakeProfile::from_json_str(RETURNS).unwrap();

        assert_eq!(profile.name(), "returns");
        assert_eq!(profile.priority(), vec!["style", "reason", "qty"]);
        assert_eq!(
            profile.required_fields(),
            vec![FieldName::from("style"), FieldName::from("reason")]
        );
        assert_eq!(profile.header_fallback(), HeaderFallback::FirstRow);
        assert_eq!(profile.max_scan_rows(), DEFAULT_MAX_SCAN_ROWS);
        assert_eq!(profile.form_key_for(&FieldName::from("style")), "searchColumn");
        assert_eq!(profile.form_key_for(&FieldName::from("qty")), "qtyColumn");
        assert!(profile.field("reason").unwrap().matches("Return Reason"));
    }

    #[test]
    fn test_config_errors() {
        assert!(matches!(
            IntakeProfile::from_json_str("{"),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            IntakeProfile::from_json_str(
                r#"{"name":"x","fields":[{"name":"a","pattern":"(","required":true}]}"#
            ),
            Err(Error::Regex(_))
        ));
        assert!(matches!(
            IntakeProfile::from_json_str(r#"{"name":"x","fields":[{"name":"a","pattern":"a"}]}"#),
            Err(Error::InvalidProfile(_))
        ));
        assert!(matches!(
            IntakeProfile::from_json_str(
                r#"{"name":"x","primary":"b","fields":[{"name":"a","pattern":"a","required":true}]}"#
            ),
            Err(Error::UnknownField(_))
        ));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("returns.json");
        std::fs::write(&path, RETURNS).unwrap();

        let profile = IntakeProfile::from_json_file(&path).unwrap();
        assert_eq!(profile.name(), "returns");

        let missing = IntakeProfile::from_json_file(dir.path().join("nope.json"));
        assert!(matches!(missing, Err(Error::Io(_))));
    }
}
