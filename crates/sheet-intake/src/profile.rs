//! Workflow profiles: the closed field set, header patterns and policies
//!
//! A profile fixes everything the engine needs to know about one upload
//! workflow: which fields exist, which of them are required, the pattern
//! each field's header must match, the order fields are tried in when a
//! header could match several, and how header detection falls back when no
//! row matches the primary field.
//!
//! ## Example
//!
//! ```rust
//! use sheet_intake::{FieldSpec, HeaderFallback, IntakeProfile};
//!
//! let profile = IntakeProfile::builder("returns")
//!     .field(FieldSpec::required("style", r"style|sku").unwrap())
//!     .field(FieldSpec::required("reason", r"reason|return\s*reason").unwrap())
//!     .field(FieldSpec::optional("qty", r"qty|quantity").unwrap().with_form_key("qtyColumn"))
//!     .header_fallback(HeaderFallback::FirstRow)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(profile.primary().name().as_str(), "style");
//! assert!(profile.field("qty").unwrap().matches("Quantity"));
//! ```

use lazy_regex::regex;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::field::FieldName;

/// Default number of leading rows searched for a header
pub const DEFAULT_MAX_SCAN_ROWS: usize = 50;

/// Default number of body rows in a preview
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// Classification priority of the offer workflow
pub const OFFER_PRIORITY: [&str; 6] = [
    "style",
    "brand",
    "category",
    "colorName",
    "imageAdd",
    "readImage",
];

/// Classification priority of the warehouse workflow
pub const WAREHOUSE_PRIORITY: [&str; 5] = ["style", "msrp", "brand", "category", "colorName"];

/// What header detection does when no scanned row matches the primary field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderFallback {
    /// Report no header; the caller asks the user to pick one
    Manual,
    /// Pick the scanned row with the most non-empty values (earliest on ties)
    #[default]
    DensestRow,
    /// Pick the first row
    FirstRow,
}

/// One canonical field of a profile
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: FieldName,
    required: bool,
    pattern: Regex,
    form_key: String,
}

impl FieldSpec {
    /// A required field whose header matches `pattern`.
    ///
    /// The pattern is matched case-insensitively against the whole header
    /// (surrounding whitespace ignored), so `sku|item\s*#` rejects `skunk`.
    pub fn required<N: Into<FieldName>>(name: N, pattern: &str) -> Result<Self> {
        Self::compile(name.into(), true, pattern)
    }

    /// An optional field whose header matches `pattern`
    pub fn optional<N: Into<FieldName>>(name: N, pattern: &str) -> Result<Self> {
        Self::compile(name.into(), false, pattern)
    }

    /// Build from an already compiled regex, used as-is
    pub fn from_regex<N: Into<FieldName>>(name: N, required: bool, pattern: Regex) -> Self {
        let name = name.into();
        let form_key = default_form_key(&name);
        Self {
            name,
            required,
            pattern,
            form_key,
        }
    }

    /// Override the form field name used in the submission payload
    pub fn with_form_key<S: Into<String>>(mut self, key: S) -> Self {
        self.form_key = key.into();
        self
    }

    fn compile(name: FieldName, required: bool, pattern: &str) -> Result<Self> {
        let pattern = RegexBuilder::new(&format!(r"^\s*(?:{})\s*$", pattern))
            .case_insensitive(true)
            .build()?;
        Ok(Self::from_regex(name, required, pattern))
    }

    /// Field name
    pub fn name(&self) -> &FieldName {
        &self.name
    }

    /// Whether the field must be mapped before submission
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The header pattern
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Form field name in the submission payload
    pub fn form_key(&self) -> &str {
        &self.form_key
    }

    /// Test a header string against the pattern
    pub fn matches(&self, header: &str) -> bool {
        self.pattern.is_match(header)
    }
}

fn default_form_key(name: &FieldName) -> String {
    format!("{}Column", name)
}

/// A complete workflow configuration
#[derive(Debug, Clone)]
pub struct IntakeProfile {
    name: String,
    fields: Vec<FieldSpec>,
    primary: usize,
    max_scan_rows: usize,
    preview_rows: usize,
    header_fallback: HeaderFallback,
}

impl IntakeProfile {
    /// Start building a custom profile
    pub fn builder<S: Into<String>>(name: S) -> IntakeProfileBuilder {
        IntakeProfileBuilder::new(name)
    }

    /// The offer upload workflow: `style` and `brand` required.
    ///
    /// Falls back to manual header selection when no row names a style column.
    pub fn offer() -> Self {
        Self {
            name: "offer".into(),
            fields: vec![
                style_field().with_form_key("searchColumn"),
                FieldSpec::from_regex("brand", true, brand_pattern()).with_form_key("brandColumn"),
                FieldSpec::from_regex("category", false, category_pattern())
                    .with_form_key("categoryColumn"),
                FieldSpec::from_regex("colorName", false, color_pattern())
                    .with_form_key("colorColumn"),
                FieldSpec::from_regex("imageAdd", false, image_pattern())
                    .with_form_key("imageColumn"),
                FieldSpec::from_regex(
                    "readImage",
                    false,
                    Regex::clone(regex!(r"(?i)^\s*(?:read\s*images?|image\s*read|embedded\s*images?|extract\s*images?|image\s*column)\s*$")),
                )
                .with_form_key("readImageColumn"),
            ],
            primary: 0,
            max_scan_rows: DEFAULT_MAX_SCAN_ROWS,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            header_fallback: HeaderFallback::Manual,
        }
    }

    /// The data-warehouse workflow: `style` and `msrp` required.
    ///
    /// Falls back to the densest scanned row.
    pub fn warehouse() -> Self {
        Self {
            name: "warehouse".into(),
            fields: vec![
                style_field().with_form_key("searchColumn"),
                FieldSpec::from_regex(
                    "msrp",
                    true,
                    Regex::clone(regex!(r"(?i)^\s*(?:msrp|m\.s\.r\.p\.?|rrp|srp|retail|retail\s*price|list\s*price|suggested\s*retail(?:\s*price)?|price)\s*$")),
                )
                .with_form_key("msrpColumn"),
                FieldSpec::from_regex("brand", false, brand_pattern()).with_form_key("brandColumn"),
                FieldSpec::from_regex("category", false, category_pattern())
                    .with_form_key("categoryColumn"),
                FieldSpec::from_regex("colorName", false, color_pattern())
                    .with_form_key("colorColumn"),
            ],
            primary: 0,
            max_scan_rows: DEFAULT_MAX_SCAN_ROWS,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            header_fallback: HeaderFallback::DensestRow,
        }
    }

    /// Look up a built-in profile by name
    pub fn builtin(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "offer" => Some(Self::offer()),
            "warehouse" | "data-warehouse" | "dw" => Some(Self::warehouse()),
            _ => None,
        }
    }

    /// Profile name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in classification priority order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Field names in classification priority order
    pub fn priority(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == *name)
    }

    /// Whether `name` belongs to this profile
    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Required field names, in priority order
    pub fn required_fields(&self) -> Vec<FieldName> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.clone())
            .collect()
    }

    /// Optional field names, in priority order
    pub fn optional_fields(&self) -> Vec<FieldName> {
        self.fields
            .iter()
            .filter(|f| !f.required)
            .map(|f| f.name.clone())
            .collect()
    }

    /// The field whose pattern identifies the header row
    pub fn primary(&self) -> &FieldSpec {
        &self.fields[self.primary]
    }

    /// Number of leading rows searched for a header
    pub fn max_scan_rows(&self) -> usize {
        self.max_scan_rows
    }

    /// Number of body rows shown in a preview
    pub fn preview_rows(&self) -> usize {
        self.preview_rows
    }

    /// Header detection fallback policy
    pub fn header_fallback(&self) -> HeaderFallback {
        self.header_fallback
    }

    /// Form field name for `field`; fields outside the profile (synthetic
    /// columns) get `<field>Column`
    pub fn form_key_for(&self, field: &FieldName) -> String {
        self.field(field.as_str())
            .map(|f| f.form_key.clone())
            .unwrap_or_else(|| default_form_key(field))
    }

    /// Replace the header fallback policy
    pub fn with_header_fallback(mut self, fallback: HeaderFallback) -> Self {
        self.header_fallback = fallback;
        self
    }

    /// Replace the scan window; zero rows is rejected like in the builder
    pub fn with_max_scan_rows(mut self, rows: usize) -> Result<Self> {
        check_max_scan_rows(rows)?;
        self.max_scan_rows = rows;
        Ok(self)
    }
}

fn check_max_scan_rows(rows: usize) -> Result<()> {
    if rows == 0 {
        return Err(Error::InvalidProfile("max_scan_rows must be at least 1".into()));
    }
    Ok(())
}

fn style_field() -> FieldSpec {
    FieldSpec::from_regex(
        "style",
        true,
        Regex::clone(regex!(r"(?i)^\s*(?:style|style\s*(?:#|no\.?|num(?:ber)?|code|id)|sku|sku\s*(?:#|no\.?|num(?:ber)?|code)|item|item\s*(?:#|no\.?|num(?:ber)?|code)|product\s*(?:#|code|id|no\.?|num(?:ber)?)|model|model\s*(?:#|no\.?|num(?:ber)?)|article\s*(?:#|no\.?|num(?:ber)?)|part\s*(?:#|no\.?|num(?:ber)?)|mpn)\s*$")),
    )
}

fn brand_pattern() -> Regex {
    Regex::clone(regex!(r"(?i)^\s*(?:brand|brand\s*name|manufacturer|mfr|mfg|make|label|designer|vendor|vendor\s*name)\s*$"))
}

fn category_pattern() -> Regex {
    Regex::clone(regex!(r"(?i)^\s*(?:category|categories|product\s*(?:type|category)|type|department|dept|class|division)\s*$"))
}

fn color_pattern() -> Regex {
    Regex::clone(regex!(r"(?i)^\s*(?:colou?rs?|colou?r\s*(?:name|description|desc)|colou?rway)\s*$"))
}

fn image_pattern() -> Regex {
    Regex::clone(regex!(r"(?i)^\s*(?:images?|image\s*(?:url|link|add|address|path|src)|img|img\s*url|photo|photo\s*url|picture|thumbnail)\s*$"))
}

/// Builder for [`IntakeProfile`]
#[derive(Debug)]
pub struct IntakeProfileBuilder {
    name: String,
    fields: Vec<FieldSpec>,
    primary: Option<FieldName>,
    max_scan_rows: usize,
    preview_rows: usize,
    header_fallback: HeaderFallback,
}

impl IntakeProfileBuilder {
    fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            primary: None,
            max_scan_rows: DEFAULT_MAX_SCAN_ROWS,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            header_fallback: HeaderFallback::default(),
        }
    }

    /// Append a field; declaration order is classification priority
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Field used to recognize the header row (default: first required field)
    pub fn primary<N: Into<FieldName>>(mut self, name: N) -> Self {
        self.primary = Some(name.into());
        self
    }

    /// Number of leading rows searched for a header
    pub fn max_scan_rows(mut self, rows: usize) -> Self {
        self.max_scan_rows = rows;
        self
    }

    /// Number of body rows shown in a preview
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    /// Header detection fallback policy
    pub fn header_fallback(mut self, fallback: HeaderFallback) -> Self {
        self.header_fallback = fallback;
        self
    }

    /// Validate and build the profile
    pub fn build(self) -> Result<IntakeProfile> {
        if self.fields.iter().all(|f| !f.required) {
            return Err(Error::InvalidProfile(format!(
                "profile '{}' has no required fields",
                self.name
            )));
        }

        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(Error::InvalidProfile(format!(
                    "field '{}' is declared twice",
                    field.name
                )));
            }
        }

        check_max_scan_rows(self.max_scan_rows)?;

        let primary = match &self.primary {
            Some(name) => self
                .fields
                .iter()
                .position(|f| f.name == *name)
                .ok_or_else(|| Error::UnknownField(name.to_string()))?,
            None => self
                .fields
                .iter()
                .position(|f| f.required)
                .ok_or_else(|| Error::InvalidProfile("no primary field".into()))?,
        };

        Ok(IntakeProfile {
            name: self.name,
            fields: self.fields,
            primary,
            max_scan_rows: self.max_scan_rows,
            preview_rows: self.preview_rows,
            header_fallback: self.header_fallback,
        })
    }
}
