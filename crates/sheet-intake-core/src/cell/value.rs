//! Cell value types

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display format for date-time cells (en-US locale style, e.g. `1/5/2024, 3:04:05 PM`)
pub const DISPLAY_DATETIME_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Represents the raw value of a cell as produced by a spreadsheet parser
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Cell {
    /// Empty cell (no value, or a cell missing from a ragged row)
    #[default]
    Empty,

    /// Plain text
    Text(String),

    /// Numeric value
    Number(f64),

    /// Boolean value
    Boolean(bool),

    /// Date / time value
    DateTime(NaiveDateTime),

    /// Rich cell object carrying an error, a formula result, text or a hyperlink
    Linked(LinkedCell),
}

impl Cell {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        Cell::Text(s.into())
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Check if the cell renders as blank text once trimmed
    pub fn is_blank(&self) -> bool {
        self.normalize().trim().is_empty()
    }

    /// Canonical display string for this cell.
    ///
    /// Total over every variant; never fails.
    ///
    /// ```
    /// use sheet_intake_core::{Cell, LinkedCell};
    ///
    /// assert_eq!(Cell::Empty.normalize(), "");
    /// assert_eq!(Cell::Number(42.0).normalize(), "42");
    /// assert_eq!(Cell::Boolean(true).normalize(), "true");
    /// assert_eq!(Cell::Linked(LinkedCell::error("N/A")).normalize(), "N/A");
    /// ```
    pub fn normalize(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format_number(*n),
            Cell::Boolean(b) => b.to_string(),
            Cell::DateTime(dt) => dt.format(DISPLAY_DATETIME_FORMAT).to_string(),
            Cell::Linked(linked) => linked.normalize(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalize())
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Boolean(b)
    }
}

impl From<i32> for Cell {
    fn from(n: i32) -> Self {
        Cell::Number(n as f64)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Number(n as f64)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::text(s)
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(dt: NaiveDateTime) -> Self {
        Cell::DateTime(dt)
    }
}

impl From<NaiveDate> for Cell {
    fn from(d: NaiveDate) -> Self {
        Cell::DateTime(d.and_time(chrono::NaiveTime::default()))
    }
}

impl From<LinkedCell> for Cell {
    fn from(linked: LinkedCell) -> Self {
        Cell::Linked(linked)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Empty)
    }
}

/// A rich cell object.
///
/// Resolution order when rendering: `error`, then `result`, then `text`,
/// then `hyperlink`. Anything else the parser attached is kept in `extra`
/// and only shows up in the structural fallback.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LinkedCell {
    /// Error text (e.g. `#N/A`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Cached formula result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Box<Cell>>,
    /// Display text (hyperlink caption, rich-text flattening)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Hyperlink target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyperlink: Option<String>,
    /// Any other payload the parser attached
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LinkedCell {
    /// A linked cell carrying only an error
    pub fn error<S: Into<String>>(error: S) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// A linked cell carrying only a formula result
    pub fn result(result: Cell) -> Self {
        Self {
            result: Some(Box::new(result)),
            ..Self::default()
        }
    }

    /// A hyperlink cell with optional caption text
    pub fn hyperlink<S: Into<String>>(target: S, text: Option<String>) -> Self {
        Self {
            hyperlink: Some(target.into()),
            text,
            ..Self::default()
        }
    }

    /// Render with the fixed resolution order, falling back to JSON
    pub fn normalize(&self) -> String {
        if let Some(error) = &self.error {
            return error.clone();
        }
        if let Some(result) = &self.result {
            return result.normalize();
        }
        if let Some(text) = &self.text {
            return text.clone();
        }
        if let Some(hyperlink) = &self.hyperlink {
            return hyperlink.clone();
        }
        serde_json::to_string(&self.extra).unwrap_or_default()
    }
}

/// Format a number the way a JavaScript `String(n)` would.
///
/// Integral values print without a fraction, magnitudes at or above `1e21`
/// or below `1e-6` switch to exponent form (`1e+21`, `1e-7`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".into();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }
    if n == 0.0 {
        // also folds -0
        return "0".into();
    }

    let abs = n.abs();
    if abs >= 1e21 || abs < 1e-6 {
        let s = format!("{:e}", n);
        match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => s,
        }
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_normalize_primitives() {
        assert_eq!(Cell::Empty.normalize(), "");
        assert_eq!(Cell::text("Style #").normalize(), "Style #");
        assert_eq!(Cell::Number(42.0).normalize(), "42");
        assert_eq!(Cell::Number(3.5).normalize(), "3.5");
        assert_eq!(Cell::Number(-12.25).normalize(), "-12.25");
        assert_eq!(Cell::Boolean(true).normalize(), "true");
        assert_eq!(Cell::Boolean(false).normalize(), "false");
    }

    #[test]
    fn test_normalize_datetime() {
        let cell = Cell::DateTime(datetime(2024, 1, 5, 15, 4, 5));
        assert_eq!(cell.normalize(), "1/5/2024, 3:04:05 PM");

        let cell = Cell::from(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(cell.normalize(), "12/31/2023, 12:00:00 AM");
    }

    #[test]
    fn test_normalize_linked_resolution_order() {
        let all = LinkedCell {
            error: Some("#REF!".into()),
            result: Some(Box::new(Cell::Number(7.0))),
            text: Some("seven".into()),
            hyperlink: Some("https://example.com".into()),
            extra: serde_json::Map::new(),
        };
        assert_eq!(all.normalize(), "#REF!");

        let no_error = LinkedCell {
            error: None,
            ..all.clone()
        };
        assert_eq!(no_error.normalize(), "7");

        let text_only = LinkedCell {
            result: None,
            ..no_error.clone()
        };
        assert_eq!(text_only.normalize(), "seven");

        let link = LinkedCell::hyperlink("https://example.com/a.png", None);
        assert_eq!(link.normalize(), "https://example.com/a.png");
    }

    #[test]
    fn test_normalize_linked_result_is_recursive() {
        let nested = LinkedCell::result(Cell::Linked(LinkedCell::result(Cell::Boolean(false))));
        assert_eq!(Cell::Linked(nested).normalize(), "false");
    }

    #[test]
    fn test_normalize_linked_structural_fallback() {
        let mut extra = serde_json::Map::new();
        extra.insert("richText".into(), json!([{ "text": "Acme" }]));
        let cell = Cell::Linked(LinkedCell {
            extra,
            ..LinkedCell::default()
        });
        assert_eq!(cell.normalize(), r#"{"richText":[{"text":"Acme"}]}"#);

        assert_eq!(Cell::Linked(LinkedCell::default()).normalize(), "{}");
    }

    #[test]
    fn test_format_number_matches_javascript() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_cell_conversions() {
        assert_eq!(Cell::from(42), Cell::Number(42.0));
        assert_eq!(Cell::from(true), Cell::Boolean(true));
        assert_eq!(Cell::from("hello"), Cell::text("hello"));
        assert_eq!(Cell::from(None::<&str>), Cell::Empty);
        assert_eq!(Cell::from(Some(1.5)), Cell::Number(1.5));
    }

    #[test]
    fn test_linked_cell_deserializes_parser_shape() {
        let linked: LinkedCell =
            serde_json::from_value(json!({ "text": "Acme", "hyperlink": "https://acme.test" }))
                .unwrap();
        assert_eq!(linked.normalize(), "Acme");
        assert!(linked.extra.is_empty());
    }
}
