//! Header row detection

use regex::Regex;
use serde::Serialize;
use sheet_intake_core::{CellRange, Grid};

use crate::classify::normalize_header;
use crate::profile::{HeaderFallback, IntakeProfile, DEFAULT_MAX_SCAN_ROWS};

/// A row needs at least this many non-empty values to be a header candidate
pub const MIN_HEADER_VALUES: usize = 2;

/// How a header row was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    /// A value in the row matched the primary field's pattern
    PatternMatch,
    /// No row matched; a fallback policy picked this one
    Fallback(HeaderFallback),
    /// Chosen explicitly by the user
    Manual,
}

/// Result of header detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeaderDetection {
    /// Zero-based header row index
    pub row: usize,
    /// How the row was chosen
    pub source: DetectionSource,
}

impl HeaderDetection {
    /// True unless a fallback policy guessed the row
    pub fn is_confident(&self) -> bool {
        !matches!(self.source, DetectionSource::Fallback(_))
    }
}

/// Scans the top of a grid for the row holding column names
#[derive(Debug, Clone)]
pub struct HeaderDetector<'a> {
    pattern: &'a Regex,
    max_scan_rows: usize,
    fallback: HeaderFallback,
}

impl<'a> HeaderDetector<'a> {
    /// Detector keyed on `pattern`, scanning 50 rows, falling back to the
    /// densest row
    pub fn new(pattern: &'a Regex) -> Self {
        Self {
            pattern,
            max_scan_rows: DEFAULT_MAX_SCAN_ROWS,
            fallback: HeaderFallback::default(),
        }
    }

    /// Detector configured from a profile's primary field and policies
    pub fn for_profile(profile: &'a IntakeProfile) -> Self {
        Self {
            pattern: profile.primary().pattern(),
            max_scan_rows: profile.max_scan_rows(),
            fallback: profile.header_fallback(),
        }
    }

    /// Number of leading rows to scan
    pub fn max_scan_rows(mut self, rows: usize) -> Self {
        self.max_scan_rows = rows;
        self
    }

    /// Policy applied when no row matches
    pub fn fallback(mut self, fallback: HeaderFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Find the header row.
    ///
    /// The first scanned row with at least [`MIN_HEADER_VALUES`] values, one
    /// of which matches the primary pattern, wins. Otherwise the fallback
    /// policy decides. An empty grid never has a header.
    pub fn detect(&self, grid: &Grid) -> Option<HeaderDetection> {
        if grid.is_empty() {
            tracing::warn!("Header detection on an empty grid");
            return None;
        }

        let window = self.max_scan_rows.min(grid.row_count());
        if window == 0 {
            return None;
        }
        tracing::debug!(
            "Scanning {} for a header row",
            CellRange::from_indices(0, 0, window - 1, grid.column_count() - 1)
        );

        // (row, value count) of the densest candidate so far
        let mut densest: Option<(usize, usize)> = None;

        for row in 0..window {
            let values = grid.row_values(row);
            if values.len() < MIN_HEADER_VALUES {
                tracing::trace!("Row {} skipped ({} values)", row + 1, values.len());
                continue;
            }

            if values
                .iter()
                .any(|value| self.pattern.is_match(&normalize_header(value)))
            {
                tracing::debug!("Header row {} matched primary pattern", row + 1);
                return Some(HeaderDetection {
                    row,
                    source: DetectionSource::PatternMatch,
                });
            }

            if densest.map_or(true, |(_, count)| values.len() > count) {
                densest = Some((row, values.len()));
            }
        }

        let row = match self.fallback {
            HeaderFallback::Manual => None,
            HeaderFallback::DensestRow => densest.map(|(row, _)| row),
            HeaderFallback::FirstRow => Some(0),
        };

        match row {
            Some(row) => tracing::warn!(
                "No header matched in first {} rows, falling back to row {} ({:?})",
                window,
                row + 1,
                self.fallback
            ),
            None => tracing::warn!(
                "No header matched in first {} rows, manual selection required",
                window
            ),
        }

        row.map(|row| HeaderDetection {
            row,
            source: DetectionSource::Fallback(self.fallback),
        })
    }
}

/// Find the header row of `grid` using `pattern` for the primary field.
///
/// Convenience wrapper around [`HeaderDetector`].
pub fn detect_header_row(
    grid: &Grid,
    pattern: &Regex,
    max_scan_rows: usize,
    fallback: HeaderFallback,
) -> Option<HeaderDetection> {
    HeaderDetector::new(pattern)
        .max_scan_rows(max_scan_rows)
        .fallback(fallback)
        .detect(grid)
}
