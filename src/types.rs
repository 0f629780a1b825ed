//! Core data model types for auction imports.
//!
//! A decoder turns an encoded file into a [`Workbook`] of [`SheetDescriptor`]s, each holding a
//! row-major [`Grid`] of [`Cell`]s. The engine reads that grid and produces a [`ParseResult`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::ingestion::diagnostics::Diagnostics;

/// A single raw value as exposed by the spreadsheet decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Missing/blank cell.
    Empty,
    /// Text cell.
    String(String),
    /// Floating point number.
    Float(f64),
    /// Integer number.
    Int(i64),
    /// Boolean.
    Bool(bool),
    /// Date/time value (already converted from the spreadsheet's serial representation).
    DateTime(NaiveDateTime),
    /// Error value reported by the spreadsheet (`#REF!`, `#N/A`, ...).
    Error(String),
}

impl Cell {
    /// Returns `true` for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Untrimmed text rendering of the cell.
    ///
    /// Integral floats render without a fractional part (`100000`, not `100000.0`), the way a
    /// spreadsheet shows them.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::String(s) => s.clone(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => {
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
            Cell::Bool(b) => b.to_string(),
            Cell::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
            Cell::Error(e) => e.clone(),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::String(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::String(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

/// One row of cells.
pub type Row = Vec<Cell>;

/// Row-major cell grid of one sheet.
pub type Grid = Vec<Row>;

/// Builds a grid from rows of string-like values. Handy for tests and CSV-like sources.
pub fn grid_from_strings<R, S>(rows: R) -> Grid
where
    R: IntoIterator,
    R::Item: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    rows.into_iter()
        .map(|row| row.into_iter().map(|s| Cell::from(s.as_ref())).collect())
        .collect()
}

/// A single named sheet of a workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetDescriptor {
    /// Sheet name as reported by the decoder.
    pub name: String,
    /// Cells of the sheet.
    pub grid: Grid,
}

impl SheetDescriptor {
    /// Create a new sheet.
    pub fn new(name: impl Into<String>, grid: Grid) -> Self {
        Self {
            name: name.into(),
            grid,
        }
    }

    /// Number of rows in the sheet (including blank and header rows).
    pub fn row_count(&self) -> usize {
        self.grid.len()
    }
}

/// A merged cell region, 0-based and inclusive. Only used for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedRange {
    pub sheet: String,
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

/// Decoded in-memory workbook.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    /// Sheets in workbook order.
    pub sheets: Vec<SheetDescriptor>,
    /// Merged regions across all sheets, when the decoder exposes them.
    pub merged_ranges: Vec<MergedRange>,
}

impl Workbook {
    /// Create a workbook without merged-range information.
    pub fn new(sheets: Vec<SheetDescriptor>) -> Self {
        Self {
            sheets,
            merged_ranges: Vec::new(),
        }
    }

    /// Names of all sheets, in workbook order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }
}

/// Canonical field name -> column position, built from the detected header row.
///
/// A field missing from the header simply has no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnIndexMap {
    columns: BTreeMap<String, usize>,
}

impl ColumnIndexMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Column position of `field`, if the header carried it.
    pub fn get(&self, field: &str) -> Option<usize> {
        self.columns.get(field).copied()
    }

    /// Returns `true` if the header carried `field`.
    pub fn contains(&self, field: &str) -> bool {
        self.columns.contains_key(field)
    }

    /// Set the column of `field`, returning the previous column if there was one.
    pub fn insert(&mut self, field: impl Into<String>, column: usize) -> Option<usize> {
        self.columns.insert(field.into(), column)
    }

    /// Number of resolved fields.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if no header resolved to a known field.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate `(field, column)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<F: Into<String>> FromIterator<(F, usize)> for ColumnIndexMap {
    fn from_iter<T: IntoIterator<Item = (F, usize)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (field, column) in iter {
            map.insert(field, column);
        }
        map
    }
}

/// Why a data row produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipKind {
    /// The row had no cells, or only blank ones.
    EmptyRow,
    /// The schema's required-field check failed.
    MissingRequiredFields,
}

/// A skipped data row. Accumulated for diagnostics, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipReason {
    /// 1-based sheet row number.
    pub row: usize,
    pub reason: SkipKind,
    /// Truncated previews of the leading cells.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<Vec<String>>,
}

/// A data row whose field extraction failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    /// 1-based sheet row number.
    pub row: usize,
    pub message: String,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row, self.message)
    }
}

/// Outcome of normalizing one sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult<R> {
    /// Records in original row order.
    pub records: Vec<R>,
    /// Row-scoped extraction failures in original row order.
    pub row_errors: Vec<RowError>,
    /// Number of rows below the header, including skipped and failed rows.
    pub total_rows: usize,
    pub diagnostics: Diagnostics,
}

impl<R> ParseResult<R> {
    /// Rows that produced a record.
    pub fn successful_rows(&self) -> usize {
        self.records.len()
    }

    /// Rows that were skipped (empty or missing required fields).
    pub fn skipped(&self) -> &[SkipReason] {
        &self.diagnostics.skipped_rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_floats_render_without_fraction() {
        assert_eq!(Cell::Float(100000.0).to_text(), "100000");
        assert_eq!(Cell::Float(12.5).to_text(), "12.5");
        assert_eq!(Cell::Int(-3).to_text(), "-3");
    }

    #[test]
    fn blank_detection_covers_whitespace_text() {
        assert!(Cell::Empty.is_blank());
        assert!(Cell::from("   ").is_blank());
        assert!(!Cell::from("x").is_blank());
        assert!(!Cell::Int(0).is_blank());
    }

    #[test]
    fn column_map_overwrites_and_reports_previous() {
        let mut map = ColumnIndexMap::new();
        assert_eq!(map.insert("make", 1), None);
        assert_eq!(map.insert("make", 4), Some(1));
        assert_eq!(map.get("make"), Some(4));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn grid_from_strings_builds_text_cells() {
        let grid = grid_from_strings([vec!["a", "b"], vec![]]);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0][1], Cell::from("b"));
        assert!(grid[1].is_empty());
    }
}
