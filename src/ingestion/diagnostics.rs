//! Debug snapshot returned alongside every successful import.

use serde::Serialize;

use super::columns::{ColumnResolution, HeaderConflict};
use super::locate::HeaderLocation;
use crate::schema::FieldSpec;
use crate::types::{Cell, ColumnIndexMap, MergedRange, SkipKind, SkipReason, Workbook};

/// Row count of one sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetStats {
    pub name: String,
    pub rows: usize,
}

/// Structured description of how a workbook was read.
///
/// Everything in here is derived from the input alone, so two runs over the same grid produce
/// identical diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub schema: String,
    pub sheets: Vec<SheetStats>,
    pub selected_sheet: Option<String>,
    /// 0-based index of the header row in the selected sheet.
    pub header_row_index: Option<usize>,
    /// `false` when the header row was assumed to be row 0.
    pub header_detected: bool,
    pub header_keyword_hits: usize,
    pub sample_headers: Vec<String>,
    pub column_map: ColumnIndexMap,
    pub unmapped_headers: Vec<String>,
    /// Declared fields the header did not carry.
    pub missing_fields: Vec<String>,
    pub header_conflicts: Vec<HeaderConflict>,
    /// Previews of the first data rows.
    pub sample_rows: Vec<Vec<String>>,
    pub skipped_rows: Vec<SkipReason>,
    pub empty_rows: usize,
    pub rows_missing_required: usize,
    pub merged_ranges: Vec<MergedRange>,
}

/// Accumulates [`Diagnostics`] while a run progresses.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsCollector {
    diagnostics: Diagnostics,
    sample_row_limit: usize,
}

impl DiagnosticsCollector {
    /// Start collecting for `schema`, keeping at most `sample_row_limit` row previews.
    pub fn new(schema: &str, sample_row_limit: usize) -> Self {
        Self {
            diagnostics: Diagnostics {
                schema: schema.to_string(),
                ..Diagnostics::default()
            },
            sample_row_limit,
        }
    }

    /// Record sheet statistics and merged ranges of the selected sheet.
    pub fn record_workbook(&mut self, workbook: &Workbook, location: &HeaderLocation) {
        let d = &mut self.diagnostics;
        d.sheets = workbook
            .sheets
            .iter()
            .map(|s| SheetStats {
                name: s.name.clone(),
                rows: s.row_count(),
            })
            .collect();

        if let Some(sheet) = workbook.sheets.get(location.sheet_index) {
            d.selected_sheet = Some(sheet.name.clone());
            d.merged_ranges = workbook
                .merged_ranges
                .iter()
                .filter(|m| m.sheet == sheet.name)
                .cloned()
                .collect();
        }
        d.header_row_index = Some(location.header_row);
        d.header_detected = location.matched;
        d.header_keyword_hits = location.keyword_hits;
    }

    /// Record the header row and how it resolved.
    pub fn record_columns(&mut self, header: &[Cell], resolution: &ColumnResolution, fields: &[FieldSpec]) {
        let d = &mut self.diagnostics;
        d.sample_headers = header.iter().map(|c| c.to_text().trim().to_string()).collect();
        d.column_map = resolution.columns.clone();
        d.unmapped_headers = resolution.unmapped.clone();
        d.header_conflicts = resolution.conflicts.clone();
        d.missing_fields = fields
            .iter()
            .filter(|f| !resolution.columns.contains(f.name))
            .map(|f| f.name.to_string())
            .collect();
    }

    /// Returns `true` while more row previews are wanted.
    pub fn wants_sample_row(&self) -> bool {
        self.diagnostics.sample_rows.len() < self.sample_row_limit
    }

    pub fn record_sample_row(&mut self, preview: Vec<String>) {
        if self.wants_sample_row() {
            self.diagnostics.sample_rows.push(preview);
        }
    }

    pub fn record_skip(&mut self, skip: SkipReason) {
        match skip.reason {
            SkipKind::EmptyRow => self.diagnostics.empty_rows += 1,
            SkipKind::MissingRequiredFields => self.diagnostics.rows_missing_required += 1,
        }
        self.diagnostics.skipped_rows.push(skip);
    }

    pub fn finish(self) -> Diagnostics {
        self.diagnostics
    }
}
