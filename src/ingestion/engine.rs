//! Schema-generic parse of a decoded workbook.
//!
//! The control flow is the same for every [`AuctionSchema`]:
//!
//! 1. pick the sheet with the most rows and locate its header row
//! 2. resolve the header cells to canonical fields
//! 3. normalize every row below the header
//!
//! Only steps that cannot produce a usable result are fatal (no sheets, fewer than two rows).

use tracing::debug;

use super::columns::resolve_columns_with;
use super::diagnostics::DiagnosticsCollector;
use super::locate::locate_with;
use super::normalize::normalize_rows_into;
use super::unified::ImportOptions;
use crate::error::{ImportError, ImportResult};
use crate::schema::AuctionSchema;
use crate::types::{ParseResult, Workbook};

/// Parse `workbook` into records of schema `S`.
pub fn parse_workbook<S: AuctionSchema>(
    workbook: &Workbook,
    options: &ImportOptions,
) -> ImportResult<ParseResult<S::Record>> {
    let location = locate_with(
        &workbook.sheets,
        S::HEADER_KEYWORDS,
        options.header_scan_rows,
        options.min_header_keyword_hits,
    )?;
    let sheet = workbook
        .sheets
        .get(location.sheet_index)
        .ok_or(ImportError::EmptyWorkbook)?;

    if sheet.row_count() < 2 {
        return Err(ImportError::TooFewRows {
            sheet: sheet.name.clone(),
            rows: sheet.row_count(),
        });
    }

    let header = sheet
        .grid
        .get(location.header_row)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let resolution = resolve_columns_with(header, S::synonyms(), options.duplicate_headers);
    debug!(
        schema = S::NAME,
        mapped = resolution.columns.len(),
        unmapped = resolution.unmapped.len(),
        conflicts = resolution.conflicts.len(),
        "resolved header columns"
    );

    let mut collector = DiagnosticsCollector::new(S::NAME, options.sample_rows);
    collector.record_workbook(workbook, &location);
    collector.record_columns(header, &resolution, S::FIELDS);

    Ok(normalize_rows_into::<S>(
        &sheet.grid,
        location.header_row + 1,
        &resolution.columns,
        options,
        collector,
    ))
}
