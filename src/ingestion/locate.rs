//! Sheet selection and header-row detection.

use tracing::debug;

use crate::error::{ImportError, ImportResult};
use crate::types::{Grid, Row, SheetDescriptor};

/// Rows scanned for a header when no other limit is configured.
pub const DEFAULT_HEADER_SCAN_ROWS: usize = 10;

/// Keyword hits a row needs to count as the header.
pub const DEFAULT_MIN_KEYWORD_HITS: usize = 2;

/// Where the engine decided the data lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLocation {
    /// Index of the selected sheet in workbook order.
    pub sheet_index: usize,
    /// 0-based header row index within the selected sheet.
    pub header_row: usize,
    /// Keywords found in the header row.
    pub keyword_hits: usize,
    /// `false` when no scanned row met the threshold and row 0 was assumed.
    pub matched: bool,
}

/// Pick the sheet with the most rows; the first one wins ties.
pub fn select_sheet(sheets: &[SheetDescriptor]) -> ImportResult<(usize, &SheetDescriptor)> {
    let mut best: Option<(usize, &SheetDescriptor)> = None;
    for (idx, sheet) in sheets.iter().enumerate() {
        match best {
            Some((_, current)) if sheet.row_count() <= current.row_count() => {}
            _ => best = Some((idx, sheet)),
        }
    }
    best.ok_or(ImportError::EmptyWorkbook)
}

/// Count how many `keywords` occur in the row's lower-cased, space-joined text.
pub fn keyword_hits(row: &Row, keywords: &[&str]) -> usize {
    let joined = row
        .iter()
        .map(|c| c.to_text().trim().to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    keywords
        .iter()
        .filter(|k| joined.contains(&k.to_lowercase()))
        .count()
}

/// Find the first of the leading `scan_rows` rows with at least `min_hits` keywords.
///
/// Returns `(row index, hits, matched)`; falls back to row 0 when nothing qualifies.
pub fn find_header_row(
    grid: &Grid,
    keywords: &[&str],
    scan_rows: usize,
    min_hits: usize,
) -> (usize, usize, bool) {
    let limit = scan_rows.min(grid.len());
    for (idx, row) in grid.iter().take(limit).enumerate() {
        let hits = keyword_hits(row, keywords);
        if hits >= min_hits {
            return (idx, hits, true);
        }
    }
    let hits = grid.first().map(|row| keyword_hits(row, keywords)).unwrap_or(0);
    (0, hits, false)
}

/// Select the data sheet and its header row using the default scan limits.
pub fn locate<'a>(
    sheets: &'a [SheetDescriptor],
    keywords: &[&str],
) -> ImportResult<(&'a SheetDescriptor, usize)> {
    let loc = locate_with(sheets, keywords, DEFAULT_HEADER_SCAN_ROWS, DEFAULT_MIN_KEYWORD_HITS)?;
    Ok((&sheets[loc.sheet_index], loc.header_row))
}

/// Select the data sheet and its header row.
pub fn locate_with(
    sheets: &[SheetDescriptor],
    keywords: &[&str],
    scan_rows: usize,
    min_hits: usize,
) -> ImportResult<HeaderLocation> {
    let (sheet_index, sheet) = select_sheet(sheets)?;
    let (header_row, keyword_hits, matched) = find_header_row(&sheet.grid, keywords, scan_rows, min_hits);
    debug!(
        sheet = %sheet.name,
        rows = sheet.row_count(),
        header_row,
        keyword_hits,
        matched,
        "located header row"
    );
    Ok(HeaderLocation {
        sheet_index,
        header_row,
        keyword_hits,
        matched,
    })
}
