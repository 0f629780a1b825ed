//! Row normalization: data rows below the header become typed records.

use tracing::warn;

use super::coerce::RowReader;
use super::diagnostics::DiagnosticsCollector;
use super::unified::ImportOptions;
use crate::error::CellError;
use crate::schema::AuctionSchema;
use crate::types::{Cell, ColumnIndexMap, Grid, ParseResult, Row, RowError, SkipKind, SkipReason};

/// Normalize every row from `data_start_row` to the end of `grid`.
///
/// Behavior:
/// - rows with no cells, or only blank ones, are skipped as [`SkipKind::EmptyRow`]
/// - rows failing the schema's required-field check are skipped as
///   [`SkipKind::MissingRequiredFields`] with a preview of their leading cells
/// - a row whose extraction fails becomes a [`RowError`]; the remaining rows are still read
///
/// `total_rows` counts every row from `data_start_row` on, skipped and failed ones included.
pub fn normalize_rows<S: AuctionSchema>(
    grid: &Grid,
    data_start_row: usize,
    columns: &ColumnIndexMap,
    options: &ImportOptions,
) -> ParseResult<S::Record> {
    let collector = DiagnosticsCollector::new(S::NAME, options.sample_rows);
    normalize_rows_into::<S>(grid, data_start_row, columns, options, collector)
}

pub(crate) fn normalize_rows_into<S: AuctionSchema>(
    grid: &Grid,
    data_start_row: usize,
    columns: &ColumnIndexMap,
    options: &ImportOptions,
    mut collector: DiagnosticsCollector,
) -> ParseResult<S::Record> {
    let mut records = Vec::new();
    let mut row_errors = Vec::new();

    for (idx0, row) in grid.iter().enumerate().skip(data_start_row) {
        // Report 1-based row number (Excel-like).
        let user_row = idx0 + 1;

        if is_empty_row(row) {
            collector.record_skip(SkipReason {
                row: user_row,
                reason: SkipKind::EmptyRow,
                sample: None,
            });
            continue;
        }

        let reader = RowReader::new(user_row, row, columns);
        if collector.wants_sample_row() {
            collector.record_sample_row(reader.preview(row.len(), options.sample_cell_chars));
        }

        match extract_row::<S>(&reader) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => collector.record_skip(SkipReason {
                row: user_row,
                reason: SkipKind::MissingRequiredFields,
                sample: Some(reader.preview(options.skip_sample_cells, options.sample_cell_chars)),
            }),
            Err(err) => {
                warn!(schema = S::NAME, row = user_row, error = %err, "row extraction failed");
                row_errors.push(RowError {
                    row: user_row,
                    message: err.to_string(),
                });
            }
        }
    }

    ParseResult {
        records,
        row_errors,
        total_rows: grid.len().saturating_sub(data_start_row),
        diagnostics: collector.finish(),
    }
}

fn is_empty_row(row: &Row) -> bool {
    row.iter().all(Cell::is_blank)
}

fn extract_row<S: AuctionSchema>(row: &RowReader<'_>) -> Result<Option<S::Record>, CellError> {
    if !S::has_required_fields(row)? {
        return Ok(None);
    }
    S::extract(row).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::columns::resolve_columns;
    use crate::schema::{PropertyAuction, VehicleAuction};
    use crate::types::grid_from_strings;

    #[test]
    fn counts_add_up_to_total_rows() {
        let mut grid = grid_from_strings([
            vec!["Event No", "Event Type", "Reserve Price"],
            vec!["E1", "Sale", "100"],
            vec![],
            vec!["", "", "5"],
            vec!["E4", "", "x"],
        ]);
        grid.push(vec![Cell::from("E5"), Cell::Empty, Cell::Error("#VALUE!".to_string())]);
        let cols = resolve_columns(&grid[0], PropertyAuction::synonyms());

        let res = normalize_rows::<PropertyAuction>(&grid, 1, &cols, &ImportOptions::default());

        assert_eq!(res.total_rows, 5);
        assert_eq!(res.successful_rows(), 2);
        assert_eq!(res.skipped().len(), 2);
        assert_eq!(res.row_errors.len(), 1);
        assert_eq!(
            res.records.len() + res.skipped().len() + res.row_errors.len(),
            res.total_rows
        );
        assert_eq!(res.row_errors[0].row, 6);
        assert_eq!(res.records[1].reserve_price, None);
    }

    #[test]
    fn records_keep_row_order() {
        let grid = grid_from_strings([
            vec!["Contract No", "Make"],
            vec!["C3", "Tata"],
            vec!["C1", "Ford"],
            vec!["C2", "Kia"],
        ]);
        let cols = resolve_columns(&grid[0], VehicleAuction::synonyms());
        let res = normalize_rows::<VehicleAuction>(&grid, 1, &cols, &ImportOptions::default());
        let ids: Vec<&str> = res.records.iter().map(|r| r.contract_no.as_str()).collect();
        assert_eq!(ids, vec!["C3", "C1", "C2"]);
    }

    #[test]
    fn missing_required_rows_carry_a_short_preview() {
        let grid = grid_from_strings([
            vec!["Contract No", "Make", "Model", "Year", "Fuel", "Colour", "Yard"],
            vec!["C1", "", "Nexon", "2020", "Petrol", "Red", "Pune Yard"],
        ]);
        let cols = resolve_columns(&grid[0], VehicleAuction::synonyms());
        let res = normalize_rows::<VehicleAuction>(&grid, 1, &cols, &ImportOptions::default());

        let skip = &res.skipped()[0];
        assert_eq!(skip.reason, SkipKind::MissingRequiredFields);
        assert_eq!(skip.row, 2);
        assert_eq!(skip.sample.as_ref().map(Vec::len), Some(5));
        assert!(res.row_errors.is_empty());
    }

    #[test]
    fn header_as_last_row_yields_nothing() {
        let grid = grid_from_strings([vec!["title"], vec!["Event No", "Event Type"]]);
        let cols = resolve_columns(&grid[1], PropertyAuction::synonyms());
        let res = normalize_rows::<PropertyAuction>(&grid, 2, &cols, &ImportOptions::default());
        assert_eq!(res.total_rows, 0);
        assert!(res.records.is_empty());
    }
}
