#![cfg(feature = "excel")]

//! Spreadsheet decoding (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) into a [`Workbook`].

use std::io::{Cursor, Read, Seek};

use calamine::{Data, Range, Reader, Sheets, Xlsx, open_workbook_auto_from_rs};
use tracing::debug;

use crate::error::ImportResult;
use crate::types::{Cell, Grid, MergedRange, SheetDescriptor, Workbook};

/// Decode spreadsheet bytes into a [`Workbook`].
///
/// Behavior:
/// - the container type is detected from the bytes, not from a file name
/// - every readable sheet is kept in workbook order; sheets calamine cannot read (chart sheets,
///   macro sheets) are skipped, and the first such error is returned only if none was readable
/// - each grid is anchored at `A1`, so row and column positions match what a user sees
/// - date cells honour the workbook's 1900 or 1904 date system
/// - merged regions are read for `.xlsx`/`.xlsm` only; failures to read them are ignored
pub fn decode_excel(bytes: &[u8]) -> ImportResult<Workbook> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let names = workbook.sheet_names().to_vec();

    let sheets = read_sheets(&names, |name| workbook.worksheet_range(name))?;

    let merged_ranges = match &mut workbook {
        Sheets::Xlsx(xlsx) => read_merged_ranges(xlsx, &names),
        _ => Vec::new(),
    };

    Ok(Workbook { sheets, merged_ranges })
}

fn read_sheets<F>(names: &[String], mut read: F) -> ImportResult<Vec<SheetDescriptor>>
where
    F: FnMut(&str) -> Result<Range<Data>, calamine::Error>,
{
    let mut sheets = Vec::with_capacity(names.len());
    let mut first_error = None;
    for name in names {
        match read(name) {
            Ok(range) => sheets.push(SheetDescriptor::new(name.clone(), range_to_grid(&range))),
            Err(err) => {
                debug!(sheet = %name, error = %err, "skipping unreadable sheet");
                first_error.get_or_insert(err);
            }
        }
    }
    match first_error {
        Some(err) if sheets.is_empty() => Err(err.into()),
        _ => Ok(sheets),
    }
}

fn range_to_grid(range: &Range<Data>) -> Grid {
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or_default();

    let mut grid: Grid = Vec::with_capacity(row_offset + range.height());
    grid.resize_with(row_offset, Vec::new);
    for row in range.rows() {
        let mut cells = Vec::with_capacity(col_offset + row.len());
        cells.resize(col_offset, Cell::Empty);
        cells.extend(row.iter().map(convert_cell));
        grid.push(cells);
    }
    grid
}

fn convert_cell(c: &Data) -> Cell {
    match c {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::String(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) if dt.is_duration() => Cell::Float(dt.as_f64()),
        Data::DateTime(dt) => dt.as_datetime().map(Cell::DateTime).unwrap_or(Cell::Float(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::String(s.clone()),
        Data::Error(e) => Cell::Error(e.to_string()),
    }
}

fn read_merged_ranges<RS: Read + Seek>(xlsx: &mut Xlsx<RS>, names: &[String]) -> Vec<MergedRange> {
    let mut out = Vec::new();
    for name in names {
        match xlsx.worksheet_merge_cells(name) {
            Some(Ok(dims)) => out.extend(dims.into_iter().map(|d| MergedRange {
                sheet: name.clone(),
                start_row: d.start.0,
                start_col: d.start.1,
                end_row: d.end.0,
                end_col: d.end.1,
            })),
            Some(Err(err)) => debug!(sheet = %name, error = %err, "could not read merged cells"),
            None => {}
        }
    }
    out
}
