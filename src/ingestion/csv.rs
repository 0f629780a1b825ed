//! CSV decoding into a single-sheet [`Workbook`].

use std::path::Path;

use crate::error::ImportResult;
use crate::types::{Cell, Grid, SheetDescriptor, Workbook};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Sheet name used when the file name has no usable stem.
pub const DEFAULT_CSV_SHEET: &str = "Sheet1";

/// Decode CSV bytes into a one-sheet [`Workbook`].
///
/// Rules:
///
/// - no row is treated as a header; header detection happens later
/// - rows may have different widths
/// - a leading UTF-8 byte-order mark is dropped and invalid UTF-8 is replaced, not rejected
/// - empty fields become [`Cell::Empty`]; everything else stays text
pub fn decode_csv(bytes: &[u8], sheet_name: &str) -> ImportResult<Workbook> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    decode_csv_from_reader(&mut rdr, sheet_name)
}

/// Decode CSV data from an existing CSV reader.
pub fn decode_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    sheet_name: &str,
) -> ImportResult<Workbook> {
    let mut grid: Grid = Vec::new();
    for result in rdr.byte_records() {
        let record = result?;
        grid.push(
            record
                .iter()
                .map(|raw| csv_cell(&String::from_utf8_lossy(raw)))
                .collect(),
        );
    }
    Ok(Workbook::new(vec![SheetDescriptor::new(sheet_name, grid)]))
}

/// Sheet name derived from a file name (`"lots.csv"` -> `"lots"`).
pub fn sheet_name_for(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(DEFAULT_CSV_SHEET)
        .to_string()
}

fn csv_cell(raw: &str) -> Cell {
    if raw.is_empty() {
        Cell::Empty
    } else {
        Cell::String(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ragged_rows_and_bom_are_accepted() {
        let data = b"\xEF\xBB\xBFEvent No,Event Type\nE1,Sale,extra\n\nE2\n";
        let wb = decode_csv(data, "lots").unwrap();
        let grid = &wb.sheets[0].grid;

        assert_eq!(wb.sheets[0].name, "lots");
        assert_eq!(grid[0][0], Cell::from("Event No"));
        assert_eq!(grid[1].len(), 3);
        assert_eq!(grid[2], vec![Cell::from("E2")]);
    }

    #[test]
    fn empty_fields_become_empty_cells() {
        let wb = decode_csv(b"a,,c\n", "s").unwrap();
        assert_eq!(wb.sheets[0].grid[0][1], Cell::Empty);
    }

    #[test]
    fn sheet_name_comes_from_the_file_stem() {
        assert_eq!(sheet_name_for("bank/lots.CSV"), "lots");
        assert_eq!(sheet_name_for(""), DEFAULT_CSV_SHEET);
    }
}
