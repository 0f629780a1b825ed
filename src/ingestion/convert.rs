#![cfg(feature = "xlsx_writer")]

//! Legacy `.xls` to `.xlsx` conversion.
//!
//! The workbook is decoded with the regular spreadsheet decoder and every sheet is rewritten
//! cell by cell. Values and sheet order survive; styling, formulas and merged regions do not.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rust_xlsxwriter::{Format, XlsxError};
use serde::Serialize;
use tracing::debug;

use super::excel::decode_excel;
use super::response::ImportFailure;
use super::unified::ImportRequest;
use crate::error::{ImportError, ImportResult};
use crate::types::{Cell, Workbook};

/// File name assumed when a conversion request does not name its file.
pub const DEFAULT_XLS_FILE_NAME: &str = "file.xls";

const XLS_EXTENSION: &str = ".xls";
const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Output of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedWorkbook {
    /// Input name with its `.xls` extension replaced by `.xlsx`.
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub original_size: usize,
    pub converted_size: usize,
}

/// Rewrite a legacy `.xls` upload as `.xlsx`.
///
/// The declared name must end in `.xls` (any case), otherwise [`ImportError::NotXlsFile`].
pub fn convert_xls_to_xlsx(request: &ImportRequest) -> ImportResult<ConvertedWorkbook> {
    let stem = xls_stem(&request.file_name).ok_or_else(|| ImportError::NotXlsFile {
        file_name: request.file_name.clone(),
    })?;

    let workbook = decode_excel(&request.bytes)?;
    let bytes = workbook_to_xlsx(&workbook)?;
    debug!(
        file = %request.file_name,
        sheets = workbook.sheets.len(),
        original = request.bytes.len(),
        converted = bytes.len(),
        "converted workbook"
    );

    Ok(ConvertedWorkbook {
        file_name: format!("{stem}.xlsx"),
        original_size: request.bytes.len(),
        converted_size: bytes.len(),
        bytes,
    })
}

/// Convert a base64 upload; a blank name falls back to [`DEFAULT_XLS_FILE_NAME`].
pub fn convert_xls_base64(file_name: Option<&str>, file_base64: Option<&str>) -> ImportResult<ConvertedWorkbook> {
    let file_name = file_name
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_XLS_FILE_NAME);
    let request = ImportRequest::from_base64(Some(file_name), file_base64)?;
    convert_xls_to_xlsx(&request)
}

fn xls_stem(file_name: &str) -> Option<&str> {
    let split = file_name.len().checked_sub(XLS_EXTENSION.len())?;
    let ext = file_name.get(split..)?;
    ext.eq_ignore_ascii_case(XLS_EXTENSION)
        .then(|| file_name.get(..split))
        .flatten()
}

/// Serialize a decoded workbook as `.xlsx` bytes.
pub fn workbook_to_xlsx(workbook: &Workbook) -> ImportResult<Vec<u8>> {
    if workbook.sheets.is_empty() {
        return Err(ImportError::EmptyWorkbook);
    }
    let date_format = Format::new().set_num_format(DATETIME_FORMAT);
    let mut out = rust_xlsxwriter::Workbook::new();

    for sheet in &workbook.sheets {
        let ws = out.add_worksheet();
        ws.set_name(&sheet.name)?;
        for (r, row) in sheet.grid.iter().enumerate() {
            let r = u32::try_from(r).map_err(|_| XlsxError::RowColumnLimitError)?;
            for (c, cell) in row.iter().enumerate() {
                let c = u16::try_from(c).map_err(|_| XlsxError::RowColumnLimitError)?;
                match cell {
                    Cell::Empty => continue,
                    Cell::String(s) | Cell::Error(s) => ws.write_string(r, c, s)?,
                    Cell::Float(f) => ws.write_number(r, c, *f)?,
                    Cell::Int(i) => ws.write_number(r, c, *i as f64)?,
                    Cell::Bool(b) => ws.write_boolean(r, c, *b)?,
                    Cell::DateTime(dt) => ws.write_datetime_with_format(r, c, dt, &date_format)?,
                };
            }
        }
    }
    Ok(out.save_to_buffer()?)
}

/// Body of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionSummary {
    pub success: bool,
    pub xlsx_base64: String,
    pub file_name: String,
    pub original_size: usize,
    pub converted_size: usize,
}

/// Either conversion response shape, serialized without a wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConversionResponse {
    Success(ConversionSummary),
    Failure(ImportFailure),
}

impl ConversionResponse {
    /// Build the response for a conversion outcome.
    ///
    /// Request validation failures keep their own message; anything else is reported as
    /// `Failed to convert file: ...`.
    pub fn from_result(result: ImportResult<ConvertedWorkbook>) -> Self {
        match result {
            Ok(converted) => ConversionResponse::Success(ConversionSummary {
                success: true,
                xlsx_base64: STANDARD.encode(&converted.bytes),
                file_name: converted.file_name,
                original_size: converted.original_size,
                converted_size: converted.converted_size,
            }),
            Err(err) => {
                let error = match &err {
                    ImportError::MissingInput { .. } | ImportError::NotXlsFile { .. } => err.user_message(),
                    other => format!("Failed to convert file: {other}"),
                };
                ConversionResponse::Failure(ImportFailure { success: false, error })
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ConversionResponse::Success(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SheetDescriptor, grid_from_strings};

    #[test]
    fn only_xls_names_are_accepted() {
        assert_eq!(xls_stem("lots.xls"), Some("lots"));
        assert_eq!(xls_stem("Lots.XLS"), Some("Lots"));
        assert_eq!(xls_stem("lots.xlsx"), None);
        assert_eq!(xls_stem(".xl"), None);

        let err = convert_xls_to_xlsx(&ImportRequest::new("lots.xlsx", vec![1, 2, 3])).unwrap_err();
        assert_eq!(err.user_message(), "File must be a .xls file");
    }

    #[test]
    fn missing_payload_is_reported_verbatim() {
        let response = ConversionResponse::from_result(convert_xls_base64(Some("lots.xls"), None));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Missing fileBase64 parameter");
    }

    #[test]
    fn undecodable_bytes_are_wrapped() {
        let payload = STANDARD.encode(b"not a workbook");
        let response = ConversionResponse::from_result(convert_xls_base64(None, Some(&payload)));
        let json = serde_json::to_value(&response).unwrap();
        let error = json["error"].as_str().unwrap();
        assert!(error.starts_with("Failed to convert file: "), "{error}");
    }

    #[test]
    fn rewritten_workbook_decodes_to_the_same_cells() {
        let wb = Workbook::new(vec![
            SheetDescriptor::new("Cover", grid_from_strings([vec!["Vehicle auction"]])),
            SheetDescriptor::new(
                "Lots",
                vec![
                    vec![Cell::from("Contract No"), Cell::from("Reserve Price"), Cell::from("RC")],
                    vec![Cell::from("CN-1"), Cell::Int(350_000), Cell::Bool(true)],
                ],
            ),
        ]);

        let back = decode_excel(&workbook_to_xlsx(&wb).unwrap()).unwrap();
        assert_eq!(back.sheet_names(), vec!["Cover".to_string(), "Lots".to_string()]);
        let lots = &back.sheets[1].grid;
        assert_eq!(lots[1][0], Cell::from("CN-1"));
        assert_eq!(lots[1][1], Cell::Float(350_000.0));
        assert_eq!(lots[1][2], Cell::Bool(true));
    }

    #[test]
    fn empty_workbook_is_not_written() {
        assert!(matches!(workbook_to_xlsx(&Workbook::new(Vec::new())), Err(ImportError::EmptyWorkbook)));
    }
}
