use thiserror::Error;

/// Convenience result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Fatal error returned by import functions.
///
/// Any of these aborts the whole run; no partial data is returned alongside it. Failures that
/// only affect a single data row are reported as [`crate::types::RowError`] instead.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Spreadsheet decoding error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV decoding error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The request payload was not valid base64.
    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The request did not carry a file payload.
    #[error("missing input: {message}")]
    MissingInput { message: String },

    /// The declared file name does not map to a supported spreadsheet format.
    #[error("unsupported file type '{file_name}': expected .xls, .xlsx, .xlsm, .xlsb, .ods or .csv")]
    UnsupportedFileType { file_name: String },

    /// The decoded workbook contains no sheets.
    #[error("workbook has no sheets")]
    EmptyWorkbook,

    /// The selected sheet cannot hold a header row plus at least one data row.
    #[error("sheet '{sheet}' has {rows} row(s); at least 2 are required")]
    TooFewRows { sheet: String, rows: usize },

    /// The decoder reported structural corruption of the input.
    #[error("invalid format: {message}")]
    InvalidFormat { message: String },

    /// A conversion request named something other than a legacy `.xls` file.
    #[error("File must be a .xls file")]
    NotXlsFile { file_name: String },

    #[cfg(feature = "xlsx_writer")]
    /// Writing the converted `.xlsx` failed.
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// The record sink rejected a batch.
    #[error("sink error: {0}")]
    Sink(#[from] crate::store::SinkError),

    /// The worker pool for batch imports could not be built.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ImportError {
    /// The single message surfaced to callers for a failed run.
    ///
    /// Decoder failures whose text points at a broken or unrecognised container are reported
    /// as an invalid-format message; everything else is passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            ImportError::InvalidFormat { .. } => invalid_format_message(),
            ImportError::MissingInput { message } => message.clone(),
            #[cfg(feature = "excel")]
            ImportError::Excel(err) => classify_decode_message(&err.to_string()),
            ImportError::Csv(err) => classify_decode_message(&err.to_string()),
            other => other.to_string(),
        }
    }
}

const STRUCTURAL_HINTS: &[&str] = &[
    "zip",
    "cfb",
    "signature",
    "unsupported",
    "unrecognized",
    "unrecognised",
    "corrupt",
    "central directory",
    "invalid file",
    "cannot detect",
    "end of file",
];

fn invalid_format_message() -> String {
    "Invalid file format. Please upload a valid .xls, .xlsx or .csv file.".to_string()
}

pub(crate) fn classify_decode_message(raw: &str) -> String {
    let lower = raw.to_ascii_lowercase();
    if STRUCTURAL_HINTS.iter().any(|hint| lower.contains(hint)) {
        invalid_format_message()
    } else {
        raw.to_string()
    }
}

/// Failure while extracting one field from one data row.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CellError {
    /// The decoder handed over an error value (`#REF!`, `#VALUE!`, ...) for this cell.
    #[error("column '{field}' holds spreadsheet error {value}")]
    ErrorValue { field: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_messages_are_reported_as_invalid_format() {
        let msg = classify_decode_message("Zip error: invalid Zip archive: Could not find central directory end");
        assert!(msg.starts_with("Invalid file format"));
    }

    #[test]
    fn other_decode_messages_pass_through() {
        assert_eq!(classify_decode_message("sheet 'X' not found"), "sheet 'X' not found");
    }

    #[test]
    fn too_few_rows_names_the_sheet() {
        let err = ImportError::TooFewRows {
            sheet: "Sheet1".to_string(),
            rows: 1,
        };
        assert_eq!(err.user_message(), "sheet 'Sheet1' has 1 row(s); at least 2 are required");
    }
}
