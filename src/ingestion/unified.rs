//! Unified import entrypoint.
//!
//! Most callers should use [`import_property_auctions`] or [`import_vehicle_auctions`], which
//! decode an [`ImportRequest`] and normalize it into typed records.
//!
//! - The decoder is chosen from the declared file name's extension.
//! - If an [`super::observability::ImportObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::{ImportError, ImportResult};
use crate::schema::{AuctionSchema, PropertyAuction, VehicleAuction};
use crate::types::{ParseResult, Workbook};

use super::columns::DuplicateHeaderPolicy;
use super::csv;
use super::engine::parse_workbook;
use super::locate::{DEFAULT_HEADER_SCAN_ROWS, DEFAULT_MIN_KEYWORD_HITS};
use super::observability::{ImportContext, ImportObserver, ImportSeverity, ImportStats};

/// File name assumed when a request does not name its file.
pub const DEFAULT_FILE_NAME: &str = "file.xlsx";

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma-separated values.
    Csv,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl FileFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Infer the format from a declared file name.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        Path::new(file_name)
            .extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
    }
}

/// Options controlling import behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct ImportOptions {
    /// How many leading rows are scanned for the header.
    pub header_scan_rows: usize,
    /// Keyword matches a row needs to be taken as the header.
    pub min_header_keyword_hits: usize,
    /// Which column wins when two headers resolve to the same field.
    pub duplicate_headers: DuplicateHeaderPolicy,
    /// Cells shown in the preview of a row skipped for missing required fields.
    pub skip_sample_cells: usize,
    /// Characters kept per previewed cell.
    pub sample_cell_chars: usize,
    /// Leading data rows previewed in diagnostics.
    pub sample_rows: usize,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn ImportObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ImportSeverity,
}

impl fmt::Debug for ImportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportOptions")
            .field("header_scan_rows", &self.header_scan_rows)
            .field("min_header_keyword_hits", &self.min_header_keyword_hits)
            .field("duplicate_headers", &self.duplicate_headers)
            .field("skip_sample_cells", &self.skip_sample_cells)
            .field("sample_cell_chars", &self.sample_cell_chars)
            .field("sample_rows", &self.sample_rows)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            header_scan_rows: DEFAULT_HEADER_SCAN_ROWS,
            min_header_keyword_hits: DEFAULT_MIN_KEYWORD_HITS,
            duplicate_headers: DuplicateHeaderPolicy::default(),
            skip_sample_cells: 5,
            sample_cell_chars: 50,
            sample_rows: 3,
            observer: None,
            alert_at_or_above: ImportSeverity::Critical,
        }
    }
}

/// An uploaded file: its declared name and raw bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ImportRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportRequest")
            .field("file_name", &self.file_name)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

impl ImportRequest {
    /// Build a request; a blank file name falls back to [`DEFAULT_FILE_NAME`].
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let file_name = if file_name.trim().is_empty() {
            DEFAULT_FILE_NAME.to_string()
        } else {
            file_name.trim().to_string()
        };
        Self { file_name, bytes }
    }

    /// Build a request from a base64 payload.
    ///
    /// A missing or blank payload is [`ImportError::MissingInput`].
    pub fn from_base64(file_name: Option<&str>, file_base64: Option<&str>) -> ImportResult<Self> {
        let payload = file_base64
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ImportError::MissingInput {
                message: "Missing fileBase64 parameter".to_string(),
            })?;
        let bytes = STANDARD.decode(payload)?;
        Ok(Self::new(file_name.unwrap_or_default(), bytes))
    }

    /// Read a request from a local file.
    pub fn from_path(path: impl AsRef<Path>) -> ImportResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        Ok(Self::new(file_name, bytes))
    }

    /// Format inferred from [`Self::file_name`].
    pub fn format(&self) -> Option<FileFormat> {
        FileFormat::from_file_name(&self.file_name)
    }
}

/// Decode a request into a [`Workbook`] using the decoder its file name selects.
pub fn decode_workbook(request: &ImportRequest) -> ImportResult<Workbook> {
    match request.format() {
        Some(FileFormat::Csv) => csv::decode_csv(&request.bytes, &csv::sheet_name_for(&request.file_name)),
        Some(FileFormat::Excel) => decode_excel_dispatch(&request.bytes),
        None => Err(ImportError::UnsupportedFileType {
            file_name: request.file_name.clone(),
        }),
    }
}

fn decode_excel_dispatch(bytes: &[u8]) -> ImportResult<Workbook> {
    #[cfg(feature = "excel")]
    {
        super::excel::decode_excel(bytes)
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = bytes;
        Err(ImportError::InvalidFormat {
            message: "excel decoding not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}

/// Decode and normalize `request` into records of schema `S`.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row count stats
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use auction_ingest::ingestion::{import_workbook, ImportOptions, ImportRequest};
/// use auction_ingest::schema::VehicleAuction;
///
/// # fn main() -> Result<(), auction_ingest::ImportError> {
/// let request = ImportRequest::from_path("repossessed_vehicles.xlsx")?;
/// let result = import_workbook::<VehicleAuction>(&request, &ImportOptions::default())?;
/// println!("{} of {} rows imported", result.successful_rows(), result.total_rows);
/// # Ok(())
/// # }
/// ```
pub fn import_workbook<S: AuctionSchema>(
    request: &ImportRequest,
    options: &ImportOptions,
) -> ImportResult<ParseResult<S::Record>> {
    let ctx = ImportContext {
        file_name: request.file_name.clone(),
        format: request.format(),
        schema: S::NAME,
    };

    let result = decode_workbook(request).and_then(|wb| parse_workbook::<S>(&wb, options));

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(parsed) => obs.on_success(
                &ctx,
                ImportStats {
                    total_rows: parsed.total_rows,
                    successful_rows: parsed.successful_rows(),
                    skipped_rows: parsed.skipped().len(),
                    row_errors: parsed.row_errors.len(),
                },
            ),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

/// Import property auction listings.
pub fn import_property_auctions(
    request: &ImportRequest,
    options: &ImportOptions,
) -> ImportResult<ParseResult<<PropertyAuction as AuctionSchema>::Record>> {
    import_workbook::<PropertyAuction>(request, options)
}

/// Import vehicle auction listings.
pub fn import_vehicle_auctions(
    request: &ImportRequest,
    options: &ImportOptions,
) -> ImportResult<ParseResult<<VehicleAuction as AuctionSchema>::Record>> {
    import_workbook::<VehicleAuction>(request, options)
}

/// Severity an observer is given for a failed import.
pub fn severity_for_error(e: &ImportError) -> ImportSeverity {
    match e {
        ImportError::Io(_) => ImportSeverity::Critical,
        ImportError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => ImportSeverity::Critical,
            _ => ImportSeverity::Error,
        },
        #[cfg(feature = "excel")]
        ImportError::Excel(calamine::Error::Io(_)) => ImportSeverity::Critical,
        #[cfg(feature = "excel")]
        ImportError::Excel(_) => ImportSeverity::Error,
        ImportError::EmptyWorkbook | ImportError::TooFewRows { .. } => ImportSeverity::Warning,
        ImportError::Base64(_)
        | ImportError::MissingInput { .. }
        | ImportError::UnsupportedFileType { .. }
        | ImportError::InvalidFormat { .. }
        | ImportError::NotXlsFile { .. } => ImportSeverity::Error,
        #[cfg(feature = "xlsx_writer")]
        ImportError::Xlsx(_) => ImportSeverity::Error,
        ImportError::Sink(_) | ImportError::ThreadPool(_) => ImportSeverity::Critical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_follow_the_extension() {
        assert_eq!(FileFormat::from_file_name("Lots.XLS"), Some(FileFormat::Excel));
        assert_eq!(FileFormat::from_file_name("lots.csv"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_file_name("lots.pdf"), None);
        assert_eq!(FileFormat::from_file_name("lots"), None);
    }

    #[test]
    fn blank_payload_is_missing_input() {
        for payload in [None, Some(""), Some("   ")] {
            let err = ImportRequest::from_base64(Some("a.xlsx"), payload).unwrap_err();
            assert_eq!(err.user_message(), "Missing fileBase64 parameter");
        }
    }

    #[test]
    fn base64_requests_default_their_name() {
        let req = ImportRequest::from_base64(None, Some("YSxiCg==")).unwrap();
        assert_eq!(req.file_name, DEFAULT_FILE_NAME);
        assert_eq!(req.bytes, b"a,b\n");
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let err = ImportRequest::from_base64(Some("a.csv"), Some("***")).unwrap_err();
        assert!(matches!(err, ImportError::Base64(_)));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let req = ImportRequest::new("notice.pdf", vec![1, 2, 3]);
        let err = decode_workbook(&req).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFileType { .. }));
        assert_eq!(severity_for_error(&err), ImportSeverity::Error);
    }

    #[test]
    fn options_debug_hides_the_observer() {
        let text = format!("{:?}", ImportOptions::default());
        assert!(text.contains("observer_set: false"));
    }
}
