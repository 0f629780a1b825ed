//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`import_property_auctions`] / [`import_vehicle_auctions`] (from
//! [`unified`]) which:
//!
//! - pick a decoder from the declared file name and decode the bytes into a [`crate::types::Workbook`]
//! - locate the header row, resolve its columns and normalize every data row
//! - optionally report success/failure/alerts to an [`ImportObserver`]
//!
//! The individual stages are public too:
//! - [`locate`] picks the sheet and header row
//! - [`columns`] resolves header spellings to canonical fields
//! - [`coerce`] turns cell text into typed values
//! - [`normalize`] turns data rows into records
//! - [`diagnostics`] describes how a run went
//!
//! With the `xlsx_writer` feature, `convert` rewrites legacy `.xls` uploads as `.xlsx`.

pub mod coerce;
pub mod columns;
#[cfg(feature = "xlsx_writer")]
pub mod convert;
pub mod csv;
pub mod diagnostics;
pub mod engine;
#[cfg(feature = "excel")]
pub mod excel;
pub mod locate;
pub mod normalize;
pub mod observability;
pub mod response;
pub mod unified;

pub use columns::{DuplicateHeaderPolicy, HeaderConflict, SynonymTable, resolve_columns, resolve_columns_with};
pub use diagnostics::{Diagnostics, DiagnosticsCollector, SheetStats};
pub use engine::parse_workbook;
pub use locate::{HeaderLocation, locate, locate_with};
pub use normalize::normalize_rows;
pub use observability::{
    CompositeObserver, FileObserver, ImportContext, ImportObserver, ImportSeverity, ImportStats, StdErrObserver,
    TracingObserver,
};
pub use response::{ImportFailure, ImportResponse, ImportSummary};
pub use unified::{
    FileFormat, ImportOptions, ImportRequest, decode_workbook, import_property_auctions, import_vehicle_auctions,
    import_workbook,
};
