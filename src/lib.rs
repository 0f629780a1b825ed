//! `auction-ingest` reads bank/NBFC auction spreadsheets and normalizes them into typed
//! property and vehicle auction records.
//!
//! Bank exports are not under the importer's control: the header row is not always the first
//! row, column names vary in casing and punctuation, columns go missing, and dates come in
//! several layouts. The engine copes with all of that:
//!
//! 1. the sheet with the most rows is selected and its header row is found by keyword matching
//! 2. header cells are resolved to canonical fields through a per-schema synonym table
//! 3. every row below the header is coerced into a record, skipped, or reported as a row error
//!
//! One malformed row never aborts an import; only an unreadable file, an empty workbook or a
//! sheet with fewer than two rows does.
//!
//! ## What you can import
//!
//! - **Excel/workbooks** (Cargo feature `excel`, on by default): `.xlsx`, `.xls`, `.xlsm`, `.xlsb`, `.ods`
//! - **CSV**: `.csv`
//!
//! With the `xlsx_writer` feature, legacy `.xls` uploads can also be rewritten as `.xlsx`
//! (`ingestion::convert`).
//!
//! ## Quick example
//!
//! ```rust
//! use auction_ingest::ingestion::{import_property_auctions, ImportOptions, ImportRequest};
//!
//! let csv = "Bank e-auction list\nEvent No,Event Type,Reserve Price:\nE1,Immovable,\"1,00,000\"\n";
//! let request = ImportRequest::new("lots.csv", csv.as_bytes().to_vec());
//!
//! let result = import_property_auctions(&request, &ImportOptions::default()).unwrap();
//! assert_eq!(result.total_rows, 1);
//! assert_eq!(result.records[0].event_no, "E1");
//! assert_eq!(result.records[0].reserve_price, Some(100000.0));
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: decoders, header location, column resolution, coercion, normalization
//! - [`schema`]: the property and vehicle auction schemas
//! - [`types`]: workbook, cell and result types
//! - [`store`]: the persistence seam ([`store::RecordSink`])
//! - [`execution`]: concurrent batch imports
//! - [`error`]: error types shared across the crate

pub mod error;
pub mod execution;
pub mod ingestion;
pub mod schema;
pub mod store;
pub mod types;

pub use error::{CellError, ImportError, ImportResult};
pub use ingestion::{ImportOptions, ImportRequest, ImportResponse};
pub use schema::{AuctionSchema, DomainRecord, PropertyAuction, PropertyAuctionRecord, VehicleAuction, VehicleAuctionRecord};
pub use types::{ParseResult, Workbook};
