//! Persistence seam.
//!
//! The engine never writes anywhere on its own. Callers that want records persisted construct
//! a [`RecordSink`] and hand it to [`import_and_store`]; records arrive as JSON documents in
//! batches, tagged with the schema's collection name.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::error::ImportResult;
use crate::ingestion::unified::{ImportOptions, ImportRequest, import_workbook};
use crate::schema::AuctionSchema;
use crate::types::ParseResult;

/// Largest batch handed to a sink in one call.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Failure reported by a [`RecordSink`].
#[derive(Debug, Error)]
pub enum SinkError {
    /// A record could not be rendered as a document.
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The backing store refused the batch.
    #[error("collection '{collection}' rejected batch: {message}")]
    Rejected { collection: String, message: String },
}

/// Destination for normalized records.
pub trait RecordSink {
    /// Persist one batch into `collection`, returning how many documents were written.
    fn write_batch(&mut self, collection: &str, documents: &[serde_json::Value]) -> Result<usize, SinkError>;
}

/// In-memory sink keyed by collection name.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    collections: BTreeMap<String, Vec<serde_json::Value>>,
    batches: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents stored in `collection`, in write order.
    pub fn documents(&self, collection: &str) -> &[serde_json::Value] {
        self.collections.get(collection).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of `write_batch` calls received.
    pub fn batches(&self) -> usize {
        self.batches
    }
}

impl RecordSink for MemorySink {
    fn write_batch(&mut self, collection: &str, documents: &[serde_json::Value]) -> Result<usize, SinkError> {
        self.batches += 1;
        self.collections
            .entry(collection.to_string())
            .or_default()
            .extend_from_slice(documents);
        Ok(documents.len())
    }
}

/// Write `records` to `sink` in batches of at most `batch_size` (a zero size means one batch).
pub fn store_records<R: Serialize>(
    sink: &mut dyn RecordSink,
    collection: &str,
    records: &[R],
    batch_size: usize,
) -> Result<usize, SinkError> {
    let chunk = if batch_size == 0 { records.len().max(1) } else { batch_size };
    let mut written = 0;
    for batch in records.chunks(chunk) {
        let documents = batch
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        written += sink.write_batch(collection, &documents)?;
    }
    debug!(collection, written, "stored records");
    Ok(written)
}

/// An import whose records were handed to a sink.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredImport<R> {
    pub result: ParseResult<R>,
    /// Documents the sink reported as written.
    pub stored: usize,
}

/// Import `request` with schema `S`, then write its records to `sink` under `S::COLLECTION`.
///
/// Nothing is written when the import fails.
pub fn import_and_store<S: AuctionSchema>(
    request: &ImportRequest,
    options: &ImportOptions,
    sink: &mut dyn RecordSink,
) -> ImportResult<StoredImport<S::Record>> {
    let result = import_workbook::<S>(request, options)?;
    let stored = store_records(sink, S::COLLECTION, &result.records, DEFAULT_BATCH_SIZE)?;
    Ok(StoredImport { result, stored })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RejectingSink;

    impl RecordSink for RejectingSink {
        fn write_batch(&mut self, collection: &str, _documents: &[serde_json::Value]) -> Result<usize, SinkError> {
            Err(SinkError::Rejected {
                collection: collection.to_string(),
                message: "quota exceeded".to_string(),
            })
        }
    }

    #[test]
    fn records_are_written_in_batches() {
        let mut sink = MemorySink::new();
        let records: Vec<u32> = (0..7).collect();
        let written = store_records(&mut sink, "lots", &records, 3).unwrap();

        assert_eq!(written, 7);
        assert_eq!(sink.batches(), 3);
        assert_eq!(sink.documents("lots")[6], serde_json::json!(6));
        assert!(sink.documents("other").is_empty());
    }

    #[test]
    fn sink_rejection_is_propagated() {
        let err = store_records(&mut RejectingSink, "lots", &[1u8], DEFAULT_BATCH_SIZE).unwrap_err();
        assert_eq!(err.to_string(), "collection 'lots' rejected batch: quota exceeded");
    }

    #[test]
    fn nothing_to_store_means_no_batches() {
        let mut sink = MemorySink::new();
        let records: Vec<u32> = Vec::new();
        assert_eq!(store_records(&mut sink, "lots", &records, 0).unwrap(), 0);
        assert_eq!(sink.batches(), 0);
    }
}
