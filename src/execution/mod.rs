//! Batch dispatch of independent imports.
//!
//! Each import is single-threaded and shares nothing but the read-only schema constants, so a
//! batch simply runs one import per request on a dedicated `rayon` pool. Results come back in
//! request order regardless of completion order.

mod observer;

use std::sync::Arc;
use std::time::Instant;

use rayon::ThreadPool;
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

use crate::error::ImportResult;
use crate::ingestion::unified::{ImportOptions, ImportRequest, import_workbook};
use crate::schema::AuctionSchema;
use crate::types::ParseResult;

pub use observer::{BatchEvent, BatchMetrics, BatchMetricsSnapshot, BatchObserver, RequestOutcome, StdErrBatchObserver};

/// Configuration for the [`BatchImporter`].
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Number of worker threads.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
}

/// Runs many imports concurrently.
pub struct BatchImporter {
    pool: ThreadPool,
    observer: Option<Arc<dyn BatchObserver>>,
    metrics: Arc<BatchMetrics>,
}

impl BatchImporter {
    /// Create an importer with its own thread pool.
    ///
    /// A `num_threads` of `Some(0)` is treated as one thread.
    pub fn new(opts: BatchOptions) -> ImportResult<Self> {
        let n_threads = opts
            .num_threads
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
            .max(1);

        let pool = ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .thread_name(|i| format!("auction-import-{i}"))
            .build()?;

        Ok(Self {
            pool,
            observer: None,
            metrics: Arc::new(BatchMetrics::new()),
        })
    }

    /// Attach an observer for batch events.
    pub fn with_observer(mut self, observer: Arc<dyn BatchObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to real-time batch metrics.
    pub fn metrics(&self) -> Arc<BatchMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Import every request with schema `S`; `results[i]` belongs to `requests[i]`.
    ///
    /// The per-import observer in `options` is still called once per request.
    pub fn import_all<S: AuctionSchema>(
        &self,
        requests: &[ImportRequest],
        options: &ImportOptions,
    ) -> Vec<ImportResult<ParseResult<S::Record>>> {
        let start = Instant::now();
        self.metrics.begin_run();
        self.emit(BatchEvent::RunStarted {
            requests: requests.len(),
        });

        let results = self.pool.install(|| {
            requests
                .par_iter()
                .enumerate()
                .map(|(index, request)| self.run_one::<S>(index, request, options))
                .collect::<Vec<_>>()
        });

        self.metrics.end_run(start.elapsed());
        self.emit(BatchEvent::RunFinished {
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });
        results
    }

    fn run_one<S: AuctionSchema>(
        &self,
        index: usize,
        request: &ImportRequest,
        options: &ImportOptions,
    ) -> ImportResult<ParseResult<S::Record>> {
        self.metrics.on_request_start();
        self.emit(BatchEvent::RequestStarted {
            index,
            file_name: request.file_name.clone(),
        });

        let result = import_workbook::<S>(request, options);

        let outcome = match &result {
            Ok(parsed) => RequestOutcome::Imported {
                records: parsed.successful_rows(),
                row_errors: parsed.row_errors.len(),
            },
            Err(err) => RequestOutcome::Failed {
                message: err.user_message(),
            },
        };
        self.metrics.on_request_end(&outcome);
        self.emit(BatchEvent::RequestFinished {
            index,
            file_name: request.file_name.clone(),
            outcome,
        });
        result
    }

    fn emit(&self, event: BatchEvent) {
        if let Some(o) = &self.observer {
            o.on_event(&event);
        }
    }
}
