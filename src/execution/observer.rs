use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Events emitted by the [`super::BatchImporter`].
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    RunStarted { requests: usize },
    RequestStarted { index: usize, file_name: String },
    RequestFinished {
        index: usize,
        file_name: String,
        outcome: RequestOutcome,
    },
    RunFinished {
        elapsed: Duration,
        metrics: BatchMetricsSnapshot,
    },
}

/// How a single request in a batch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    Imported { records: usize, row_errors: usize },
    Failed { message: String },
}

/// Observer hook for batch events.
pub trait BatchObserver: Send + Sync {
    fn on_event(&self, event: &BatchEvent);
}

/// A simple stderr logger for batch events.
#[derive(Debug, Default)]
pub struct StdErrBatchObserver;

impl BatchObserver for StdErrBatchObserver {
    fn on_event(&self, event: &BatchEvent) {
        eprintln!("{event:?}");
    }
}

/// Real-time counters for a batch run.
///
/// The importer updates these while requests run; callers can snapshot them at any time.
#[derive(Debug, Default)]
pub struct BatchMetrics {
    run_id: AtomicU64,
    elapsed_ns: AtomicU64,

    requests_started: AtomicU64,
    requests_imported: AtomicU64,
    requests_failed: AtomicU64,
    records: AtomicU64,
    row_errors: AtomicU64,

    active_requests: AtomicUsize,
    max_active_requests: AtomicUsize,
}

impl BatchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_run(&self) {
        let _ = self.run_id.fetch_add(1, Ordering::SeqCst);
        self.elapsed_ns.store(0, Ordering::SeqCst);
        self.requests_started.store(0, Ordering::SeqCst);
        self.requests_imported.store(0, Ordering::SeqCst);
        self.requests_failed.store(0, Ordering::SeqCst);
        self.records.store(0, Ordering::SeqCst);
        self.row_errors.store(0, Ordering::SeqCst);
        self.active_requests.store(0, Ordering::SeqCst);
        self.max_active_requests.store(0, Ordering::SeqCst);
    }

    pub fn end_run(&self, elapsed: Duration) {
        self.elapsed_ns
            .store(elapsed.as_nanos().min(u64::MAX as u128) as u64, Ordering::SeqCst);
    }

    pub fn on_request_start(&self) {
        let _ = self.requests_started.fetch_add(1, Ordering::SeqCst);
        let now = self.active_requests.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.max_active_requests.fetch_max(now, Ordering::SeqCst);
    }

    pub fn on_request_end(&self, outcome: &RequestOutcome) {
        match outcome {
            RequestOutcome::Imported { records, row_errors } => {
                let _ = self.requests_imported.fetch_add(1, Ordering::SeqCst);
                let _ = self.records.fetch_add(*records as u64, Ordering::SeqCst);
                let _ = self.row_errors.fetch_add(*row_errors as u64, Ordering::SeqCst);
            }
            RequestOutcome::Failed { .. } => {
                let _ = self.requests_failed.fetch_add(1, Ordering::SeqCst);
            }
        }
        let _ = self.active_requests.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> BatchMetricsSnapshot {
        let elapsed_ns = self.elapsed_ns.load(Ordering::SeqCst);
        BatchMetricsSnapshot {
            run_id: self.run_id.load(Ordering::SeqCst),
            elapsed: (elapsed_ns > 0).then(|| Duration::from_nanos(elapsed_ns)),
            requests_started: self.requests_started.load(Ordering::SeqCst),
            requests_imported: self.requests_imported.load(Ordering::SeqCst),
            requests_failed: self.requests_failed.load(Ordering::SeqCst),
            records: self.records.load(Ordering::SeqCst),
            row_errors: self.row_errors.load(Ordering::SeqCst),
            max_active_requests: self.max_active_requests.load(Ordering::SeqCst),
        }
    }
}

/// Immutable snapshot of [`BatchMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchMetricsSnapshot {
    pub run_id: u64,
    pub elapsed: Option<Duration>,
    pub requests_started: u64,
    pub requests_imported: u64,
    pub requests_failed: u64,
    pub records: u64,
    pub row_errors: u64,
    pub max_active_requests: usize,
}

impl fmt::Display for BatchMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run_id={}, requests={}/{} (failed={}), records={}, row_errors={}, max_active={}, elapsed={:?}",
            self.run_id,
            self.requests_imported,
            self.requests_started,
            self.requests_failed,
            self.records,
            self.row_errors,
            self.max_active_requests,
            self.elapsed
        )
    }
}
