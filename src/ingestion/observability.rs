use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{error, info, warn};

use crate::error::ImportError;

use super::unified::FileFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImportSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (the input was readable but unusable).
    Warning,
    /// Error-level event (the input could not be decoded or was rejected).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Context about an import attempt.
#[derive(Debug, Clone)]
pub struct ImportContext {
    /// Declared name of the uploaded file.
    pub file_name: String,
    /// Format inferred from the file name, when it could be inferred.
    pub format: Option<FileFormat>,
    /// Schema the rows were normalized into.
    pub schema: &'static str,
}

/// Counts reported on a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportStats {
    pub total_rows: usize,
    pub successful_rows: usize,
    pub skipped_rows: usize,
    pub row_errors: usize,
}

/// Observer interface for import outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait ImportObserver: Send + Sync {
    /// Called when an import succeeds (possibly with row-scoped errors).
    fn on_success(&self, _ctx: &ImportContext, _stats: ImportStats) {}

    /// Called when an import fails.
    fn on_failure(&self, _ctx: &ImportContext, _severity: ImportSeverity, _error: &ImportError) {}

    /// Called when an import failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ImportObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn ImportObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ImportObserver for CompositeObserver {
    fn on_success(&self, ctx: &ImportContext, stats: ImportStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs import events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ImportObserver for StdErrObserver {
    fn on_success(&self, ctx: &ImportContext, stats: ImportStats) {
        eprintln!(
            "[import][ok] schema={} format={:?} file={} total={} ok={} skipped={} errors={}",
            ctx.schema,
            ctx.format,
            ctx.file_name,
            stats.total_rows,
            stats.successful_rows,
            stats.skipped_rows,
            stats.row_errors
        );
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        eprintln!(
            "[import][{:?}] schema={} format={:?} file={} err={}",
            severity, ctx.schema, ctx.format, ctx.file_name, error
        );
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        eprintln!(
            "[ALERT][import][{:?}] schema={} format={:?} file={} err={}",
            severity, ctx.schema, ctx.format, ctx.file_name, error
        );
    }
}

/// Appends import events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl ImportObserver for FileObserver {
    fn on_success(&self, ctx: &ImportContext, stats: ImportStats) {
        self.append_line(&format!(
            "{} ok schema={} file={} total={} ok={} skipped={} errors={}",
            unix_ts(),
            ctx.schema,
            ctx.file_name,
            stats.total_rows,
            stats.successful_rows,
            stats.skipped_rows,
            stats.row_errors
        ));
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.append_line(&format!(
            "{} fail severity={:?} schema={} file={} err={}",
            unix_ts(),
            severity,
            ctx.schema,
            ctx.file_name,
            error
        ));
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} schema={} file={} err={}",
            unix_ts(),
            severity,
            ctx.schema,
            ctx.file_name,
            error
        ));
    }
}

/// Forwards import events to `tracing`.
///
/// The library never installs a subscriber; events go wherever the host application routes them.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl ImportObserver for TracingObserver {
    fn on_success(&self, ctx: &ImportContext, stats: ImportStats) {
        info!(
            schema = ctx.schema,
            file = %ctx.file_name,
            total_rows = stats.total_rows,
            successful_rows = stats.successful_rows,
            skipped_rows = stats.skipped_rows,
            row_errors = stats.row_errors,
            "import finished"
        );
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        warn!(schema = ctx.schema, file = %ctx.file_name, ?severity, %error, "import failed");
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        error!(schema = ctx.schema, file = %ctx.file_name, ?severity, %error, "import alert");
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
