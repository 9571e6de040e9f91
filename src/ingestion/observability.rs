use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{LoadError, LoadFailureKind};

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// The chart cannot be drawn, but nothing is wrong with the machine (missing/empty input).
    Warning,
    /// The input exists but is unusable.
    Error,
    /// Infrastructure failure (unexpected I/O errors).
    Critical,
}

impl Severity {
    /// Severity assigned to a failed load.
    pub fn for_load_error(error: &LoadError) -> Self {
        match error.kind() {
            LoadFailureKind::NotFound | LoadFailureKind::NotAFile | LoadFailureKind::Empty => {
                Severity::Warning
            }
            LoadFailureKind::ParseError | LoadFailureKind::PermissionDenied => Severity::Error,
            LoadFailureKind::Unexpected => Severity::Critical,
        }
    }
}

/// Context about a load attempt.
#[derive(Debug, Clone)]
pub struct LoadContext {
    /// The path that was loaded.
    pub path: PathBuf,
}

/// Stats reported on a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    /// Number of data rows.
    pub rows: usize,
    /// Number of columns.
    pub columns: usize,
}

/// Observer interface for loads and chart generation.
///
/// Implementors can record metrics, logs, or trigger alerts. All methods default to no-ops.
pub trait PipelineObserver: Send + Sync {
    /// Called when a table was loaded.
    fn on_loaded(&self, _ctx: &LoadContext, _stats: LoadStats) {}

    /// Called when a load fails.
    fn on_failure(&self, _ctx: &LoadContext, _severity: Severity, _error: &LoadError) {}

    /// Called when a load failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &LoadContext, severity: Severity, error: &LoadError) {
        self.on_failure(ctx, severity, error)
    }

    /// Called after a chart image was written.
    fn on_chart_written(&self, _chart: &str, _output: &Path) {}

    /// Called when a chart is skipped; `reason` is a human-readable cause.
    fn on_chart_skipped(&self, _chart: &str, _reason: &str) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
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

impl PipelineObserver for CompositeObserver {
    fn on_loaded(&self, ctx: &LoadContext, stats: LoadStats) {
        for o in &self.observers {
            o.on_loaded(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &LoadContext, severity: Severity, error: &LoadError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &LoadContext, severity: Severity, error: &LoadError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }

    fn on_chart_written(&self, chart: &str, output: &Path) {
        for o in &self.observers {
            o.on_chart_written(chart, output);
        }
    }

    fn on_chart_skipped(&self, chart: &str, reason: &str) {
        for o in &self.observers {
            o.on_chart_skipped(chart, reason);
        }
    }
}

/// Logs events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl PipelineObserver for StdErrObserver {
    fn on_loaded(&self, ctx: &LoadContext, stats: LoadStats) {
        eprintln!(
            "[load][ok] path={} rows={} columns={}",
            ctx.path.display(),
            stats.rows,
            stats.columns
        );
    }

    fn on_failure(&self, ctx: &LoadContext, severity: Severity, error: &LoadError) {
        eprintln!(
            "[load][{:?}] path={} kind={:?} err={}",
            severity,
            ctx.path.display(),
            error.kind(),
            error
        );
    }

    fn on_alert(&self, ctx: &LoadContext, severity: Severity, error: &LoadError) {
        eprintln!(
            "[ALERT][load][{:?}] path={} kind={:?} err={}",
            severity,
            ctx.path.display(),
            error.kind(),
            error
        );
    }

    fn on_chart_written(&self, chart: &str, output: &Path) {
        eprintln!("[chart][ok] chart={chart} output={}", output.display());
    }

    fn on_chart_skipped(&self, chart: &str, reason: &str) {
        eprintln!("[chart][skip] chart={chart} reason={reason}");
    }
}

/// Appends events to a local log file.
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

impl PipelineObserver for FileObserver {
    fn on_loaded(&self, ctx: &LoadContext, stats: LoadStats) {
        self.append_line(&format!(
            "{} ok path={} rows={} columns={}",
            unix_ts(),
            ctx.path.display(),
            stats.rows,
            stats.columns
        ));
    }

    fn on_failure(&self, ctx: &LoadContext, severity: Severity, error: &LoadError) {
        self.append_line(&format!(
            "{} fail severity={:?} kind={:?} path={} err={}",
            unix_ts(),
            severity,
            error.kind(),
            ctx.path.display(),
            error
        ));
    }

    fn on_alert(&self, ctx: &LoadContext, severity: Severity, error: &LoadError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} kind={:?} path={} err={}",
            unix_ts(),
            severity,
            error.kind(),
            ctx.path.display(),
            error
        ));
    }

    fn on_chart_written(&self, chart: &str, output: &Path) {
        self.append_line(&format!(
            "{} chart chart={chart} output={}",
            unix_ts(),
            output.display()
        ));
    }

    fn on_chart_skipped(&self, chart: &str, reason: &str) {
        self.append_line(&format!("{} skip chart={chart} reason={reason}", unix_ts()));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
