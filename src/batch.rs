//! Batch chart generation.
//!
//! [`run_batch`] runs one job per configured [`ChartKind`]: load the chart's CSV, aggregate it,
//! build the series, render the image. Jobs are independent and run on a rayon pool. A job that
//! fails (missing file, bad table, render error) is recorded as skipped; it never aborts the
//! batch.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use walkdir::WalkDir;

use crate::charts::{build_chart, render_chart, ChartKind, ChartStyle, SchemaVersion};
use crate::error::{ChartError, ConfigError, LoadError, LoadFailureKind, ProcessingError};
use crate::ingestion::{load_from_dir, LoadOptions, PipelineObserver, Severity};
use crate::processing::{aggregate, filter_eq};
use crate::types::{DataSet, Value};

/// Input and output directories of one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directories {
    /// Where the CSV files are read from.
    pub data_dir: PathBuf,
    /// Where chart images are written.
    pub plots_dir: PathBuf,
}

impl Directories {
    /// `root/data/chrono[/folder]` and `root/data/plots[/folder]`.
    pub fn resolve(root: &Path, folder: Option<&str>) -> Self {
        let mut data_dir = root.join("data").join("chrono");
        let mut plots_dir = root.join("data").join("plots");
        if let Some(folder) = folder.filter(|f| !f.is_empty()) {
            data_dir.push(folder);
            plots_dir.push(folder);
        }
        Self {
            data_dir,
            plots_dir,
        }
    }
}

/// Batch configuration.
///
/// Every field has a default, so a JSON config only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Project root containing `data/chrono` and `data/plots`.
    pub root: PathBuf,
    /// Optional sub-folder (e.g. a compiler optimisation level such as `O3`).
    pub folder: Option<String>,
    /// Overrides the resolved data directory.
    pub data_dir: Option<PathBuf>,
    /// Overrides the resolved plots directory.
    pub plots_dir: Option<PathBuf>,
    /// Charts to produce, in report order.
    pub charts: Vec<ChartKind>,
    /// Permutation column naming; `None` detects it per table.
    pub schema_version: Option<SchemaVersion>,
    /// Keep only rows with this `THREADS` value in tables that have that column.
    pub threads_filter: Option<i64>,
    /// Worker threads; `None` uses the available parallelism.
    pub workers: Option<usize>,
    pub style: ChartStyle,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            folder: None,
            data_dir: None,
            plots_dir: None,
            charts: ChartKind::ALL.to_vec(),
            schema_version: None,
            threads_filter: None,
            workers: None,
            style: ChartStyle::default(),
        }
    }
}

impl BatchConfig {
    /// Read a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Effective directories: resolved from `root`/`folder`, then overridden.
    pub fn directories(&self) -> Directories {
        let mut dirs = Directories::resolve(&self.root, self.folder.as_deref());
        if let Some(d) = &self.data_dir {
            dirs.data_dir = d.clone();
        }
        if let Some(d) = &self.plots_dir {
            dirs.plots_dir = d.clone();
        }
        dirs
    }
}

/// A chart image that was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProducedChart {
    pub chart: ChartKind,
    pub output: PathBuf,
}

/// A chart that was not produced, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedChart {
    pub chart: ChartKind,
    pub reason: String,
    /// Set when the input table could not be loaded.
    pub load_failure: Option<LoadFailureKind>,
}

/// Outcome of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub produced: Vec<ProducedChart>,
    pub skipped: Vec<SkippedChart>,
}

impl BatchReport {
    /// Append another report (e.g. from the next folder).
    pub fn extend(&mut self, other: BatchReport) {
        self.produced.extend(other.produced);
        self.skipped.extend(other.skipped);
    }

    /// Operator-facing summary lines.
    pub fn summary(&self) -> String {
        let mut out = format!("Plots created: {}", self.produced.len());
        if !self.skipped.is_empty() {
            out.push_str(&format!("\nPlots skipped: {}", self.skipped.len()));
        }
        out
    }
}

#[derive(Debug, Error)]
enum JobError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Chart(#[from] ChartError),
}

impl From<ProcessingError> for JobError {
    fn from(e: ProcessingError) -> Self {
        JobError::Chart(e.into())
    }
}

/// Run every chart job of `config`.
///
/// Only a thread pool that cannot be built fails the whole batch; individual chart failures end
/// up in [`BatchReport::skipped`] and are reported to `observer`.
pub fn run_batch(
    config: &BatchConfig,
    observer: Option<Arc<dyn PipelineObserver>>,
) -> Result<BatchReport, ConfigError> {
    let mut pool = ThreadPoolBuilder::new();
    if let Some(n) = config.workers {
        pool = pool.num_threads(n);
    }
    let pool = pool.build()?;

    let dirs = config.directories();
    let load_options = LoadOptions {
        observer: observer.clone(),
        alert_at_or_above: Severity::Critical,
        ..LoadOptions::default()
    };

    let outcomes: Vec<(ChartKind, Result<PathBuf, JobError>)> = pool.install(|| {
        config
            .charts
            .par_iter()
            .map(|&kind| (kind, run_job(kind, config, &dirs, &load_options)))
            .collect()
    });

    let mut report = BatchReport::default();
    for (kind, outcome) in outcomes {
        match outcome {
            Ok(output) => {
                if let Some(obs) = &observer {
                    obs.on_chart_written(kind.stem(), &output);
                }
                report.produced.push(ProducedChart {
                    chart: kind,
                    output,
                });
            }
            Err(e) => {
                let reason = e.to_string();
                if let Some(obs) = &observer {
                    obs.on_chart_skipped(kind.stem(), &reason);
                }
                report.skipped.push(SkippedChart {
                    chart: kind,
                    reason,
                    load_failure: match &e {
                        JobError::Load(le) => Some(le.kind()),
                        JobError::Chart(_) => None,
                    },
                });
            }
        }
    }
    Ok(report)
}

fn run_job(
    kind: ChartKind,
    config: &BatchConfig,
    dirs: &Directories,
    load_options: &LoadOptions,
) -> Result<PathBuf, JobError> {
    let table = load_from_dir(&dirs.data_dir, kind.file_name(), load_options)?;
    let table = apply_threads_filter(table, config.threads_filter)?;

    let version = config
        .schema_version
        .unwrap_or_else(|| SchemaVersion::detect(&table.schema));
    let def = kind.definition(version);
    let agg = aggregate(&table, &def.group_keys())?;
    let chart = build_chart(&def, &agg, config.style.error_bars)?;

    fs::create_dir_all(&dirs.plots_dir).map_err(ChartError::from)?;
    let output = dirs
        .plots_dir
        .join(format!("{}.{}", kind.stem(), config.style.format.extension()));
    render_chart(&chart, &config.style, &output)?;
    Ok(output)
}

fn apply_threads_filter(table: DataSet, threads: Option<i64>) -> Result<DataSet, JobError> {
    match threads {
        Some(n) if table.schema.contains("THREADS") => {
            Ok(filter_eq(&table, "THREADS", &Value::Int64(n))?)
        }
        _ => Ok(table),
    }
}

/// Sub-folders of `root/data/chrono`, sorted by name.
///
/// A missing data directory yields an empty list.
pub fn discover_folders(root: &Path) -> Vec<String> {
    let base = root.join("data").join("chrono");
    WalkDir::new(base)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_dir())
        .filter_map(|e| e.file_name().to_str().map(str::to_owned))
        .collect()
}
