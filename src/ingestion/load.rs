//! Path-based loading entrypoint.
//!
//! [`load`] runs a fixed chain of checks and stops at the first one that fails:
//!
//! 1. the path exists ([`LoadError::NotFound`])
//! 2. it is a regular file ([`LoadError::NotAFile`])
//! 3. it is not zero bytes ([`LoadError::Empty`])
//! 4. it parses as CSV with a header row ([`LoadError::ParseError`])
//! 5. it has at least one data row ([`LoadError::Empty`])
//!
//! Failures are returned, never panicked on. If an observer is configured it sees every outcome.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::error::{LoadError, LoadResult};
use crate::types::{DataSet, Schema};

use super::csv::{read_csv_from_reader, reader_builder};
use super::observability::{LoadContext, LoadStats, PipelineObserver, Severity};

/// Options controlling [`load`].
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct LoadOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// If set, parse against this schema instead of inferring column types.
    pub schema: Option<Schema>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn PipelineObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("delimiter", &(self.delimiter as char))
            .field("schema", &self.schema)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            schema: None,
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

/// Load a CSV table from `path`.
///
/// # Examples
///
/// ```no_run
/// use matmul_plots::ingestion::{load, LoadOptions};
/// use matmul_plots::LoadFailureKind;
///
/// match load("data/chrono/serial_permutations.csv", &LoadOptions::default()) {
///     Ok(table) => println!("rows={}", table.row_count()),
///     Err(e) if e.kind() == LoadFailureKind::NotFound => eprintln!("skipping: {e}"),
///     Err(e) => eprintln!("error: {e}"),
/// }
/// ```
pub fn load(path: impl AsRef<Path>, options: &LoadOptions) -> LoadResult<DataSet> {
    let path = path.as_ref();
    let result = load_checked(path, options);

    if let Some(obs) = options.observer.as_ref() {
        let ctx = LoadContext {
            path: path.to_path_buf(),
        };
        match &result {
            Ok(ds) => obs.on_loaded(
                &ctx,
                LoadStats {
                    rows: ds.row_count(),
                    columns: ds.column_count(),
                },
            ),
            Err(e) => {
                let sev = Severity::for_load_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

/// Load `filename` from directory `dir`.
pub fn load_from_dir(
    dir: impl AsRef<Path>,
    filename: &str,
    options: &LoadOptions,
) -> LoadResult<DataSet> {
    load(dir.as_ref().join(filename), options)
}

fn load_checked(path: &Path, options: &LoadOptions) -> LoadResult<DataSet> {
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(LoadError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(LoadError::from_io(path, &e)),
    };
    if !meta.is_file() {
        return Err(LoadError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    if meta.len() == 0 {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
            detail: "zero bytes".to_string(),
        });
    }

    let mut rdr = reader_builder(options.delimiter)
        .from_path(path)
        .map_err(|e| LoadError::from_csv(path, &e))?;
    let ds = read_csv_from_reader(&mut rdr, options.schema.as_ref(), path)?;

    if ds.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
            detail: "header but no data rows".to_string(),
        });
    }
    Ok(ds)
}
