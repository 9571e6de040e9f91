use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// Convenience result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Convenience result type for in-memory processing.
pub type ProcessingResult<T> = Result<T, ProcessingError>;

/// Why a table could not be loaded.
///
/// Every variant carries the path that was being loaded. A load failure is an expected outcome:
/// callers skip the chart that needed the table and carry on with the batch.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Nothing exists at the path.
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The path exists but is not a regular file (directory, socket, ...).
    #[error("path is not a file: {}", path.display())]
    NotAFile { path: PathBuf },

    /// Zero-byte file, or a file with a header but no data rows.
    #[error("file is empty or has no data: {} ({detail})", path.display())]
    Empty { path: PathBuf, detail: String },

    /// The content is not a well-formed table.
    #[error("failed to parse {}: {message}", path.display())]
    ParseError { path: PathBuf, message: String },

    /// The OS refused to let us read the file.
    #[error("permission denied when reading {}", path.display())]
    PermissionDenied { path: PathBuf },

    /// Any other I/O failure.
    #[error("unexpected error reading {}: {message}", path.display())]
    Unexpected { path: PathBuf, message: String },
}

/// Fieldless discriminant of a [`LoadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LoadFailureKind {
    NotFound,
    NotAFile,
    Empty,
    ParseError,
    PermissionDenied,
    Unexpected,
}

impl LoadError {
    /// The kind of failure, without its payload.
    pub fn kind(&self) -> LoadFailureKind {
        match self {
            LoadError::NotFound { .. } => LoadFailureKind::NotFound,
            LoadError::NotAFile { .. } => LoadFailureKind::NotAFile,
            LoadError::Empty { .. } => LoadFailureKind::Empty,
            LoadError::ParseError { .. } => LoadFailureKind::ParseError,
            LoadError::PermissionDenied { .. } => LoadFailureKind::PermissionDenied,
            LoadError::Unexpected { .. } => LoadFailureKind::Unexpected,
        }
    }

    /// The path the failed load was attempted on.
    pub fn path(&self) -> &Path {
        match self {
            LoadError::NotFound { path }
            | LoadError::NotAFile { path }
            | LoadError::Empty { path, .. }
            | LoadError::ParseError { path, .. }
            | LoadError::PermissionDenied { path }
            | LoadError::Unexpected { path, .. } => path,
        }
    }

    pub(crate) fn from_io(path: &Path, err: &io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound { path },
            io::ErrorKind::PermissionDenied => LoadError::PermissionDenied { path },
            io::ErrorKind::InvalidData => LoadError::ParseError {
                path,
                message: err.to_string(),
            },
            _ => LoadError::Unexpected {
                path,
                message: err.to_string(),
            },
        }
    }

    pub(crate) fn from_csv(path: &Path, err: &csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(io_err) => Self::from_io(path, io_err),
            csv::ErrorKind::Utf8 { .. } | csv::ErrorKind::UnequalLengths { .. } => {
                LoadError::ParseError {
                    path: path.to_path_buf(),
                    message: err.to_string(),
                }
            }
            _ => LoadError::Unexpected {
                path: path.to_path_buf(),
                message: err.to_string(),
            },
        }
    }
}

/// Errors from in-memory table processing (aggregation, column access).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessingError {
    /// A requested column does not exist in the table.
    #[error("unknown column '{column}'. available={available:?}")]
    UnknownColumn {
        column: String,
        available: Vec<String>,
    },

    /// Aggregation was asked to group by nothing.
    #[error("grouping key must name at least one column")]
    EmptyKey,

    /// The same column appears twice in a grouping key.
    #[error("column '{column}' appears more than once in the grouping key")]
    DuplicateKey { column: String },

    /// A numeric view was requested on a string column.
    #[error("column '{column}' is not numeric")]
    NotNumeric { column: String },
}

/// Errors while building or rendering a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The aggregated table did not have what the chart needs.
    #[error(transparent)]
    Processing(#[from] ProcessingError),

    /// None of the chart's value columns are present in the table.
    #[error("no plottable columns for chart '{chart}'")]
    NoSeries { chart: String },

    /// The output path's extension does not match the configured image format.
    #[error("output {} does not end in .{expected}", path.display())]
    FormatMismatch {
        path: PathBuf,
        expected: &'static str,
    },

    /// Creating the output directory or file failed.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The drawing backend reported an error.
    #[error("render error: {0}")]
    Render(String),
}

/// Errors while reading batch configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config file is not valid JSON for [`crate::batch::BatchConfig`].
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    /// The worker pool could not be started.
    #[error("cannot start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
