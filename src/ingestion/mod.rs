//! Loading benchmark tables from disk.
//!
//! Most callers should use [`load`] (or [`load_from_dir`]) which:
//!
//! - checks the path step by step and returns a typed [`crate::LoadError`] on the first failure
//! - reads the CSV into an in-memory [`crate::types::DataSet`], inferring column types unless a
//!   schema is supplied through [`LoadOptions`]
//! - optionally reports success/failure/alerts to a [`PipelineObserver`]
//!
//! The reader-level function lives in [`csv`].

pub mod csv;
pub mod load;
pub mod observability;

pub use load::{load, load_from_dir, LoadOptions};
pub use observability::{
    CompositeObserver, FileObserver, LoadContext, LoadStats, PipelineObserver, Severity,
    StdErrObserver,
};
