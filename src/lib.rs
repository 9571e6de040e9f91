//! `matmul-plots` turns matrix-multiplication benchmark timings into charts.
//!
//! Benchmark runs write one CSV per experiment (serial loop permutations, parallel permutations by
//! chunk size, thread scaling, tiled multiplication). Each file holds repeated measurements for
//! the same configuration; this crate loads those files, groups repeated rows by their
//! configuration columns, reduces each group to mean and sample standard deviation, and renders
//! line charts with error bars.
//!
//! ## Pipeline
//!
//! 1. [`ingestion::load`]: checked CSV loading into a [`types::DataSet`]. Every failure is a typed
//!    [`LoadError`] (missing file, directory, empty file, malformed table, ...), never a panic.
//! 2. [`processing::aggregate()`]: group by key columns, `<col>_mean` / `<col>_std` per numeric
//!    column, rows ordered by key.
//! 3. [`charts::build_chart`] + [`charts::render_chart`]: series construction and PNG/SVG output.
//! 4. [`batch::run_batch`]: one job per chart kind; a chart whose input is missing is skipped and
//!    reported, the rest of the batch continues.
//!
//! ## Quick example: load and aggregate
//!
//! ```no_run
//! use matmul_plots::ingestion::{load, LoadOptions};
//! use matmul_plots::processing::aggregate;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table = load("data/chrono/serial_permutations.csv", &LoadOptions::default())?;
//! let agg = aggregate(&table, &["MATRIX_SIZE"])?;
//! println!("configurations={}", agg.row_count());
//! # Ok(())
//! # }
//! ```
//!
//! ## Aggregation example
//!
//! ```rust
//! use matmul_plots::processing::aggregate;
//! use matmul_plots::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let ds = DataSet::new(
//!     Schema::new(vec![
//!         Field::new("MATRIX_SIZE", DataType::Int64),
//!         Field::new("VALUE", DataType::Float64),
//!     ]),
//!     vec![
//!         vec![Value::Int64(128), Value::Float64(1.0)],
//!         vec![Value::Int64(128), Value::Float64(3.0)],
//!         vec![Value::Int64(256), Value::Float64(5.0)],
//!     ],
//! );
//! let agg = aggregate(&ds, &["MATRIX_SIZE"]).unwrap();
//! assert_eq!(agg.mean("VALUE").unwrap(), vec![2.0, 5.0]);
//! assert!(agg.std("VALUE").unwrap()[1].is_nan());
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: checked loading and observers
//! - [`types`]: schema + in-memory dataset types
//! - [`processing`]: grouping, aggregation, filtering
//! - [`charts`]: chart definitions, series, styling, rendering
//! - [`batch`]: the batch driver used by the `matmul-plots` binary
//! - [`error`]: error types

pub mod batch;
pub mod charts;
pub mod error;
pub mod ingestion;
pub mod processing;
pub mod types;

pub use error::{
    ChartError, ConfigError, LoadError, LoadFailureKind, LoadResult, ProcessingError,
    ProcessingResult,
};
