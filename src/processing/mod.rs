//! In-memory table transformations.
//!
//! The processing layer operates on [`crate::types::DataSet`] values produced by loading. Every
//! operation returns a new value; inputs are never mutated.
//!
//! - [`aggregate()`]: group by key columns, mean + sample standard deviation per numeric column
//! - [`filter_eq()`]: keep the rows whose column equals a value
//!
//! ## Example: load → aggregate → pick a facet
//!
//! ```rust
//! use matmul_plots::processing::aggregate;
//! use matmul_plots::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("MATRIX_SIZE", DataType::Int64),
//!     Field::new("CHUNK", DataType::Int64),
//!     Field::new("IKJ", DataType::Float64),
//! ]);
//! let ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Int64(512), Value::Int64(16), Value::Float64(3.0)],
//!         vec![Value::Int64(512), Value::Int64(16), Value::Float64(5.0)],
//!         vec![Value::Int64(512), Value::Int64(64), Value::Float64(6.0)],
//!     ],
//! );
//!
//! let agg = aggregate(&ds, &["MATRIX_SIZE", "CHUNK"]).unwrap();
//! let chunk16 = agg.filter_eq("CHUNK", &Value::Int64(16)).unwrap();
//! assert_eq!(chunk16.mean("IKJ").unwrap(), vec![4.0]);
//! ```

pub mod aggregate;
pub mod filter;
pub mod group;
pub mod stats;

pub use aggregate::{aggregate, AggregatedTable, MEAN_SUFFIX, STD_SUFFIX};
pub use filter::filter_eq;
pub use group::{GroupKey, KeyValue};
pub use stats::mean_std;
