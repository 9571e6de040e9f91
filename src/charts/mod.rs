//! Benchmark charts.
//!
//! - [`schema`]: the known result tables ([`ChartKind`]), their column naming conventions
//!   ([`SchemaVersion`]) and the resulting [`ChartDefinition`]s
//! - [`series`]: aggregated table → [`Chart`] (series of mean ± std points)
//! - [`style`]: explicit rendering configuration ([`ChartStyle`])
//! - [`render`]: drawing a [`Chart`] to PNG or SVG
//!
//! ## Example: aggregated table → chart
//!
//! ```rust
//! use matmul_plots::charts::{build_chart, ChartKind, ErrorBarPolicy, SchemaVersion};
//! use matmul_plots::processing::aggregate;
//! use matmul_plots::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let ds = DataSet::new(
//!     Schema::new(vec![
//!         Field::new("MATRIX_SIZE", DataType::Int64),
//!         Field::new("IKJ", DataType::Float64),
//!     ]),
//!     vec![
//!         vec![Value::Int64(256), Value::Float64(4.0)],
//!         vec![Value::Int64(256), Value::Float64(6.0)],
//!     ],
//! );
//! let def = ChartKind::SerialPermutations.definition(SchemaVersion::Bare);
//! let agg = aggregate(&ds, &def.group_keys()).unwrap();
//! let chart = build_chart(&def, &agg, ErrorBarPolicy::ZeroLength).unwrap();
//! assert_eq!(chart.series.len(), 1);
//! assert_eq!(chart.series[0].points[0].mean, 5.0);
//! ```

pub mod render;
pub mod schema;
pub mod series;
pub mod style;

pub use render::render_chart;
pub use schema::{
    ChartDefinition, ChartKind, ColumnSelector, Facet, Permutation, SchemaVersion, ValueColumn,
    MATRIX_SIZE,
};
pub use series::{build_chart, Chart, Series, SeriesPoint};
pub use style::{ChartStyle, ErrorBarPolicy, ImageFormat, Marker, Rgb};
