//! Known benchmark tables and the charts drawn from them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::processing::AggregatedTable;
use crate::types::Schema;

/// Column holding the matrix dimension; the x axis of every chart.
pub const MATRIX_SIZE: &str = "MATRIX_SIZE";

/// One nesting order of the three loops of a naive matrix multiplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permutation {
    Ijk,
    Ikj,
    Jik,
    Jki,
    Kij,
    Kji,
}

impl Permutation {
    pub const ALL: [Permutation; 6] = [
        Permutation::Ijk,
        Permutation::Ikj,
        Permutation::Jik,
        Permutation::Jki,
        Permutation::Kij,
        Permutation::Kji,
    ];

    /// Upper-case label, e.g. `IKJ`.
    pub fn label(self) -> &'static str {
        match self {
            Permutation::Ijk => "IJK",
            Permutation::Ikj => "IKJ",
            Permutation::Jik => "JIK",
            Permutation::Jki => "JKI",
            Permutation::Kij => "KIJ",
            Permutation::Kji => "KJI",
        }
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Naming convention of the permutation columns.
///
/// Older result files suffix every ordering column with `_SPEEDUP`; newer ones use the bare
/// ordering name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVersion {
    /// `IJK`, `IKJ`, ...
    #[default]
    Bare,
    /// `IJK_SPEEDUP`, `IKJ_SPEEDUP`, ...
    SpeedupSuffix,
}

impl SchemaVersion {
    /// Column name of a permutation under this convention.
    pub fn column(self, perm: Permutation) -> String {
        match self {
            SchemaVersion::Bare => perm.label().to_string(),
            SchemaVersion::SpeedupSuffix => format!("{}_SPEEDUP", perm.label()),
        }
    }

    /// Guess the convention from a header. Bare wins when both forms are present.
    pub fn detect(schema: &Schema) -> Self {
        let has = |version: SchemaVersion| {
            Permutation::ALL
                .iter()
                .any(|&p| schema.contains(&version.column(p)))
        };
        if !has(SchemaVersion::Bare) && has(SchemaVersion::SpeedupSuffix) {
            SchemaVersion::SpeedupSuffix
        } else {
            SchemaVersion::Bare
        }
    }
}

/// The charts the batch driver knows how to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    SerialPermutations,
    ParallelPermutations,
    ParallelPermutationsByThreads,
    ScalingClassic,
    ScalingImproved,
    Tiled,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::SerialPermutations,
        ChartKind::ParallelPermutations,
        ChartKind::ParallelPermutationsByThreads,
        ChartKind::ScalingClassic,
        ChartKind::ScalingImproved,
        ChartKind::Tiled,
    ];

    /// Input file, relative to the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            ChartKind::SerialPermutations => "serial_permutations.csv",
            ChartKind::ParallelPermutations | ChartKind::ParallelPermutationsByThreads => {
                "parallel_permutations.csv"
            }
            ChartKind::ScalingClassic => "serial_parallel_scaling_classic.csv",
            ChartKind::ScalingImproved => "serial_parallel_scaling_improved.csv",
            ChartKind::Tiled => "tiled.csv",
        }
    }

    /// Output file name without extension; also the chart's name in logs and reports.
    pub fn stem(self) -> &'static str {
        match self {
            ChartKind::SerialPermutations => "serial_permutations",
            ChartKind::ParallelPermutations => "parallel_permutations",
            ChartKind::ParallelPermutationsByThreads => "parallel_permutations_by_threads",
            ChartKind::ScalingClassic => "serial_parallel_scaling_classic",
            ChartKind::ScalingImproved => "serial_parallel_scaling_improved",
            ChartKind::Tiled => "tiled",
        }
    }

    /// Full chart definition under a column naming convention.
    pub fn definition(self, version: SchemaVersion) -> ChartDefinition {
        let permutations = || ColumnSelector::Fixed(
            Permutation::ALL
                .iter()
                .map(|&p| ValueColumn::new(version.column(p), p.label()))
                .collect(),
        );
        let (title, facet, columns) = match self {
            ChartKind::SerialPermutations => (
                "Serial Loop Permutations: Speedup vs Matrix Size",
                None,
                permutations(),
            ),
            ChartKind::ParallelPermutations => (
                "Parallel Loop Permutations by Chunk Size",
                Some(Facet::new("CHUNK", "chunk")),
                permutations(),
            ),
            ChartKind::ParallelPermutationsByThreads => (
                "Parallel Loop Permutations by Thread Count",
                Some(Facet::new("THREADS", "threads")),
                permutations(),
            ),
            ChartKind::ScalingClassic => (
                "Classic (i-j-k): Serial vs Parallel Scaling",
                Some(Facet::new("CHUNK", "chunk")),
                ColumnSelector::Scaling,
            ),
            ChartKind::ScalingImproved => (
                "Improved (i-k-j): Serial vs Parallel Scaling",
                Some(Facet::new("CHUNK", "chunk")),
                ColumnSelector::Scaling,
            ),
            ChartKind::Tiled => (
                "Tiled Matrix Multiplication: Speedup vs Matrix Size by Block Size",
                Some(Facet::new("BLOCK_SIZE", "block")),
                ColumnSelector::Fixed(vec![
                    ValueColumn::new("SERIAL_IKJ", "Serial IKJ"),
                    ValueColumn::new("PARALLEL_IKJ", "Parallel IKJ"),
                    ValueColumn::new("SERIAL_TILED", "Serial Tiled"),
                    ValueColumn::new("PARALLEL_TILED", "Parallel Tiled"),
                    ValueColumn::new("PARALLEL_TILED_TASKS", "Parallel Tiled Tasks"),
                ]),
            ),
        };

        ChartDefinition {
            name: self.stem().to_string(),
            title: title.to_string(),
            x_column: MATRIX_SIZE.to_string(),
            x_label: "Matrix Size (N)".to_string(),
            y_label: "Speedup".to_string(),
            facet,
            columns,
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stem())
    }
}

/// A column that splits one value column into several series (one per distinct value).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facet {
    /// Key column in the table.
    pub column: String,
    /// Short name used in series labels, e.g. `chunk` in `IKJ (chunk=64)`.
    pub label: String,
}

impl Facet {
    pub fn new(column: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            label: label.into(),
        }
    }
}

/// A measured column drawn as a series, with its legend label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueColumn {
    pub column: String,
    pub label: String,
}

impl ValueColumn {
    pub fn new(column: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            label: label.into(),
        }
    }
}

/// How a chart picks its value columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    /// These columns, in this order; absent ones are skipped.
    Fixed(Vec<ValueColumn>),
    /// `SERIAL_BASELINE` followed by every `P<n>T` column, by thread count.
    Scaling,
}

/// Everything needed to turn an aggregated table into a [`super::Chart`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartDefinition {
    pub name: String,
    pub title: String,
    pub x_column: String,
    pub x_label: String,
    pub y_label: String,
    pub facet: Option<Facet>,
    pub columns: ColumnSelector,
}

impl ChartDefinition {
    /// Grouping key: the x column, then the facet column if any.
    pub fn group_keys(&self) -> Vec<&str> {
        let mut keys = vec![self.x_column.as_str()];
        if let Some(facet) = &self.facet {
            keys.push(facet.column.as_str());
        }
        keys
    }

    /// The value columns of this chart that `table` actually summarized.
    pub fn resolve_columns(&self, table: &AggregatedTable) -> Vec<ValueColumn> {
        match &self.columns {
            ColumnSelector::Fixed(cols) => cols
                .iter()
                .filter(|c| table.has_measure(&c.column))
                .cloned()
                .collect(),
            ColumnSelector::Scaling => {
                let mut out = Vec::new();
                if table.has_measure("SERIAL_BASELINE") {
                    out.push(ValueColumn::new("SERIAL_BASELINE", "Serial"));
                }
                let mut parallel: Vec<(u32, &String)> = table
                    .measures()
                    .iter()
                    .filter_map(|m| parse_thread_column(m).map(|n| (n, m)))
                    .collect();
                parallel.sort();
                out.extend(
                    parallel
                        .into_iter()
                        .map(|(n, m)| ValueColumn::new(m.clone(), format!("{n}T"))),
                );
                out
            }
        }
    }
}

/// `P8T` -> `Some(8)`.
fn parse_thread_column(name: &str) -> Option<u32> {
    name.strip_prefix('P')?.strip_suffix('T')?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::aggregate;
    use crate::types::{DataSet, DataType, Field, Value};

    #[test]
    fn schema_version_names_columns() {
        assert_eq!(SchemaVersion::Bare.column(Permutation::Kij), "KIJ");
        assert_eq!(
            SchemaVersion::SpeedupSuffix.column(Permutation::Kij),
            "KIJ_SPEEDUP"
        );
    }

    #[test]
    fn schema_version_detection_prefers_bare() {
        let suffixed = Schema::new(vec![
            Field::new(MATRIX_SIZE, DataType::Int64),
            Field::new("IJK_SPEEDUP", DataType::Float64),
        ]);
        assert_eq!(SchemaVersion::detect(&suffixed), SchemaVersion::SpeedupSuffix);

        let both = Schema::new(vec![
            Field::new("IJK", DataType::Float64),
            Field::new("IJK_SPEEDUP", DataType::Float64),
        ]);
        assert_eq!(SchemaVersion::detect(&both), SchemaVersion::Bare);
        assert_eq!(SchemaVersion::detect(&Schema::new(vec![])), SchemaVersion::Bare);
    }

    #[test]
    fn group_keys_include_facet() {
        let def = ChartKind::Tiled.definition(SchemaVersion::Bare);
        assert_eq!(def.group_keys(), vec![MATRIX_SIZE, "BLOCK_SIZE"]);
        let def = ChartKind::SerialPermutations.definition(SchemaVersion::Bare);
        assert_eq!(def.group_keys(), vec![MATRIX_SIZE]);
    }

    #[test]
    fn scaling_columns_sorted_by_thread_count() {
        let ds = DataSet::new(
            Schema::new(vec![
                Field::new(MATRIX_SIZE, DataType::Int64),
                Field::new("CHUNK", DataType::Int64),
                Field::new("P8T", DataType::Float64),
                Field::new("SERIAL_BASELINE", DataType::Float64),
                Field::new("P2T", DataType::Float64),
                Field::new("PT", DataType::Float64),
            ]),
            vec![vec![
                Value::Int64(64),
                Value::Int64(8),
                Value::Float64(3.0),
                Value::Float64(1.0),
                Value::Float64(1.8),
                Value::Float64(0.0),
            ]],
        );
        let def = ChartKind::ScalingClassic.definition(SchemaVersion::Bare);
        let agg = aggregate(&ds, &def.group_keys()).unwrap();
        let labels: Vec<String> = def
            .resolve_columns(&agg)
            .into_iter()
            .map(|c| c.label)
            .collect();
        assert_eq!(labels, vec!["Serial", "2T", "8T"]);
    }

    #[test]
    fn fixed_columns_skip_absent_ones() {
        let ds = DataSet::new(
            Schema::new(vec![
                Field::new(MATRIX_SIZE, DataType::Int64),
                Field::new("BLOCK_SIZE", DataType::Int64),
                Field::new("SERIAL_TILED", DataType::Float64),
            ]),
            vec![vec![Value::Int64(64), Value::Int64(8), Value::Float64(3.0)]],
        );
        let def = ChartKind::Tiled.definition(SchemaVersion::Bare);
        let agg = aggregate(&ds, &def.group_keys()).unwrap();
        let cols = def.resolve_columns(&agg);
        assert_eq!(cols, vec![ValueColumn::new("SERIAL_TILED", "Serial Tiled")]);
    }

    #[test]
    fn chart_kind_round_trips_through_serde_names() {
        let kind: ChartKind = serde_json::from_str("\"parallel_permutations_by_threads\"").unwrap();
        assert_eq!(kind, ChartKind::ParallelPermutationsByThreads);
        assert_eq!(kind.file_name(), "parallel_permutations.csv");
    }
}
