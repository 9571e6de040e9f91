//! Grouped mean / standard-deviation aggregation.

use std::collections::HashSet;

use crate::error::{ProcessingError, ProcessingResult};
use crate::types::{cell, DataSet, DataType, Field, Schema, Value};

use super::group::{partition, values_match};
use super::stats::mean_std;

/// Suffix of the derived mean column.
pub const MEAN_SUFFIX: &str = "_mean";
/// Suffix of the derived standard-deviation column.
pub const STD_SUFFIX: &str = "_std";

/// Result of [`aggregate`]: one row per distinct key tuple.
///
/// The underlying table holds the key columns (original types) followed by
/// `<measure>_mean`, `<measure>_std` pairs for every measure, in source column order.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedTable {
    keys: Vec<String>,
    measures: Vec<String>,
    table: DataSet,
}

impl AggregatedTable {
    /// The aggregated rows as a plain dataset.
    pub fn table(&self) -> &DataSet {
        &self.table
    }

    pub fn into_table(self) -> DataSet {
        self.table
    }

    /// Grouping columns, in grouping order.
    pub fn key_columns(&self) -> &[String] {
        &self.keys
    }

    /// Source columns that were summarized.
    pub fn measures(&self) -> &[String] {
        &self.measures
    }

    /// `true` if `column` was summarized.
    pub fn has_measure(&self, column: &str) -> bool {
        self.measures.iter().any(|m| m == column)
    }

    /// Number of groups.
    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }

    /// Per-group means of a measure.
    pub fn mean(&self, column: &str) -> ProcessingResult<Vec<f64>> {
        self.derived(column, MEAN_SUFFIX)
    }

    /// Per-group sample standard deviations of a measure (`NaN` for singleton groups).
    pub fn std(&self, column: &str) -> ProcessingResult<Vec<f64>> {
        self.derived(column, STD_SUFFIX)
    }

    /// Per-group values of a key column.
    pub fn key_values(&self, column: &str) -> ProcessingResult<Vec<Value>> {
        if !self.keys.iter().any(|k| k == column) {
            return Err(self.table.schema.unknown_column(column));
        }
        Ok(self.table.column(column)?.cloned().collect())
    }

    /// Distinct values of a key column, ascending.
    pub fn distinct(&self, column: &str) -> ProcessingResult<Vec<Value>> {
        if !self.keys.iter().any(|k| k == column) {
            return Err(self.table.schema.unknown_column(column));
        }
        self.table.distinct(column)
    }

    /// Keep only the groups whose `column` key equals `value`.
    pub fn filter_eq(&self, column: &str, value: &Value) -> ProcessingResult<Self> {
        let idx = self
            .table
            .schema
            .index_of(column)
            .filter(|_| self.keys.iter().any(|k| k == column))
            .ok_or_else(|| self.table.schema.unknown_column(column))?;
        Ok(Self {
            keys: self.keys.clone(),
            measures: self.measures.clone(),
            table: self.table.filter_rows(|row| values_match(cell(row, idx), value)),
        })
    }

    fn derived(&self, column: &str, suffix: &str) -> ProcessingResult<Vec<f64>> {
        if !self.has_measure(column) {
            return Err(ProcessingError::UnknownColumn {
                column: column.to_owned(),
                available: self.measures.clone(),
            });
        }
        self.table.numeric_column(&format!("{column}{suffix}"))
    }
}

/// Group `table` by `keys` and summarize every other numeric column.
///
/// - Rows are partitioned by the tuple of key values; the output has one row per distinct tuple,
///   ordered ascending by key.
/// - Each non-key numeric column `C` becomes `C_mean` and `C_std` (sample standard deviation,
///   `NaN` for a single value). Nulls are skipped.
/// - Non-numeric, non-key columns are dropped.
///
/// Errors with [`ProcessingError::EmptyKey`], [`ProcessingError::DuplicateKey`] or
/// [`ProcessingError::UnknownColumn`] if `keys` is not a valid grouping key for `table`.
///
/// ```rust
/// use matmul_plots::processing::aggregate;
/// use matmul_plots::types::{DataSet, DataType, Field, Schema, Value};
///
/// let ds = DataSet::new(
///     Schema::new(vec![
///         Field::new("MATRIX_SIZE", DataType::Int64),
///         Field::new("VALUE", DataType::Float64),
///     ]),
///     vec![
///         vec![Value::Int64(100), Value::Float64(1.0)],
///         vec![Value::Int64(100), Value::Float64(3.0)],
///         vec![Value::Int64(200), Value::Float64(5.0)],
///     ],
/// );
/// let agg = aggregate(&ds, &["MATRIX_SIZE"]).unwrap();
/// assert_eq!(agg.row_count(), 2);
/// assert_eq!(agg.mean("VALUE").unwrap(), vec![2.0, 5.0]);
/// assert!(agg.std("VALUE").unwrap()[1].is_nan());
/// ```
pub fn aggregate(table: &DataSet, keys: &[&str]) -> ProcessingResult<AggregatedTable> {
    if keys.is_empty() {
        return Err(ProcessingError::EmptyKey);
    }
    let mut seen = HashSet::with_capacity(keys.len());
    let mut key_idxs = Vec::with_capacity(keys.len());
    for &key in keys {
        if !seen.insert(key) {
            return Err(ProcessingError::DuplicateKey {
                column: key.to_owned(),
            });
        }
        let idx = table
            .schema
            .index_of(key)
            .ok_or_else(|| table.schema.unknown_column(key))?;
        key_idxs.push(idx);
    }

    let measure_idxs: Vec<usize> = table
        .schema
        .fields
        .iter()
        .enumerate()
        .filter(|(idx, f)| f.data_type.is_numeric() && !key_idxs.contains(idx))
        .map(|(idx, _)| idx)
        .collect();

    let mut fields: Vec<Field> = key_idxs
        .iter()
        .map(|&i| table.schema.fields[i].clone())
        .collect();
    for &i in &measure_idxs {
        let name = &table.schema.fields[i].name;
        fields.push(Field::new(format!("{name}{MEAN_SUFFIX}"), DataType::Float64));
        fields.push(Field::new(format!("{name}{STD_SUFFIX}"), DataType::Float64));
    }

    let groups = partition(table, &key_idxs);
    let mut rows = Vec::with_capacity(groups.len());
    let mut scratch: Vec<f64> = Vec::new();
    for (key, members) in groups {
        let mut row: Vec<Value> = key.into_iter().map(Value::from).collect();
        for &col in &measure_idxs {
            scratch.clear();
            scratch.extend(members.iter().filter_map(|&r| cell(&table.rows[r], col).as_f64()));
            let (mean, std) = mean_std(&scratch);
            row.push(Value::Float64(mean));
            row.push(Value::Float64(std));
        }
        rows.push(row);
    }

    Ok(AggregatedTable {
        keys: keys.iter().map(|k| (*k).to_owned()).collect(),
        measures: measure_idxs
            .iter()
            .map(|&i| table.schema.fields[i].name.clone())
            .collect(),
        table: DataSet::new(Schema::new(fields), rows),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parallel_runs() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("MATRIX_SIZE", DataType::Int64),
            Field::new("THREADS", DataType::Int64),
            Field::new("CHUNK", DataType::Int64),
            Field::new("IJK", DataType::Float64),
            Field::new("HOST", DataType::Utf8),
        ]);
        let row = |n: i64, t: i64, c: i64, v: f64| {
            vec![
                Value::Int64(n),
                Value::Int64(t),
                Value::Int64(c),
                Value::Float64(v),
                Value::Utf8("node1".into()),
            ]
        };
        DataSet::new(
            schema,
            vec![
                row(256, 4, 16, 2.0),
                row(128, 4, 16, 1.0),
                row(256, 4, 16, 4.0),
                row(256, 8, 64, 6.0),
                row(128, 2, 16, 3.0),
            ],
        )
    }

    #[test]
    fn output_schema_is_keys_then_mean_std_pairs() {
        let agg = aggregate(&parallel_runs(), &["MATRIX_SIZE", "CHUNK"]).unwrap();
        let names: Vec<&str> = agg.table().schema.field_names().collect();
        assert_eq!(
            names,
            vec![
                "MATRIX_SIZE",
                "CHUNK",
                "THREADS_mean",
                "THREADS_std",
                "IJK_mean",
                "IJK_std"
            ]
        );
        assert_eq!(agg.measures(), &["THREADS".to_string(), "IJK".to_string()]);
        assert_eq!(agg.key_columns(), &["MATRIX_SIZE".to_string(), "CHUNK".to_string()]);
    }

    #[test]
    fn one_row_per_distinct_key_tuple_in_key_order() {
        let agg = aggregate(&parallel_runs(), &["MATRIX_SIZE", "CHUNK"]).unwrap();
        assert_eq!(agg.row_count(), 3);
        assert_eq!(
            agg.key_values("MATRIX_SIZE").unwrap(),
            vec![Value::Int64(128), Value::Int64(256), Value::Int64(256)]
        );
        assert_eq!(
            agg.key_values("CHUNK").unwrap(),
            vec![Value::Int64(16), Value::Int64(16), Value::Int64(64)]
        );
        assert_eq!(agg.mean("IJK").unwrap(), vec![2.0, 3.0, 6.0]);
        let std = agg.std("IJK").unwrap();
        assert!((std[0] - 2f64.sqrt()).abs() < 1e-12);
        assert!((std[1] - 2f64.sqrt()).abs() < 1e-12);
        assert!(std[2].is_nan());
    }

    #[test]
    fn nulls_are_skipped_within_a_group() {
        let ds = DataSet::new(
            Schema::new(vec![
                Field::new("N", DataType::Int64),
                Field::new("V", DataType::Float64),
            ]),
            vec![
                vec![Value::Int64(1), Value::Float64(4.0)],
                vec![Value::Int64(1), Value::Null],
                vec![Value::Int64(2), Value::Null],
            ],
        );
        let agg = aggregate(&ds, &["N"]).unwrap();
        let mean = agg.mean("V").unwrap();
        assert_eq!(mean[0], 4.0);
        assert!(mean[1].is_nan());
    }

    #[test]
    fn short_rows_aggregate_as_nulls() {
        let ds = DataSet::new(
            Schema::new(vec![
                Field::new("N", DataType::Int64),
                Field::new("V", DataType::Float64),
            ]),
            vec![
                vec![Value::Int64(1), Value::Float64(1.0)],
                vec![Value::Int64(1)],
                vec![],
            ],
        );
        let agg = aggregate(&ds, &["N"]).unwrap();
        assert_eq!(
            agg.key_values("N").unwrap(),
            vec![Value::Null, Value::Int64(1)]
        );
        let mean = agg.mean("V").unwrap();
        assert!(mean[0].is_nan());
        assert_eq!(mean[1], 1.0);
    }

    #[test]
    fn invalid_keys_are_rejected() {
        let ds = parallel_runs();
        assert_eq!(aggregate(&ds, &[]), Err(ProcessingError::EmptyKey));
        assert!(matches!(
            aggregate(&ds, &["MATRIX_SIZE", "BLOCK_SIZE"]),
            Err(ProcessingError::UnknownColumn { column, .. }) if column == "BLOCK_SIZE"
        ));
        assert_eq!(
            aggregate(&ds, &["CHUNK", "CHUNK"]),
            Err(ProcessingError::DuplicateKey {
                column: "CHUNK".to_string()
            })
        );
    }

    #[test]
    fn string_key_groups_and_text_measure_is_dropped() {
        let agg = aggregate(&parallel_runs(), &["HOST"]).unwrap();
        assert_eq!(agg.row_count(), 1);
        assert!(!agg.has_measure("HOST"));
        let mean = agg.mean("IJK").unwrap();
        assert_eq!(mean.len(), 1);
        assert!((mean[0] - 3.2).abs() < 1e-12);
    }

    #[test]
    fn filter_eq_selects_a_facet() {
        let agg = aggregate(&parallel_runs(), &["MATRIX_SIZE", "CHUNK"]).unwrap();
        let chunk16 = agg.filter_eq("CHUNK", &Value::Int64(16)).unwrap();
        assert_eq!(chunk16.row_count(), 2);
        assert_eq!(chunk16.mean("IJK").unwrap(), vec![2.0, 3.0]);
        assert_eq!(
            agg.distinct("CHUNK").unwrap(),
            vec![Value::Int64(16), Value::Int64(64)]
        );
        assert!(agg.filter_eq("IJK_mean", &Value::Float64(2.0)).is_err());
    }

    #[test]
    fn aggregation_is_deterministic() {
        let ds = parallel_runs();
        let a = aggregate(&ds, &["MATRIX_SIZE", "THREADS"]).unwrap();
        let b = aggregate(&ds, &["MATRIX_SIZE", "THREADS"]).unwrap();
        // NaN != NaN, so compare the debug rendering instead of `==`.
        assert_eq!(format!("{a:?}"), format!("{b:?}"));
    }
}
