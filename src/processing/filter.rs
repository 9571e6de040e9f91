//! Row filtering for [`crate::types::DataSet`].

use crate::error::ProcessingResult;
use crate::types::{cell, DataSet, Value};

use super::group::values_match;

/// Keep the rows whose `column` equals `value` (numbers compare numerically).
pub fn filter_eq(dataset: &DataSet, column: &str, value: &Value) -> ProcessingResult<DataSet> {
    let idx = dataset
        .schema
        .index_of(column)
        .ok_or_else(|| dataset.schema.unknown_column(column))?;
    Ok(dataset.filter_rows(|row| values_match(cell(row, idx), value)))
}

#[cfg(test)]
mod tests {
    use super::filter_eq;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn sample_dataset() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("MATRIX_SIZE", DataType::Int64),
            Field::new("THREADS", DataType::Int64),
            Field::new("IKJ", DataType::Float64),
        ]);

        let rows = vec![
            vec![Value::Int64(128), Value::Int64(2), Value::Float64(1.9)],
            vec![Value::Int64(128), Value::Int64(4), Value::Float64(3.6)],
            vec![Value::Int64(256), Value::Int64(4), Value::Float64(3.8)],
        ];

        DataSet::new(schema, rows)
    }

    #[test]
    fn filter_rows_by_numeric_predicate() {
        let ds = sample_dataset();
        let idx = ds.schema.index_of("IKJ").unwrap();

        let out = ds.filter_rows(|row| matches!(row.get(idx), Some(Value::Float64(v)) if *v > 3.0));

        assert_eq!(out.schema, ds.schema);
        assert_eq!(out.row_count(), 2);
        // Original unchanged
        assert_eq!(ds.row_count(), 3);
    }

    #[test]
    fn filter_eq_matches_numerically() {
        let ds = sample_dataset();
        let out = filter_eq(&ds, "THREADS", &Value::Float64(4.0)).unwrap();
        assert_eq!(
            out.rows,
            vec![
                vec![Value::Int64(128), Value::Int64(4), Value::Float64(3.6)],
                vec![Value::Int64(256), Value::Int64(4), Value::Float64(3.8)],
            ]
        );
    }

    #[test]
    fn filter_eq_unknown_column_errors() {
        let ds = sample_dataset();
        assert!(filter_eq(&ds, "CHUNK", &Value::Int64(1)).is_err());
    }

    #[test]
    fn filter_rows_can_return_empty_dataset() {
        let ds = sample_dataset();
        let out = ds.filter_rows(|_| false);
        assert_eq!(out.schema, ds.schema);
        assert!(out.rows.is_empty());
    }
}
