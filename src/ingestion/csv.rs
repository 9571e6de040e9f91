//! CSV table reading.
//!
//! Two modes:
//!
//! - **Inferred** (no schema): every header column becomes a field; its type is inferred from
//!   the values (`Int64` if all parse as integers, else `Float64` if all parse as numbers, else
//!   `Utf8`). A column mixing numbers and text is rejected.
//! - **Missing values**: empty cells and the usual missing-value markers (`NA`, `N/A`, `NaN`,
//!   `null`, `None`, ...) load as [`Value::Null`] in both modes.
//! - **Schema-first**: headers must contain all schema fields (order can differ, extra columns
//!   are ignored) and every value must parse as its field's type.

use std::io::Read;
use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Build a CSV reader configured the way the loader expects.
pub fn reader_builder(delimiter: u8) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(false)
        .trim(csv::Trim::All);
    builder
}

/// Read a table from an existing CSV reader.
///
/// `origin` is only used to attribute errors. Returns a dataset with zero rows for a header-only
/// input; deciding whether that is acceptable is up to the caller.
pub fn read_csv_from_reader<R: Read>(
    rdr: &mut csv::Reader<R>,
    schema: Option<&Schema>,
    origin: &Path,
) -> LoadResult<DataSet> {
    let headers = rdr
        .headers()
        .map_err(|e| LoadError::from_csv(origin, &e))?
        .clone();
    if headers.iter().all(str::is_empty) {
        return Err(LoadError::Empty {
            path: origin.to_path_buf(),
            detail: "no header row".to_string(),
        });
    }

    let records = rdr
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| LoadError::from_csv(origin, &e))?;

    match schema {
        Some(schema) => read_with_schema(&headers, &records, schema, origin),
        None => read_inferred(&headers, &records, origin),
    }
}

fn read_with_schema(
    headers: &csv::StringRecord,
    records: &[csv::StringRecord],
    schema: &Schema,
    origin: &Path,
) -> LoadResult<DataSet> {
    // Map schema fields -> CSV column indexes (allows re-ordered CSV columns).
    let mut col_idxs = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        match headers.iter().position(|h| h == field.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(LoadError::ParseError {
                    path: origin.to_path_buf(),
                    message: format!(
                        "missing required column '{field}'. headers={:?}",
                        headers.iter().collect::<Vec<_>>(),
                        field = field.name
                    ),
                });
            }
        }
    }

    let mut rows = Vec::with_capacity(records.len());
    for (row_idx0, record) in records.iter().enumerate() {
        // 1-based for users, +1 again for the header line.
        let user_row = row_idx0 + 2;
        let mut row = Vec::with_capacity(schema.fields.len());
        for (field, &csv_idx) in schema.fields.iter().zip(&col_idxs) {
            let raw = record.get(csv_idx).unwrap_or("");
            let value = parse_typed_value(raw, field.data_type).map_err(|message| {
                LoadError::ParseError {
                    path: origin.to_path_buf(),
                    message: format!(
                        "row {user_row} column '{}': {message} (raw='{raw}')",
                        field.name
                    ),
                }
            })?;
            row.push(value);
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

fn read_inferred(
    headers: &csv::StringRecord,
    records: &[csv::StringRecord],
    origin: &Path,
) -> LoadResult<DataSet> {
    let mut fields = Vec::with_capacity(headers.len());
    for (idx, name) in headers.iter().enumerate() {
        if fields.iter().any(|f: &Field| f.name == name) {
            return Err(LoadError::ParseError {
                path: origin.to_path_buf(),
                message: format!("duplicate column '{name}' in header"),
            });
        }
        let data_type = infer_column_type(records.iter().map(|r| r.get(idx).unwrap_or("")))
            .map_err(|message| LoadError::ParseError {
                path: origin.to_path_buf(),
                message: format!("column '{name}': {message}"),
            })?;
        fields.push(Field::new(name, data_type));
    }

    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let row = fields
            .iter()
            .zip(record.iter())
            // Types were inferred from these values.
            .map(|(field, raw)| parse_typed_value(raw, field.data_type).unwrap_or(Value::Null))
            .collect();
        rows.push(row);
    }

    Ok(DataSet::new(Schema::new(fields), rows))
}

/// Infer the single type shared by all non-empty values of a column.
fn infer_column_type<'a>(values: impl Iterator<Item = &'a str>) -> Result<DataType, String> {
    let mut all_int = true;
    let mut numeric = 0usize;
    let mut text: Option<&str> = None;

    for raw in values.filter(|v| !is_missing(v)) {
        if raw.parse::<i64>().is_ok() {
            numeric += 1;
        } else if raw.parse::<f64>().is_ok() {
            numeric += 1;
            all_int = false;
        } else if text.is_none() {
            text = Some(raw);
        }
    }

    match (numeric, text) {
        (0, None) => Ok(DataType::Float64),
        (0, Some(_)) => Ok(DataType::Utf8),
        (_, None) if all_int => Ok(DataType::Int64),
        (_, None) => Ok(DataType::Float64),
        (_, Some(raw)) => Err(format!(
            "mixes numeric and text values (first text value '{raw}')"
        )),
    }
}

/// Tokens read as a missing value (the default NA set of most dataframe CSV readers).
const MISSING_TOKENS: [&str; 16] = [
    "", "NA", "N/A", "n/a", "#N/A", "NaN", "-NaN", "nan", "-nan", "NULL", "null", "None",
    "<NA>", "#NA", "-1.#IND", "1.#QNAN",
];

fn is_missing(raw: &str) -> bool {
    MISSING_TOKENS.contains(&raw.trim())
}

fn parse_typed_value(raw: &str, data_type: DataType) -> Result<Value, String> {
    let trimmed = raw.trim();
    if is_missing(trimmed) {
        return Ok(Value::Null);
    }

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| e.to_string()),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(input: &str) -> LoadResult<DataSet> {
        let mut rdr = reader_builder(b',').from_reader(input.as_bytes());
        read_csv_from_reader(&mut rdr, None, Path::new("mem.csv"))
    }

    #[test]
    fn infers_int_float_and_text_columns() {
        let ds = read("MATRIX_SIZE,IJK,NOTE\n100,1.5,warm\n200,2,cold\n").unwrap();
        let types: Vec<DataType> = ds.schema.fields.iter().map(|f| f.data_type).collect();
        assert_eq!(types, vec![DataType::Int64, DataType::Float64, DataType::Utf8]);
        assert_eq!(ds.rows[1][1], Value::Float64(2.0));
    }

    #[test]
    fn empty_cells_are_null_and_do_not_affect_inference() {
        let ds = read("A,B\n1,\n2,3\n").unwrap();
        assert_eq!(ds.schema.fields[1].data_type, DataType::Int64);
        assert_eq!(ds.rows[0][1], Value::Null);
    }

    #[test]
    fn all_empty_column_is_float_nulls() {
        let ds = read("A,B\n1,\n2,\n").unwrap();
        assert_eq!(ds.schema.fields[1].data_type, DataType::Float64);
        assert!(ds.rows.iter().all(|r| r[1].is_null()));
    }

    #[test]
    fn missing_value_markers_are_null() {
        let ds = read("N,V,NOTE\n1,1.0,x\n1,NaN,NA\n1,3.0,y\n2,NA,z\n").unwrap();
        assert_eq!(ds.schema.fields[1].data_type, DataType::Float64);
        assert_eq!(ds.schema.fields[2].data_type, DataType::Utf8);
        assert_eq!(ds.rows[1][1], Value::Null);
        assert_eq!(ds.rows[1][2], Value::Null);
        assert_eq!(ds.rows[3][1], Value::Null);

        let agg = crate::processing::aggregate(&ds, &["N"]).unwrap();
        assert_eq!(agg.mean("V").unwrap()[0], 2.0);
    }

    #[test]
    fn schema_mode_reads_missing_markers_as_null() {
        let schema = Schema::new(vec![Field::new("IJK", DataType::Float64)]);
        let mut rdr = reader_builder(b',').from_reader("IJK\nN/A\n1.5\n".as_bytes());
        let ds = read_csv_from_reader(&mut rdr, Some(&schema), Path::new("mem.csv")).unwrap();
        assert_eq!(ds.rows, vec![vec![Value::Null], vec![Value::Float64(1.5)]]);
    }

    #[test]
    fn mixed_column_is_a_parse_error() {
        let err = read("A,B\n1,2.0\n2,oops\n").unwrap_err();
        match err {
            LoadError::ParseError { message, .. } => {
                assert!(message.contains("column 'B'"));
                assert!(message.contains("oops"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn ragged_row_is_a_parse_error() {
        let err = read("A,B\n1,2\n3\n").unwrap_err();
        assert!(matches!(err, LoadError::ParseError { .. }), "{err:?}");
    }

    #[test]
    fn values_and_headers_are_trimmed() {
        let ds = read(" A , B \n 1 , 2.5 \n").unwrap();
        assert_eq!(ds.schema.index_of("B"), Some(1));
        assert_eq!(ds.rows[0], vec![Value::Int64(1), Value::Float64(2.5)]);
    }

    #[test]
    fn duplicate_header_is_rejected() {
        let err = read("A,A\n1,2\n").unwrap_err();
        assert!(err.to_string().contains("duplicate column 'A'"));
    }

    #[test]
    fn schema_mode_allows_reordered_columns_and_reports_rows() {
        let schema = Schema::new(vec![
            Field::new("MATRIX_SIZE", DataType::Int64),
            Field::new("IJK", DataType::Float64),
        ]);
        let input = "IJK,MATRIX_SIZE,EXTRA\n1.0,100,x\n";
        let mut rdr = reader_builder(b',').from_reader(input.as_bytes());
        let ds = read_csv_from_reader(&mut rdr, Some(&schema), Path::new("mem.csv")).unwrap();
        assert_eq!(ds.rows[0], vec![Value::Int64(100), Value::Float64(1.0)]);

        let input = "IJK,MATRIX_SIZE\n1.0,big\n";
        let mut rdr = reader_builder(b',').from_reader(input.as_bytes());
        let msg = read_csv_from_reader(&mut rdr, Some(&schema), Path::new("mem.csv"))
            .unwrap_err()
            .to_string();
        assert!(msg.contains("row 2 column 'MATRIX_SIZE'"), "{msg}");
    }

    #[test]
    fn schema_mode_reports_missing_column() {
        let schema = Schema::new(vec![Field::new("CHUNK", DataType::Int64)]);
        let mut rdr = reader_builder(b',').from_reader("A\n1\n".as_bytes());
        let msg = read_csv_from_reader(&mut rdr, Some(&schema), Path::new("mem.csv"))
            .unwrap_err()
            .to_string();
        assert!(msg.contains("missing required column 'CHUNK'"));
    }

    #[test]
    fn semicolon_delimiter() {
        let mut rdr = reader_builder(b';').from_reader("A;B\n1;2\n".as_bytes());
        let ds = read_csv_from_reader(&mut rdr, None, Path::new("mem.csv")).unwrap();
        assert_eq!(ds.column_count(), 2);
    }
}
