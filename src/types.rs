//! Core data model types.
//!
//! A benchmark result file is loaded into an in-memory [`DataSet`]: a [`Schema`] (ordered list of
//! typed [`Field`]s) plus row-major [`Value`] storage. Every column has exactly one
//! [`DataType`] across all rows.

use std::fmt;

use crate::error::{ProcessingError, ProcessingResult};

/// Logical data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// UTF-8 string (categorical values).
    Utf8,
}

impl DataType {
    /// `true` for [`DataType::Int64`] and [`DataType::Float64`].
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int64 | Self::Float64)
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of fields describing the shape of a [`DataSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Returns the field with the given name, if present.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// `true` if a field with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub(crate) fn unknown_column(&self, name: &str) -> ProcessingError {
        ProcessingError::UnknownColumn {
            column: name.to_owned(),
            available: self.field_names().map(str::to_owned).collect(),
        }
    }
}

/// A single typed value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Empty cell.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Numeric view of the value; `None` for nulls and strings.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            Value::Null | Value::Utf8(_) => None,
        }
    }

    /// `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

static NULL: Value = Value::Null;

/// Cell `idx` of `row`; a row shorter than the schema reads as null there.
pub(crate) fn cell(row: &[Value], idx: usize) -> &Value {
    row.get(idx).unwrap_or(&NULL)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Utf8(s) => f.write_str(s),
        }
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields. A dataset is
/// never mutated in place: filtering and aggregation return new datasets.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the dataset.
    pub fn column_count(&self) -> usize {
        self.schema.fields.len()
    }

    /// `true` if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate the values of one column, in row order.
    pub fn column(&self, name: &str) -> ProcessingResult<impl Iterator<Item = &Value> + '_> {
        let idx = self
            .schema
            .index_of(name)
            .ok_or_else(|| self.schema.unknown_column(name))?;
        Ok(self.rows.iter().map(move |row| cell(row, idx)))
    }

    /// Values of a numeric column as `f64`, nulls as `NaN`.
    ///
    /// Errors if the column is missing or holds strings.
    pub fn numeric_column(&self, name: &str) -> ProcessingResult<Vec<f64>> {
        let field = self
            .schema
            .field(name)
            .ok_or_else(|| self.schema.unknown_column(name))?;
        if !field.data_type.is_numeric() {
            return Err(ProcessingError::NotNumeric {
                column: name.to_owned(),
            });
        }
        Ok(self
            .column(name)?
            .map(|v| v.as_f64().unwrap_or(f64::NAN))
            .collect())
    }

    /// Distinct non-null values of a column, in ascending order.
    pub fn distinct(&self, name: &str) -> ProcessingResult<Vec<Value>> {
        use crate::processing::KeyValue;

        let keys: std::collections::BTreeSet<KeyValue> = self
            .column(name)?
            .filter(|v| !v.is_null())
            .map(KeyValue::from)
            .collect();
        Ok(keys.into_iter().map(Value::from).collect())
    }

    /// Create a new dataset containing only rows that match `predicate`.
    ///
    /// The returned dataset preserves the original schema.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }
}
