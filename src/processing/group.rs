//! Group keys.
//!
//! [`KeyValue`] is the totally ordered, hashable form of a [`Value`] used to partition rows.
//! Numbers compare numerically, strings exactly. Ordering is what makes aggregation output
//! deterministic: groups are emitted in ascending key order.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use crate::types::{cell, DataSet, Value};

/// `f64` with a total order: `-0.0 == 0.0`, all NaNs equal and greater than every number.
#[derive(Debug, Clone, Copy)]
pub struct FloatKey(f64);

impl FloatKey {
    /// Wrap a float, normalizing signed zero and NaN payloads.
    pub fn new(v: f64) -> Self {
        if v == 0.0 {
            Self(0.0)
        } else if v.is_nan() {
            Self(f64::NAN)
        } else {
            Self(v)
        }
    }

    /// The wrapped value.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl PartialEq for FloatKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatKey {}

impl PartialOrd for FloatKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for FloatKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// One component of a group key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyValue {
    /// Empty cell; nulls form their own group.
    Null,
    Int64(i64),
    Float64(FloatKey),
    Utf8(String),
}

impl From<&Value> for KeyValue {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => KeyValue::Null,
            Value::Int64(i) => KeyValue::Int64(*i),
            Value::Float64(f) => KeyValue::Float64(FloatKey::new(*f)),
            Value::Utf8(s) => KeyValue::Utf8(s.clone()),
        }
    }
}

impl From<KeyValue> for Value {
    fn from(k: KeyValue) -> Self {
        match k {
            KeyValue::Null => Value::Null,
            KeyValue::Int64(i) => Value::Int64(i),
            KeyValue::Float64(f) => Value::Float64(f.get()),
            KeyValue::Utf8(s) => Value::Utf8(s),
        }
    }
}

/// A full group key: one [`KeyValue`] per grouping column, in grouping order.
pub type GroupKey = Vec<KeyValue>;

/// Partition row indexes by the values at `key_idxs`.
///
/// Every row lands in exactly one group; groups are ordered by key and rows within a group keep
/// their source order.
pub fn partition(dataset: &DataSet, key_idxs: &[usize]) -> BTreeMap<GroupKey, Vec<usize>> {
    let mut groups: BTreeMap<GroupKey, Vec<usize>> = BTreeMap::new();
    for (row_idx, row) in dataset.rows.iter().enumerate() {
        let key: GroupKey = key_idxs.iter().map(|&i| KeyValue::from(cell(row, i))).collect();
        groups.entry(key).or_default().push(row_idx);
    }
    groups
}

/// Value equality as used for grouping and facet selection.
///
/// Numbers compare numerically even across `Int64`/`Float64`.
pub fn values_match(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => FloatKey::new(x) == FloatKey::new(y),
        _ => a == b,
    }
}
