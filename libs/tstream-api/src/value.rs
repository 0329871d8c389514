use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::schema::ColumnInfo;

// ════════════════════════════════════════════════════════════════
//  Datum & Row
// ════════════════════════════════════════════════════════════════

/// One wire value, as carried per cell (and per array element).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Datum {
    Null,
    /// Textual scalar; interpretation depends on the column's tag.
    Scalar(String),
    Array(Vec<Datum>),
}

impl Datum {
    pub fn scalar(text: impl Into<String>) -> Self {
        Datum::Scalar(text.into())
    }

    /// Array of textual scalars.
    pub fn array_of<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Datum::Array(items.into_iter().map(|s| Datum::Scalar(s.into())).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }
}

/// Positional cells of one result row. Cell `i` belongs to column `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row(pub Vec<Datum>);

impl Row {
    pub fn new(data: Vec<Datum>) -> Self {
        Self(data)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ════════════════════════════════════════════════════════════════
//  Deferred array payload
// ════════════════════════════════════════════════════════════════

/// Array cell whose decoding waits until the caller picks a destination.
///
/// Pairs the wire elements with the element descriptor of the array
/// column; decoded at most once, by an array scanner.
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredArray {
    elements: Vec<Datum>,
    element: Arc<ColumnInfo>,
}

impl DeferredArray {
    pub fn new(elements: Vec<Datum>, element: Arc<ColumnInfo>) -> Self {
        Self { elements, element }
    }

    pub fn elements(&self) -> &[Datum] {
        &self.elements
    }

    /// Descriptor shared by every element.
    pub fn element_info(&self) -> &ColumnInfo {
        &self.element
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

// ════════════════════════════════════════════════════════════════
//  Value
// ════════════════════════════════════════════════════════════════

/// Decoded cell value.
///
/// Scalars are resolved eagerly. Array cells come out of the row cursor as
/// `Array` and become `List` once the generic scanner materializes them.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Int64(i64),
    /// `BIGINT` above `i64::MAX`.
    UInt64(u64),
    Float64(f64),
    Bool(bool),
    String(String),
    Timestamp(DateTime<Utc>),
    Array(DeferredArray),
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short type label, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int64(_) => "int64",
            Value::UInt64(_) => "uint64",
            Value::Float64(_) => "float64",
            Value::Bool(_) => "bool",
            Value::String(_) => "string",
            Value::Timestamp(_) => "timestamp",
            Value::Array(_) => "array",
            Value::List(_) => "list",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            Value::UInt64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UInt64(v) => Some(*v),
            Value::Int64(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&DeferredArray> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Leaf values of a materialized list in depth-first order.
    pub fn flatten(&self) -> Vec<&Value> {
        let mut out = Vec::new();
        fn walk<'a>(v: &'a Value, out: &mut Vec<&'a Value>) {
            match v {
                Value::List(items) => items.iter().for_each(|i| walk(i, out)),
                leaf => out.push(leaf),
            }
        }
        walk(self, &mut out);
        out
    }
}

impl From<&Value> for serde_json::Value {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Int64(i) => (*i).into(),
            Value::UInt64(u) => (*u).into(),
            Value::Float64(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Bool(b) => (*b).into(),
            Value::String(s) => s.clone().into(),
            Value::Timestamp(t) => t.to_rfc3339().into(),
            Value::Array(a) => serde_json::Value::Array(
                a.elements().iter().map(serde_json::Value::from).collect(),
            ),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
        }
    }
}

impl From<&Datum> for serde_json::Value {
    fn from(d: &Datum) -> Self {
        match d {
            Datum::Null => serde_json::Value::Null,
            Datum::Scalar(s) => s.clone().into(),
            Datum::Array(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
        }
    }
}
