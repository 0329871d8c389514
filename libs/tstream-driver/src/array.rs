//! Array scanning: resolves a [`DeferredArray`] into the container the
//! caller asked for.
//!
//! The scanner is picked once, from the destination type, through
//! [`ScanTarget`]. Concrete sinks read each element's text directly;
//! anything generic goes through the recursive decoder and yields a
//! [`Value::List`] tree as deep as the wire payload.

use tstream_api::{ColumnInfo, ColumnType, Datum, DeferredArray, Value};

use crate::decode::{decode_scalar, parse_f64, parse_i64};
use crate::error::DecodeError;

/// Destination selected for one array cell.
pub enum ArrayScanner<'a> {
    Strings(&'a mut Vec<String>),
    Integers(&'a mut Vec<i64>),
    /// Parsed as 64-bit, then narrowed; values outside `i32` fail.
    Int32s(&'a mut Vec<i32>),
    Floats(&'a mut Vec<f64>),
    Booleans(&'a mut Vec<bool>),
    /// Nested variant tree, stored as a single `Value::List`.
    Any(&'a mut Value),
    /// Nested variant tree, one entry per top-level element.
    AnyList(&'a mut Vec<Value>),
}

impl ArrayScanner<'_> {
    /// Decode `payload` into the destination.
    ///
    /// On failure the destination keeps its previous contents.
    pub fn scan(self, payload: &DeferredArray) -> Result<(), DecodeError> {
        match self {
            ArrayScanner::Strings(dest) => *dest = collect(payload, |s| Ok(s.to_string()))?,
            ArrayScanner::Integers(dest) => *dest = collect(payload, parse_i64)?,
            ArrayScanner::Int32s(dest) => *dest = collect(payload, parse_i32)?,
            ArrayScanner::Floats(dest) => *dest = collect(payload, parse_f64)?,
            ArrayScanner::Booleans(dest) => *dest = collect(payload, |s| Ok(s == "true"))?,
            ArrayScanner::Any(dest) => *dest = Value::List(scan_any_elements(payload)?),
            ArrayScanner::AnyList(dest) => *dest = scan_any_elements(payload)?,
        }
        Ok(())
    }

    /// Scan a decoded cell. Only [`Value::Array`] cells can be scanned.
    pub fn scan_value(self, value: &Value) -> Result<(), DecodeError> {
        match value {
            Value::Array(payload) => self.scan(payload),
            other => Err(DecodeError::MalformedPayload(format!(
                "cannot scan {} as array",
                other.type_name()
            ))),
        }
    }
}

/// Destination types that may receive an array cell.
///
/// Scalar destinations answer `None`: the conversion is unsupported and the
/// caller decides whether that is fatal.
pub trait ScanTarget {
    fn array_scanner(&mut self) -> Option<ArrayScanner<'_>>;
}

/// Pick the scanner for `dest`.
pub fn array<T: ScanTarget + ?Sized>(dest: &mut T) -> Option<ArrayScanner<'_>> {
    dest.array_scanner()
}

impl ScanTarget for Vec<String> {
    fn array_scanner(&mut self) -> Option<ArrayScanner<'_>> {
        Some(ArrayScanner::Strings(self))
    }
}

impl ScanTarget for Vec<i64> {
    fn array_scanner(&mut self) -> Option<ArrayScanner<'_>> {
        Some(ArrayScanner::Integers(self))
    }
}

impl ScanTarget for Vec<i32> {
    fn array_scanner(&mut self) -> Option<ArrayScanner<'_>> {
        Some(ArrayScanner::Int32s(self))
    }
}

impl ScanTarget for Vec<f64> {
    fn array_scanner(&mut self) -> Option<ArrayScanner<'_>> {
        Some(ArrayScanner::Floats(self))
    }
}

impl ScanTarget for Vec<bool> {
    fn array_scanner(&mut self) -> Option<ArrayScanner<'_>> {
        Some(ArrayScanner::Booleans(self))
    }
}

impl ScanTarget for Vec<Value> {
    fn array_scanner(&mut self) -> Option<ArrayScanner<'_>> {
        Some(ArrayScanner::AnyList(self))
    }
}

impl ScanTarget for Value {
    fn array_scanner(&mut self) -> Option<ArrayScanner<'_>> {
        Some(ArrayScanner::Any(self))
    }
}

macro_rules! not_array_like {
    ($($t:ty),* $(,)?) => {
        $(
            impl ScanTarget for $t {
                fn array_scanner(&mut self) -> Option<ArrayScanner<'_>> {
                    None
                }
            }
        )*
    };
}

not_array_like!(String, i64, i32, u64, f64, bool);

// ════════════════════════════════════════════════════════════════
//  Concrete sinks
// ════════════════════════════════════════════════════════════════

fn collect<T>(
    payload: &DeferredArray,
    parse: impl Fn(&str) -> Result<T, DecodeError>,
) -> Result<Vec<T>, DecodeError> {
    payload
        .elements()
        .iter()
        .enumerate()
        .map(|(index, datum)| {
            let text = match datum {
                Datum::Scalar(s) => s,
                Datum::Null => return Err(element_error(index, "null element")),
                Datum::Array(_) => return Err(element_error(index, "nested array element")),
            };
            parse(text).map_err(|e| DecodeError::ArrayElementParseFailure {
                index,
                source: Box::new(e),
            })
        })
        .collect()
}

fn element_error(index: usize, what: &str) -> DecodeError {
    DecodeError::MalformedPayload(format!("{what} at index {index} in typed array"))
}

fn parse_i32(text: &str) -> Result<i32, DecodeError> {
    let wide = parse_i64(text)?;
    i32::try_from(wide).map_err(|_| DecodeError::OutOfRange(text.to_string()))
}

// ════════════════════════════════════════════════════════════════
//  Generic recursive decoder
// ════════════════════════════════════════════════════════════════

fn scan_any_elements(payload: &DeferredArray) -> Result<Vec<Value>, DecodeError> {
    payload
        .elements()
        .iter()
        .map(|datum| scan_any(datum, payload.element_info()))
        .collect()
}

/// Decode one element against the descriptor inherited from its array.
pub fn scan_any(datum: &Datum, column: &ColumnInfo) -> Result<Value, DecodeError> {
    match (datum, &column.column_type) {
        (Datum::Null, _) => Ok(Value::Null),
        (Datum::Scalar(text), Some(ColumnType::Scalar(tag))) => decode_scalar(tag, text),
        (Datum::Array(items), Some(ColumnType::Array(element))) => items
            .iter()
            .map(|d| scan_any(d, element))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        (_, None) => Err(DecodeError::MissingColumnType(column.display_name().to_string())),
        (Datum::Scalar(_), Some(ColumnType::Array(_))) => Err(DecodeError::MalformedPayload(
            "scalar element where an array was declared".into(),
        )),
        (Datum::Array(_), Some(ColumnType::Scalar(_))) => Err(DecodeError::MalformedPayload(
            "array element where a scalar was declared".into(),
        )),
    }
}
