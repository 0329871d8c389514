//! Cell decoding: one datum plus its column descriptor become a [`Value`].

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use num_bigint::BigInt;

use tstream_api::{ColumnInfo, ColumnType, Datum, DeferredArray, ScalarType, Value};

use crate::error::DecodeError;

/// Date-only layout, read at UTC midnight.
const DATE_LAYOUT: &str = "%Y-%m-%d";
/// Time and timestamp layout; the fraction is optional, up to nanoseconds.
const DATETIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Decode one cell.
///
/// Array cells are not decoded here: they come back as [`Value::Array`],
/// to be resolved by an array scanner once the destination is known.
pub fn decode_column(datum: Datum, column: &ColumnInfo) -> Result<Value, DecodeError> {
    match &column.column_type {
        Some(ColumnType::Array(element)) => match datum {
            Datum::Array(items) => Ok(Value::Array(DeferredArray::new(items, element.clone()))),
            Datum::Null => Ok(Value::Null),
            Datum::Scalar(_) => Err(DecodeError::MalformedPayload(format!(
                "scalar value in array column ({})",
                column.display_name()
            ))),
        },
        Some(ColumnType::Scalar(tag)) => match datum {
            Datum::Scalar(text) => decode_scalar(tag, &text),
            Datum::Null => Ok(Value::Null),
            Datum::Array(_) => Err(DecodeError::MalformedPayload(format!(
                "array value in scalar column ({})",
                column.display_name()
            ))),
        },
        None => Err(DecodeError::MissingColumnType(column.display_name().to_string())),
    }
}

/// Decode scalar text by tag.
pub fn decode_scalar(tag: &ScalarType, text: &str) -> Result<Value, DecodeError> {
    match tag {
        ScalarType::Integer => parse_i64(text).map(Value::Int64),
        ScalarType::Bigint => parse_bigint(text),
        ScalarType::Double => parse_f64(text).map(Value::Float64),
        ScalarType::Boolean => Ok(Value::Bool(text == "true")),
        ScalarType::Varchar
        | ScalarType::IntervalDayToSecond
        | ScalarType::IntervalYearToMonth => Ok(Value::String(text.to_string())),
        ScalarType::Date => parse_date(text).map(Value::Timestamp),
        ScalarType::Time | ScalarType::Timestamp => parse_datetime(text).map(Value::Timestamp),
        ScalarType::Unknown => Ok(Value::Null),
        ScalarType::Other(t) => Err(DecodeError::UnsupportedScalarTag(t.clone())),
    }
}

pub(crate) fn parse_i64(text: &str) -> Result<i64, DecodeError> {
    text.parse::<i64>().map_err(|source| DecodeError::InvalidInteger {
        value: text.to_string(),
        source,
    })
}

pub(crate) fn parse_f64(text: &str) -> Result<f64, DecodeError> {
    text.parse::<f64>().map_err(|source| DecodeError::InvalidFloat {
        value: text.to_string(),
        source,
    })
}

/// Signed when it fits, unsigned above `i64::MAX`, otherwise out of range.
fn parse_bigint(text: &str) -> Result<Value, DecodeError> {
    let big = BigInt::from_str(text).map_err(|_| DecodeError::OutOfRange(text.to_string()))?;
    if let Ok(v) = i64::try_from(&big) {
        return Ok(Value::Int64(v));
    }
    if let Ok(v) = u64::try_from(&big) {
        return Ok(Value::UInt64(v));
    }
    Err(DecodeError::OutOfRange(text.to_string()))
}

fn parse_date(text: &str) -> Result<DateTime<Utc>, DecodeError> {
    let date = NaiveDate::parse_from_str(text, DATE_LAYOUT).map_err(|source| {
        DecodeError::MalformedTemporalValue { value: text.to_string(), source }
    })?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

fn parse_datetime(text: &str) -> Result<DateTime<Utc>, DecodeError> {
    NaiveDateTime::parse_from_str(text, DATETIME_LAYOUT)
        .map(|dt| dt.and_utc())
        .map_err(|source| DecodeError::MalformedTemporalValue { value: text.to_string(), source })
}
