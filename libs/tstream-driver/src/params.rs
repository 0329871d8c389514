//! Parameter interpolation: typed parameters are rendered as literals and
//! substituted into the query text before it is sent.
//!
//! `?` markers take parameters by position; `$name$` tokens take the
//! parameter with that name.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::{BoxError, ParamError};

const PLACEHOLDER: char = '?';
const NAMED_DELIMITER: &str = "$";

/// Layout shared with `TIMESTAMP` cells. Trailing zero nanoseconds are
/// dropped, together with the dot when the fraction is zero.
pub(crate) const TIMESTAMP_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

// ════════════════════════════════════════════════════════════════
//  Param
// ════════════════════════════════════════════════════════════════

/// Something that yields a parameter value when asked, once.
///
/// A valuer that returns another valuer is rejected: resolution is a
/// single step.
pub trait Valuer: Send + Sync {
    fn value(&self) -> Result<Param, BoxError>;
}

/// Typed query parameter.
#[derive(Clone)]
pub enum Param {
    Null,
    Int64(i64),
    Float64(f64),
    Bool(bool),
    /// Written raw between single quotes.
    Bytes(Vec<u8>),
    /// Single-quoted.
    Text(String),
    /// Substituted without quotes, e.g. an interval literal for `ago(?)`.
    Bare(String),
    Timestamp(DateTime<Utc>),
    Valuer(Arc<dyn Valuer>),
}

impl Param {
    pub fn bare(s: impl Into<String>) -> Self {
        Param::Bare(s.into())
    }

    pub fn valuer(v: impl Valuer + 'static) -> Self {
        Param::Valuer(Arc::new(v))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Param::Null => "null",
            Param::Int64(_) => "int64",
            Param::Float64(_) => "float64",
            Param::Bool(_) => "bool",
            Param::Bytes(_) => "bytes",
            Param::Text(_) => "string",
            Param::Bare(_) => "bare string",
            Param::Timestamp(_) => "timestamp",
            Param::Valuer(_) => "valuer",
        }
    }
}

impl std::fmt::Debug for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Param::Null => write!(f, "Null"),
            Param::Int64(v) => write!(f, "Int64({v})"),
            Param::Float64(v) => write!(f, "Float64({v})"),
            Param::Bool(v) => write!(f, "Bool({v})"),
            Param::Bytes(v) => write!(f, "Bytes({:?})", String::from_utf8_lossy(v)),
            Param::Text(v) => write!(f, "Text({v:?})"),
            Param::Bare(v) => write!(f, "Bare({v:?})"),
            Param::Timestamp(v) => write!(f, "Timestamp({v})"),
            Param::Valuer(_) => write!(f, "Valuer(..)"),
        }
    }
}

impl From<i64> for Param {
    fn from(v: i64) -> Self {
        Param::Int64(v)
    }
}

impl From<i32> for Param {
    fn from(v: i32) -> Self {
        Param::Int64(v.into())
    }
}

impl From<f64> for Param {
    fn from(v: f64) -> Self {
        Param::Float64(v)
    }
}

impl From<bool> for Param {
    fn from(v: bool) -> Self {
        Param::Bool(v)
    }
}

impl From<&str> for Param {
    fn from(v: &str) -> Self {
        Param::Text(v.to_string())
    }
}

impl From<String> for Param {
    fn from(v: String) -> Self {
        Param::Text(v)
    }
}

impl From<Vec<u8>> for Param {
    fn from(v: Vec<u8>) -> Self {
        Param::Bytes(v)
    }
}

impl From<&[u8]> for Param {
    fn from(v: &[u8]) -> Self {
        Param::Bytes(v.to_vec())
    }
}

impl From<DateTime<Utc>> for Param {
    fn from(v: DateTime<Utc>) -> Self {
        Param::Timestamp(v)
    }
}

impl<T: Into<Param>> From<Option<T>> for Param {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Param::Null)
    }
}

// ════════════════════════════════════════════════════════════════
//  NamedValue
// ════════════════════════════════════════════════════════════════

/// Parameter with its 1-based ordinal and optional name.
#[derive(Debug, Clone)]
pub struct NamedValue {
    pub name: Option<String>,
    pub ordinal: usize,
    pub value: Param,
}

impl NamedValue {
    pub fn positional(ordinal: usize, value: impl Into<Param>) -> Self {
        Self { name: None, ordinal, value: value.into() }
    }

    pub fn named(name: impl Into<String>, ordinal: usize, value: impl Into<Param>) -> Self {
        Self { name: Some(name.into()), ordinal, value: value.into() }
    }
}

/// Positional parameters numbered from 1 in iteration order.
pub fn positional<I, P>(values: I) -> Vec<NamedValue>
where
    I: IntoIterator<Item = P>,
    P: Into<Param>,
{
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| NamedValue::positional(i + 1, v))
        .collect()
}

// ════════════════════════════════════════════════════════════════
//  Interpolation
// ════════════════════════════════════════════════════════════════

/// Render `args` into `query`.
///
/// Each `?` consumes the next parameter in list order (named ones
/// included). Afterwards every `$name$` token is replaced by the parameter
/// carrying that name, in a single left-to-right pass.
pub fn interpolate(query: &str, args: &[NamedValue]) -> Result<String, ParamError> {
    let named = NamedExpander::build(args)?;

    let mut out = String::with_capacity(query.len());
    let mut next = args.iter();
    for ch in query.chars() {
        if ch == PLACEHOLDER {
            let arg = next.next().ok_or(ParamError::TooFewParameters)?;
            format_param(&mut out, &arg.value)?;
        } else {
            out.push(ch);
        }
    }
    Ok(named.replace(&out))
}

/// Render one parameter as it would appear in query text.
pub fn format_literal(value: &Param) -> Result<String, ParamError> {
    let mut out = String::new();
    format_param(&mut out, value)?;
    Ok(out)
}

fn format_param(buf: &mut String, val: &Param) -> Result<(), ParamError> {
    match val {
        Param::Valuer(valuer) => {
            let resolved = valuer.value().map_err(ParamError::Valuer)?;
            if let Param::Valuer(_) = resolved {
                return Err(unknown(&resolved));
            }
            format_resolved(buf, &resolved)
        }
        other => format_resolved(buf, other),
    }
}

fn format_resolved(buf: &mut String, val: &Param) -> Result<(), ParamError> {
    match val {
        Param::Int64(v) => buf.push_str(&v.to_string()),
        // No numeric literal spells inf or NaN.
        Param::Float64(v) if !v.is_finite() => return Err(unknown(val)),
        Param::Float64(v) => buf.push_str(&v.to_string()),
        Param::Bool(v) => buf.push_str(if *v { "true" } else { "false" }),
        Param::Bytes(v) => {
            buf.push('\'');
            buf.push_str(&String::from_utf8_lossy(v));
            buf.push('\'');
        }
        Param::Text(v) => {
            buf.push('\'');
            buf.push_str(v);
            buf.push('\'');
        }
        Param::Bare(v) => buf.push_str(v),
        Param::Timestamp(v) => {
            buf.push('\'');
            buf.push_str(&format_timestamp(v));
            buf.push('\'');
        }
        Param::Null | Param::Valuer(_) => return Err(unknown(val)),
    }
    Ok(())
}

fn unknown(val: &Param) -> ParamError {
    ParamError::UnknownParameterType {
        type_name: val.type_name(),
        value: format!("{val:?}"),
    }
}

/// `YYYY-MM-DD HH:MM:SS[.fffffffff]`, fraction trimmed of trailing zeros.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    let mut s = ts.format(TIMESTAMP_LAYOUT).to_string();
    let nanos = ts.timestamp_subsec_nanos();
    if nanos != 0 {
        let frac = format!("{nanos:09}");
        s.push('.');
        s.push_str(frac.trim_end_matches('0'));
    }
    s
}

/// Fixed-token replacer for `$name$` placeholders.
struct NamedExpander {
    /// `(token, literal)` in registration order.
    pairs: Vec<(String, String)>,
}

impl NamedExpander {
    fn build(args: &[NamedValue]) -> Result<Self, ParamError> {
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for nv in args {
            let Some(name) = nv.name.as_deref().filter(|n| !n.is_empty()) else {
                continue;
            };
            if !seen.insert(name) {
                return Err(ParamError::DuplicateNamedParameter(name.to_string()));
            }
            let literal = format_literal(&nv.value).map_err(|e| ParamError::Named {
                name: name.to_string(),
                source: Box::new(e),
            })?;
            pairs.push((format!("{NAMED_DELIMITER}{name}{NAMED_DELIMITER}"), literal));
        }
        Ok(Self { pairs })
    }

    /// Replaced text is never rescanned.
    fn replace(&self, s: &str) -> String {
        if self.pairs.is_empty() {
            return s.to_string();
        }
        let mut out = String::with_capacity(s.len());
        let mut rest = s;
        'outer: while let Some(ch) = rest.chars().next() {
            for (token, literal) in &self.pairs {
                if rest.starts_with(token.as_str()) {
                    out.push_str(literal);
                    rest = &rest[token.len()..];
                    continue 'outer;
                }
            }
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct Fixed(Param);

    impl Valuer for Fixed {
        fn value(&self) -> Result<Param, BoxError> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    impl Valuer for Failing {
        fn value(&self) -> Result<Param, BoxError> {
            Err("no value".into())
        }
    }

    #[test]
    fn positional_integer() {
        let q = interpolate("SELECT name FROM t WHERE age = ?", &positional([20i64])).unwrap();
        assert_eq!(q, "SELECT name FROM t WHERE age = 20");
    }

    #[test]
    fn named_text_is_quoted() {
        let args = [NamedValue::named("name", 1, "yuno")];
        let q = interpolate("SELECT age FROM t WHERE name = $name$", &args).unwrap();
        assert_eq!(q, "SELECT age FROM t WHERE name = 'yuno'");
    }

    #[test]
    fn bare_value_is_not_quoted() {
        let q = interpolate("SELECT * FROM t WHERE time > ago(?)", &positional([Param::bare("7d")]))
            .unwrap();
        assert_eq!(q, "SELECT * FROM t WHERE time > ago(7d)");
    }

    #[test]
    fn markers_replaced_in_template_order() {
        let args = positional::<_, Param>([
            1i64.into(),
            2.5f64.into(),
            true.into(),
            "x".into(),
            b"raw".as_slice().into(),
        ]);
        let q = interpolate("? ? ? ? ?", &args).unwrap();
        assert_eq!(q, "1 2.5 true 'x' 'raw'");
    }

    #[test]
    fn too_few_parameters_never_partially_succeeds() {
        let err = interpolate("? AND ?", &positional([1i64])).unwrap_err();
        assert!(matches!(err, ParamError::TooFewParameters));
        let err = interpolate("?", &[]).unwrap_err();
        assert!(matches!(err, ParamError::TooFewParameters));
    }

    #[test]
    fn extra_parameters_are_ignored() {
        assert_eq!(interpolate("x = ?", &positional([1i64, 2])).unwrap(), "x = 1");
        assert_eq!(interpolate("no markers", &positional([1i64])).unwrap(), "no markers");
    }

    #[test]
    fn duplicate_names_rejected() {
        let args = [NamedValue::named("a", 1, 1i64), NamedValue::named("a", 2, 2i64)];
        let err = interpolate("$a$", &args).unwrap_err();
        assert!(matches!(err, ParamError::DuplicateNamedParameter(ref n) if n == "a"));
    }

    #[test]
    fn empty_name_is_positional_only() {
        let args = [NamedValue::named("", 1, 3i64)];
        assert_eq!(interpolate("? $$", &args).unwrap(), "3 $$");
    }

    #[test]
    fn named_and_positional_mix() {
        let args = [
            NamedValue::positional(1, 10i64),
            NamedValue::named("region", 2, "eu"),
        ];
        let q = interpolate("a = ? AND r = $region$ AND r2 = $region$", &args).unwrap();
        assert_eq!(q, "a = 10 AND r = 'eu' AND r2 = 'eu'");
    }

    #[test]
    fn integer_boundaries_round_trip() {
        for v in [0i64, 1, -1, i64::MIN, i64::MAX] {
            let text = format_literal(&Param::Int64(v)).unwrap();
            assert_eq!(text.parse::<i64>().unwrap(), v);
        }
    }

    #[test]
    fn float_shortest_round_trip() {
        assert_eq!(format_literal(&Param::Float64(0.1)).unwrap(), "0.1");
        assert_eq!(format_literal(&Param::Float64(1e21)).unwrap(), "1000000000000000000000");
        assert_eq!(format_literal(&Param::Float64(-3.0)).unwrap(), "-3");
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        for v in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let err = interpolate("SELECT ?", &positional([v])).unwrap_err();
            assert!(matches!(err, ParamError::UnknownParameterType { type_name: "float64", .. }));
        }
    }

    #[test]
    fn timestamp_uses_fixed_layout() {
        let ts = Utc.with_ymd_and_hms(2010, 1, 1, 12, 34, 56).unwrap();
        assert_eq!(format_literal(&ts.into()).unwrap(), "'2010-01-01 12:34:56'");

        let ts = ts + chrono::Duration::nanoseconds(120_000_000);
        assert_eq!(format_literal(&ts.into()).unwrap(), "'2010-01-01 12:34:56.12'");
    }

    #[test]
    fn valuer_resolves_once() {
        let v = Param::valuer(Fixed(Param::bare("1h")));
        assert_eq!(format_literal(&v).unwrap(), "1h");

        let chained = Param::valuer(Fixed(Param::valuer(Fixed(1i64.into()))));
        let err = format_literal(&chained).unwrap_err();
        assert!(matches!(err, ParamError::UnknownParameterType { type_name: "valuer", .. }));
    }

    #[test]
    fn valuer_failure_propagates() {
        let err = interpolate("?", &positional([Param::valuer(Failing)])).unwrap_err();
        assert!(matches!(err, ParamError::Valuer(_)));
        assert!(err.to_string().contains("no value"));
    }

    #[test]
    fn null_is_unknown_parameter_type() {
        let err = interpolate("?", &positional([Option::<i64>::None])).unwrap_err();
        assert!(matches!(err, ParamError::UnknownParameterType { type_name: "null", .. }));
        assert!(err.to_string().contains("null"));
    }

    #[test]
    fn named_format_failure_names_the_parameter() {
        let args = [NamedValue::named("who", 1, Param::Null)];
        let err = interpolate("$who$", &args).unwrap_err();
        assert!(matches!(err, ParamError::Named { ref name, .. } if name == "who"));
    }

    #[test]
    fn substituted_text_is_not_rescanned() {
        let args = [NamedValue::named("a", 1, "$b$"), NamedValue::named("b", 2, "B")];
        assert_eq!(interpolate("$a$ $b$", &args).unwrap(), "'$b$' 'B'");
    }
}
