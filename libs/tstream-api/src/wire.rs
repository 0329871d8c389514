//! Serde shapes of the query service's JSON and their conversion into the
//! checked sum types of [`crate::schema`] and [`crate::value`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::WireError;
use crate::schema::{ColumnInfo, ColumnType, ScalarType};
use crate::value::{Datum, Row};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireColumnInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub r#type: WireType,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalar_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_column_info: Option<Box<WireColumnInfo>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireDatum {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalar_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_value: Option<Vec<WireDatum>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub null_value: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireRow {
    #[serde(default)]
    pub data: Vec<WireDatum>,
}

/// One page of a query response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryOutput {
    #[serde(default)]
    pub column_info: Vec<WireColumnInfo>,
    #[serde(default)]
    pub rows: Vec<WireRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_id: Option<String>,
}

// ════════════════════════════════════════════════════════════════
//  Wire → model
// ════════════════════════════════════════════════════════════════

impl TryFrom<WireColumnInfo> for ColumnInfo {
    type Error = WireError;

    fn try_from(wire: WireColumnInfo) -> Result<Self, WireError> {
        let column_type = match (wire.r#type.scalar_type, wire.r#type.array_column_info) {
            (Some(_), Some(_)) => {
                return Err(WireError::AmbiguousColumnType(wire.name.unwrap_or_default()));
            }
            (Some(tag), None) => Some(ColumnType::Scalar(ScalarType::from(tag.as_str()))),
            (None, Some(elem)) => {
                let elem = ColumnInfo::try_from(*elem).map_err(|e| e.within(wire.name.as_deref()))?;
                Some(ColumnType::Array(Arc::new(elem)))
            }
            (None, None) => None,
        };
        Ok(ColumnInfo::new(wire.name, column_type))
    }
}

impl TryFrom<WireDatum> for Datum {
    type Error = WireError;

    fn try_from(wire: WireDatum) -> Result<Self, WireError> {
        match (wire.scalar_value, wire.array_value) {
            (Some(_), Some(_)) => Err(WireError::AmbiguousDatum),
            (Some(text), None) => Ok(Datum::Scalar(text)),
            (None, Some(items)) => items
                .into_iter()
                .map(Datum::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Datum::Array),
            // Absent value or explicit `NullValue`.
            (None, None) => Ok(Datum::Null),
        }
    }
}

impl TryFrom<WireRow> for Row {
    type Error = WireError;

    fn try_from(wire: WireRow) -> Result<Self, WireError> {
        wire.data
            .into_iter()
            .map(Datum::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map(Row)
    }
}

// ════════════════════════════════════════════════════════════════
//  Model → wire
// ════════════════════════════════════════════════════════════════

impl From<&ColumnInfo> for WireColumnInfo {
    fn from(info: &ColumnInfo) -> Self {
        let r#type = match &info.column_type {
            Some(ColumnType::Scalar(s)) => WireType {
                scalar_type: Some(s.as_str().to_string()),
                array_column_info: None,
            },
            Some(ColumnType::Array(elem)) => WireType {
                scalar_type: None,
                array_column_info: Some(Box::new(WireColumnInfo::from(elem.as_ref()))),
            },
            None => WireType::default(),
        };
        Self { name: info.name.clone(), r#type }
    }
}

impl From<&Datum> for WireDatum {
    fn from(datum: &Datum) -> Self {
        match datum {
            Datum::Null => WireDatum { null_value: Some(true), ..Default::default() },
            Datum::Scalar(s) => WireDatum { scalar_value: Some(s.clone()), ..Default::default() },
            Datum::Array(items) => WireDatum {
                array_value: Some(items.iter().map(WireDatum::from).collect()),
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_service_page() {
        let page: QueryOutput = serde_json::from_str(
            r#"{
                "ColumnInfo": [
                    {"Name": "n", "Type": {"ScalarType": "INTEGER"}},
                    {"Name": "tags", "Type": {"ArrayColumnInfo": {"Type": {"ScalarType": "VARCHAR"}}}}
                ],
                "Rows": [{"Data": [{"ScalarValue": "1"}, {"ArrayValue": [{"ScalarValue": "a"}]}]}],
                "NextToken": "t1"
            }"#,
        )
        .unwrap();
        assert_eq!(page.next_token.as_deref(), Some("t1"));

        let cols: Vec<ColumnInfo> = page
            .column_info
            .into_iter()
            .map(ColumnInfo::try_from)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(cols[0], ColumnInfo::scalar("n", ScalarType::Integer));
        assert_eq!(cols[1], ColumnInfo::array("tags", ColumnInfo::element(ScalarType::Varchar)));

        let row = Row::try_from(page.rows[0].clone()).unwrap();
        assert_eq!(row.0, vec![Datum::scalar("1"), Datum::array_of(["a"])]);
    }

    #[test]
    fn null_and_empty_datums_become_null() {
        let explicit: WireDatum = serde_json::from_str(r#"{"NullValue": true}"#).unwrap();
        let empty: WireDatum = serde_json::from_str("{}").unwrap();
        assert_eq!(Datum::try_from(explicit).unwrap(), Datum::Null);
        assert_eq!(Datum::try_from(empty).unwrap(), Datum::Null);
    }

    #[test]
    fn rejects_datum_with_both_variants() {
        let wire: WireDatum =
            serde_json::from_str(r#"{"ScalarValue": "1", "ArrayValue": []}"#).unwrap();
        assert!(matches!(Datum::try_from(wire), Err(WireError::AmbiguousDatum)));
    }

    #[test]
    fn rejects_column_with_both_kinds() {
        let wire: WireColumnInfo = serde_json::from_str(
            r#"{"Name": "bad", "Type": {"ScalarType": "INTEGER", "ArrayColumnInfo": {"Type": {}}}}"#,
        )
        .unwrap();
        let err = ColumnInfo::try_from(wire).unwrap_err();
        assert!(matches!(err, WireError::AmbiguousColumnType(ref n) if n == "bad"));
    }

    #[test]
    fn column_without_type_has_no_kind() {
        let wire: WireColumnInfo = serde_json::from_str(r#"{"Name": "x"}"#).unwrap();
        assert_eq!(ColumnInfo::try_from(wire).unwrap().column_type, None);
    }

    #[test]
    fn model_converts_back_to_wire() {
        let info = ColumnInfo::array(
            "m",
            ColumnInfo::new(None, Some(ColumnType::Array(Arc::new(ColumnInfo::element(ScalarType::Bigint))))),
        );
        let back = ColumnInfo::try_from(WireColumnInfo::from(&info)).unwrap();
        assert_eq!(back, info);

        let datum = Datum::Array(vec![Datum::Null, Datum::array_of(["1", "2"])]);
        assert_eq!(Datum::try_from(WireDatum::from(&datum)).unwrap(), datum);
    }
}
