//! End-to-end: recorded service pages through `Connection` and `Rows`.

use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use tstream_driver::{
    Connection, DecodeError, NamedValue, PageFuture, Param, QueryOutput, QueryRequest,
    QueryService, ServiceError, Value, array,
};

struct Replay {
    pages: Mutex<Vec<QueryOutput>>,
    queries: Mutex<Vec<String>>,
}

impl Replay {
    fn from_json(json: &str) -> Arc<Self> {
        let mut pages: Vec<QueryOutput> = serde_json::from_str(json).unwrap();
        pages.reverse();
        Arc::new(Self { pages: Mutex::new(pages), queries: Mutex::new(Vec::new()) })
    }
}

impl QueryService for Replay {
    fn query_page(&self, request: &QueryRequest) -> PageFuture<'_> {
        self.queries.lock().unwrap().push(request.query.clone());
        let page = self.pages.lock().unwrap().pop();
        Box::pin(async move { page.ok_or_else(|| ServiceError::new("replay exhausted")) })
    }
}

const SCALARS: &str = r#"[
  {
    "QueryId": "q-1",
    "ColumnInfo": [
      {"Name": "int", "Type": {"ScalarType": "INTEGER"}},
      {"Name": "big", "Type": {"ScalarType": "BIGINT"}},
      {"Name": "dbl", "Type": {"ScalarType": "DOUBLE"}},
      {"Name": "ok", "Type": {"ScalarType": "BOOLEAN"}},
      {"Name": "txt", "Type": {"ScalarType": "VARCHAR"}},
      {"Name": "ds", "Type": {"ScalarType": "INTERVAL_DAY_TO_SECOND"}},
      {"Name": "ym", "Type": {"ScalarType": "INTERVAL_YEAR_TO_MONTH"}},
      {"Name": "nothing", "Type": {"ScalarType": "UNKNOWN"}},
      {"Name": "time", "Type": {"ScalarType": "TIME"}},
      {"Name": "date", "Type": {"ScalarType": "DATE"}},
      {"Name": "ts", "Type": {"ScalarType": "TIMESTAMP"}},
      {"Name": "missing", "Type": {"ScalarType": "INTEGER"}}
    ],
    "Rows": [
      {"Data": [
        {"ScalarValue": "1"},
        {"ScalarValue": "18446744073709551615"},
        {"ScalarValue": "0.5"},
        {"ScalarValue": "true"},
        {"ScalarValue": "hi"},
        {"ScalarValue": "0 01:00:00.000000000"},
        {"ScalarValue": "1-0"},
        {"NullValue": true},
        {"ScalarValue": "2020-08-31 12:34:56.789000000"},
        {"ScalarValue": "2020-08-31"},
        {"ScalarValue": "2020-08-31 12:34:56.000000000"},
        {"NullValue": true}
      ]}
    ]
  }
]"#;

#[tokio::test]
async fn decodes_every_scalar_tag() {
    let conn = Connection::new(Replay::from_json(SCALARS));
    let mut rows = conn.query("SELECT * FROM t", &[]).await.unwrap();

    assert_eq!(rows.column_count(), 12);
    assert_eq!(rows.column_type_database_type_name(5), "INTERVAL_DAY_TO_SECOND");

    let row = rows.next_row().unwrap().unwrap();
    assert_eq!(row[0], Value::Int64(1));
    assert_eq!(row[1], Value::UInt64(u64::MAX));
    assert_eq!(row[2], Value::Float64(0.5));
    assert_eq!(row[3], Value::Bool(true));
    assert_eq!(row[4], Value::String("hi".into()));
    assert_eq!(row[5], Value::String("0 01:00:00.000000000".into()));
    assert_eq!(row[6], Value::String("1-0".into()));
    assert_eq!(row[7], Value::Null);

    let time = Utc.with_ymd_and_hms(2020, 8, 31, 12, 34, 56).unwrap()
        + chrono::Duration::milliseconds(789);
    assert_eq!(row[8], Value::Timestamp(time));
    assert_eq!(row[9], Value::Timestamp(Utc.with_ymd_and_hms(2020, 8, 31, 0, 0, 0).unwrap()));
    assert_eq!(row[10], Value::Timestamp(Utc.with_ymd_and_hms(2020, 8, 31, 12, 34, 56).unwrap()));
    assert_eq!(row[11], Value::Null);

    assert!(rows.next_row().unwrap().is_none());
}

const ARRAYS: &str = r#"[
  {
    "ColumnInfo": [
      {"Name": "tags", "Type": {"ArrayColumnInfo": {"Type": {"ScalarType": "VARCHAR"}}}},
      {"Name": "grid", "Type": {"ArrayColumnInfo": {"Type": {"ArrayColumnInfo": {"Type": {"ScalarType": "INTEGER"}}}}}}
    ],
    "Rows": [
      {"Data": [
        {"ArrayValue": [{"ScalarValue": "abc"}, {"ScalarValue": "def"}]},
        {"ArrayValue": [
          {"ArrayValue": [{"ScalarValue": "1"}, {"ScalarValue": "2"}]},
          {"ArrayValue": [{"ScalarValue": "3"}, {"ScalarValue": "4"}]}
        ]}
      ]}
    ],
    "NextToken": "page-2"
  },
  {
    "Rows": [
      {"Data": [
        {"ArrayValue": [{"ScalarValue": "x"}]},
        {"NullValue": true}
      ]}
    ]
  }
]"#;

#[tokio::test]
async fn array_cells_scan_into_caller_types() {
    let service = Replay::from_json(ARRAYS);
    let conn = Connection::new(service.clone());
    let mut rows = conn
        .prepare("SELECT tags, grid FROM t WHERE region = ?")
        .query(["eu"])
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows.column_type_database_type_name(0), "UNKNOWN");

    let first = rows.next_row().unwrap().unwrap();
    let mut tags: Vec<String> = Vec::new();
    array(&mut tags).unwrap().scan_value(&first[0]).unwrap();
    assert_eq!(tags, ["abc", "def"]);

    let mut grid = Value::Null;
    array(&mut grid).unwrap().scan_value(&first[1]).unwrap();
    let flat: Vec<i64> = grid.flatten().into_iter().filter_map(Value::as_i64).collect();
    assert_eq!(flat, [1, 2, 3, 4]);

    // Second page reuses the first page's columns.
    let second = rows.next_row().unwrap().unwrap();
    array(&mut tags).unwrap().scan_value(&second[0]).unwrap();
    assert_eq!(tags, ["x"]);
    assert_eq!(second[1], Value::Null);

    assert_eq!(
        *service.queries.lock().unwrap(),
        ["SELECT tags, grid FROM t WHERE region = 'eu'"; 2]
    );
}

#[tokio::test]
async fn bad_cell_fails_its_row_only() {
    let json = r#"[{
      "ColumnInfo": [{"Name": "n", "Type": {"ScalarType": "BIGINT"}}],
      "Rows": [
        {"Data": [{"ScalarValue": "18446744073709551616"}]},
        {"Data": [{"ScalarValue": "-9223372036854775808"}]}
      ]
    }]"#;
    let conn = Connection::new(Replay::from_json(json));
    let mut rows = conn.query("SELECT n FROM t", &[]).await.unwrap();

    assert!(matches!(rows.next_row(), Err(DecodeError::OutOfRange(_))));
    assert_eq!(rows.next_row().unwrap().unwrap(), [Value::Int64(i64::MIN)]);
}

#[tokio::test]
async fn named_and_positional_values_mix() {
    let service = Replay::from_json(r#"[{"ColumnInfo": [], "Rows": []}]"#);
    let conn = Connection::new(service.clone());
    let args = [
        NamedValue::positional(1, 20i64),
        NamedValue::named("region", 2, "eu-west-1"),
        NamedValue::positional(3, Param::bare("7d")),
    ];
    let rows = conn
        .query(
            "SELECT * FROM t WHERE age = ? AND region = $region$ AND time > ago(?)",
            &args,
        )
        .await
        .unwrap();
    assert!(rows.is_empty());

    // Positional markers consume arguments in list order, named ones included.
    assert_eq!(
        service.queries.lock().unwrap()[0],
        "SELECT * FROM t WHERE age = 20 AND region = 'eu-west-1' AND time > ago('eu-west-1')"
    );
}
