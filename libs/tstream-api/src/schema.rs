use std::sync::Arc;

// ════════════════════════════════════════════════════════════════
//  Scalar Type
// ════════════════════════════════════════════════════════════════

/// Database-type-name reported for array columns and columns without a
/// type descriptor.
pub const DATABASE_TYPE_UNKNOWN: &str = "UNKNOWN";

/// Scalar type tag carried by every scalar column.
///
/// Tags the driver does not know are kept verbatim in `Other` so the
/// decoder can name them in its error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Integer,
    Bigint,
    Double,
    Boolean,
    Varchar,
    /// `YYYY-MM-DD`, UTC midnight.
    Date,
    /// Same layout as `Timestamp`.
    Time,
    /// `YYYY-MM-DD HH:MM:SS.sssssssss`, UTC.
    Timestamp,
    /// Opaque text, e.g. `0 01:00:00.000000000`.
    IntervalDayToSecond,
    /// Opaque text.
    IntervalYearToMonth,
    /// Type of a bare `NULL` literal; always decodes to null.
    Unknown,
    Other(String),
}

impl ScalarType {
    /// Wire name of the tag (`INTEGER`, `BIGINT`, ...).
    pub fn as_str(&self) -> &str {
        match self {
            ScalarType::Integer => "INTEGER",
            ScalarType::Bigint => "BIGINT",
            ScalarType::Double => "DOUBLE",
            ScalarType::Boolean => "BOOLEAN",
            ScalarType::Varchar => "VARCHAR",
            ScalarType::Date => "DATE",
            ScalarType::Time => "TIME",
            ScalarType::Timestamp => "TIMESTAMP",
            ScalarType::IntervalDayToSecond => "INTERVAL_DAY_TO_SECOND",
            ScalarType::IntervalYearToMonth => "INTERVAL_YEAR_TO_MONTH",
            ScalarType::Unknown => DATABASE_TYPE_UNKNOWN,
            ScalarType::Other(tag) => tag,
        }
    }

    /// Native type a caller should scan a cell of this tag into.
    pub fn scan_type(&self) -> ScanType {
        match self {
            ScalarType::Integer => ScanType::Int,
            ScalarType::Bigint => ScanType::Int64,
            ScalarType::Double => ScanType::Float64,
            ScalarType::Boolean => ScanType::Bool,
            ScalarType::Varchar
            | ScalarType::IntervalDayToSecond
            | ScalarType::IntervalYearToMonth => ScanType::String,
            ScalarType::Date | ScalarType::Time | ScalarType::Timestamp => ScanType::Timestamp,
            ScalarType::Unknown => ScanType::Null,
            ScalarType::Other(_) => ScanType::Any,
        }
    }
}

impl From<&str> for ScalarType {
    fn from(tag: &str) -> Self {
        match tag {
            "INTEGER" => ScalarType::Integer,
            "BIGINT" => ScalarType::Bigint,
            "DOUBLE" => ScalarType::Double,
            "BOOLEAN" => ScalarType::Boolean,
            "VARCHAR" => ScalarType::Varchar,
            "DATE" => ScalarType::Date,
            "TIME" => ScalarType::Time,
            "TIMESTAMP" => ScalarType::Timestamp,
            "INTERVAL_DAY_TO_SECOND" => ScalarType::IntervalDayToSecond,
            "INTERVAL_YEAR_TO_MONTH" => ScalarType::IntervalYearToMonth,
            "UNKNOWN" => ScalarType::Unknown,
            other => ScalarType::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ════════════════════════════════════════════════════════════════
//  Scan Type
// ════════════════════════════════════════════════════════════════

/// Native kind inferred for a column, independent of row position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanType {
    /// Machine integer (`INTEGER`).
    Int,
    /// Signed 64-bit (`BIGINT`). Values above `i64::MAX` arrive as `u64`.
    Int64,
    Float64,
    Bool,
    String,
    Timestamp,
    /// Column only ever holds nulls.
    Null,
    /// Resolved by the caller (arrays, absent or unrecognized types).
    Any,
}

impl std::fmt::Display for ScanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanType::Int => write!(f, "int"),
            ScanType::Int64 => write!(f, "int64"),
            ScanType::Float64 => write!(f, "float64"),
            ScanType::Bool => write!(f, "bool"),
            ScanType::String => write!(f, "string"),
            ScanType::Timestamp => write!(f, "timestamp"),
            ScanType::Null => write!(f, "null"),
            ScanType::Any => write!(f, "any"),
        }
    }
}

// ════════════════════════════════════════════════════════════════
//  Column Type & ColumnInfo
// ════════════════════════════════════════════════════════════════

/// Column type: a scalar tag or an array of another column type,
/// nested to any depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    Scalar(ScalarType),
    /// Descriptor of the elements. Shared with every deferred array
    /// decoded from this column.
    Array(Arc<ColumnInfo>),
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::Scalar(s) => write!(f, "{s}"),
            ColumnType::Array(elem) => match &elem.column_type {
                Some(t) => write!(f, "array<{t}>"),
                None => write!(f, "array<?>"),
            },
        }
    }
}

/// Descriptor of one result column. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: Option<String>,
    /// `None` when the service sent neither a scalar nor an array type.
    pub column_type: Option<ColumnType>,
}

impl ColumnInfo {
    pub fn new(name: Option<String>, column_type: Option<ColumnType>) -> Self {
        Self { name, column_type }
    }

    /// Shortcut: named scalar column.
    pub fn scalar(name: impl Into<String>, scalar: ScalarType) -> Self {
        Self::new(Some(name.into()), Some(ColumnType::Scalar(scalar)))
    }

    /// Shortcut: named array column with the given element descriptor.
    pub fn array(name: impl Into<String>, element: ColumnInfo) -> Self {
        Self::new(Some(name.into()), Some(ColumnType::Array(Arc::new(element))))
    }

    /// Shortcut: unnamed element descriptor, as nested inside arrays.
    pub fn element(scalar: ScalarType) -> Self {
        Self::new(None, Some(ColumnType::Scalar(scalar)))
    }

    /// Name for display and errors; empty when the service sent none.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Scalar tag, or `UNKNOWN` for arrays and absent types.
    pub fn database_type_name(&self) -> &str {
        match &self.column_type {
            Some(ColumnType::Scalar(s)) => s.as_str(),
            _ => DATABASE_TYPE_UNKNOWN,
        }
    }

    /// Arrays always scan generically: the element type is chosen later by
    /// the caller's array scanner.
    pub fn scan_type(&self) -> ScanType {
        match &self.column_type {
            Some(ColumnType::Scalar(s)) => s.scan_type(),
            _ => ScanType::Any,
        }
    }
}
