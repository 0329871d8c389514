//! SQL driver core for the time-series query service.
//!
//! Parameters are interpolated client-side into the query text, pages are
//! merged into a buffered [`Rows`] cursor, and array cells are decoded only
//! when the caller picks a destination with [`array`].

pub mod array;
pub mod config;
pub mod conn;
pub mod decode;
pub mod error;
pub mod params;
pub mod rows;
pub mod service;

pub use array::{ArrayScanner, ScanTarget, array, scan_any};
pub use config::{Credentials, DRIVER_NAME, DriverConfig};
pub use conn::{Connection, Statement};
pub use decode::{decode_column, decode_scalar};
pub use error::{BoxError, ConfigError, DecodeError, DriverError, ParamError, ServiceError};
pub use params::{NamedValue, Param, Valuer, format_literal, interpolate, positional};
pub use rows::{Advance, CursorState, Rows};
pub use service::{PageFuture, QueryRequest, QueryService, ResultSet, fetch_all};

pub use tstream_api::{ColumnInfo, ColumnType, Datum, DeferredArray, QueryOutput, Row, ScalarType, ScanType, Value};
