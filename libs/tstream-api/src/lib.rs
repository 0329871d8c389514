//! Data model shared by the driver: column descriptors, wire values,
//! decoded values and the JSON shapes of the query service.

pub mod error;
pub mod schema;
pub mod value;
pub mod wire;

pub use error::WireError;
pub use schema::{ColumnInfo, ColumnType, DATABASE_TYPE_UNKNOWN, ScalarType, ScanType};
pub use value::{Datum, DeferredArray, Row, Value};
pub use wire::QueryOutput;
