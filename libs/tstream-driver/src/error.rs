use tstream_api::WireError;

/// Boxed error returned by user-supplied valuers and query services.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Parameter interpolation failure. Nothing is returned on failure, not
/// even a partial query.
#[derive(Debug, thiserror::Error)]
pub enum ParamError {
    #[error("too few parameters passed")]
    TooFewParameters,

    #[error("named parameter ({0:?}) appears multiple times")]
    DuplicateNamedParameter(String),

    #[error("unknown parameter: {value} ({type_name})")]
    UnknownParameterType { type_name: &'static str, value: String },

    #[error("cannot format parameter: {0}")]
    Valuer(#[source] BoxError),

    #[error("cannot format parameter ${name}$: {source}")]
    Named {
        name: String,
        #[source]
        source: Box<ParamError>,
    },
}

/// Cell or array decoding failure.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("out of range: {0}")]
    OutOfRange(String),

    #[error("malformed temporal value {value:?}: {source}")]
    MalformedTemporalValue {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("cannot convert {0}")]
    UnsupportedScalarTag(String),

    #[error("invalid integer {value:?}: {source}")]
    InvalidInteger {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("invalid float {value:?}: {source}")]
    InvalidFloat {
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("array element {index}: {source}")]
    ArrayElementParseFailure {
        index: usize,
        #[source]
        source: Box<DecodeError>,
    },

    #[error("column ({0}) not handled")]
    MissingColumnType(String),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("row has {actual} values, expected {expected}")]
    ColumnCountMismatch { expected: usize, actual: usize },

    #[error("destination has {slots} slots for {columns} columns")]
    DestinationTooSmall { columns: usize, slots: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid DSN: {0}")]
    InvalidDsn(#[from] url::ParseError),

    #[error("invalid DSN scheme: {0}")]
    InvalidScheme(String),

    #[error("read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Failure reported by the query service. Never retried here.
#[derive(Debug, thiserror::Error)]
#[error("query service: {0}")]
pub struct ServiceError(#[source] pub BoxError);

impl ServiceError {
    pub fn new(err: impl Into<BoxError>) -> Self {
        Self(err.into())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("wire format: {0}")]
    Wire(#[from] WireError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}
