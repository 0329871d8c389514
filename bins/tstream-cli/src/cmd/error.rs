use tstream_driver::{ConfigError, DriverError, ParamError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("invalid parameter {text:?}: {reason}")]
    InvalidParam { text: String, reason: String },

    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("bad pages file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Param(#[from] ParamError),

    #[error("{0}")]
    Driver(#[from] DriverError),
}

impl CliError {
    pub fn invalid_param(text: &str, reason: impl Into<String>) -> Self {
        CliError::InvalidParam {
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}
