/// Malformed service payload, rejected where wire JSON becomes model types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    #[error("column '{0}' declares both a scalar and an array type")]
    AmbiguousColumnType(String),

    #[error("datum carries both a scalar and an array value")]
    AmbiguousDatum,

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<WireError>,
    },
}

impl WireError {
    /// Prefix the error with the enclosing column name, if there is one.
    pub fn within(self, column: Option<&str>) -> Self {
        match column {
            Some(name) => WireError::Context {
                context: format!("column '{name}'"),
                source: Box::new(self),
            },
            None => self,
        }
    }
}
