use std::sync::Arc;

use crate::error::DriverError;
use crate::params::{self, NamedValue, Param};
use crate::rows::Rows;
use crate::service::{self, QueryService};

/// Query entry point: interpolates parameters, drains the service's pages
/// and hands back a buffered cursor.
#[derive(Clone)]
pub struct Connection {
    service: Arc<dyn QueryService>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection").finish_non_exhaustive()
    }
}

impl Connection {
    pub fn new(service: Arc<dyn QueryService>) -> Self {
        Self { service }
    }

    /// Run `query` with `args`.
    ///
    /// Parameter errors are reported before the service is contacted.
    pub async fn query(&self, query: &str, args: &[NamedValue]) -> Result<Rows, DriverError> {
        let text = params::interpolate(query, args)?;
        tracing::debug!(params = args.len(), template = %query, "executing query");

        let result = service::fetch_all(self.service.as_ref(), text).await?;
        tracing::debug!(
            pages = result.pages,
            columns = result.columns.len(),
            rows = result.rows.len(),
            "query complete"
        );
        Ok(Rows::new(result.columns, result.rows))
    }

    pub fn prepare(&self, query: impl Into<String>) -> Statement {
        Statement {
            query: query.into(),
            conn: self.clone(),
        }
    }
}

/// Prepared query text bound to a connection. Nothing is sent to the
/// service until it is queried.
#[derive(Debug, Clone)]
pub struct Statement {
    query: String,
    conn: Connection,
}

impl Statement {
    pub fn query_text(&self) -> &str {
        &self.query
    }

    /// Run with positional arguments; ordinals start at 1.
    pub async fn query<I, P>(&self, args: I) -> Result<Rows, DriverError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Param>,
    {
        let args = params::positional(args);
        self.conn.query(&self.query, &args).await
    }

    /// Run with explicit named and positional values.
    pub async fn query_named(&self, args: &[NamedValue]) -> Result<Rows, DriverError> {
        self.conn.query(&self.query, args).await
    }
}
