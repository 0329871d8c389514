use std::future::Future;
use std::pin::Pin;

use tstream_api::{ColumnInfo, QueryOutput, Row};

use crate::error::{DriverError, ServiceError};

/// Future returned by [`QueryService::query_page`].
pub type PageFuture<'a> = Pin<Box<dyn Future<Output = Result<QueryOutput, ServiceError>> + Send + 'a>>;

/// One page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// Final query text, parameters already interpolated.
    pub query: String,
    /// Token from the previous page; `None` for the first one.
    pub next_token: Option<String>,
}

/// Remote query service. Transport, signing and retries live behind it.
pub trait QueryService: Send + Sync {
    fn query_page(&self, request: &QueryRequest) -> PageFuture<'_>;
}

/// Every page of one query merged into a single buffered result.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub columns: Vec<ColumnInfo>,
    pub rows: Vec<Row>,
    pub pages: usize,
}

/// Fetch pages until the service stops returning a `NextToken`.
///
/// Column descriptors come from the first page that carries any; rows are
/// concatenated in page order.
pub async fn fetch_all(service: &dyn QueryService, query: String) -> Result<ResultSet, DriverError> {
    let mut request = QueryRequest { query, next_token: None };
    let mut result = ResultSet::default();
    loop {
        let page = service.query_page(&request).await?;
        result.pages += 1;

        if result.columns.is_empty() && !page.column_info.is_empty() {
            result.columns = page
                .column_info
                .into_iter()
                .map(ColumnInfo::try_from)
                .collect::<Result<_, _>>()?;
        }
        for row in page.rows {
            result.rows.push(Row::try_from(row)?);
        }

        tracing::trace!(
            page = result.pages,
            rows = result.rows.len(),
            query_id = page.query_id.as_deref().unwrap_or_default(),
            "page received"
        );

        match page.next_token {
            Some(token) => request.next_token = Some(token),
            None => break,
        }
    }
    Ok(result)
}
