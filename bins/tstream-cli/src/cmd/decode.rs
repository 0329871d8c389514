use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};

use clap::Args;
use tstream_driver::{
    Connection, PageFuture, QueryOutput, QueryRequest, QueryService, ServiceError, Value, array,
};

use super::error::CliError;

#[derive(Args, Clone, Debug)]
pub struct DecodeArgs {
    /// JSON array of recorded `QueryOutput` pages.
    #[arg(long)]
    pub input: String,

    /// Query text to replay the pages for. Only logged.
    #[arg(long, default_value = "SELECT *")]
    pub query: String,
}

// ═══════════════════════════════════════════════════════════════
//  Replay service
// ═══════════════════════════════════════════════════════════════

/// Serves recorded pages in file order, ignoring the request.
pub struct Replay {
    pages: Mutex<VecDeque<QueryOutput>>,
}

impl Replay {
    pub fn new(pages: Vec<QueryOutput>) -> Self {
        Self { pages: Mutex::new(pages.into()) }
    }
}

impl QueryService for Replay {
    fn query_page(&self, request: &QueryRequest) -> PageFuture<'_> {
        tracing::debug!(next_token = ?request.next_token, "replaying page");
        let page = match self.pages.lock() {
            Ok(mut pages) => pages
                .pop_front()
                .ok_or_else(|| ServiceError::new("recording ends before the last page")),
            Err(_) => Err(ServiceError::new("replay state poisoned")),
        };
        Box::pin(async move { page })
    }
}

// ═══════════════════════════════════════════════════════════════
//  Command
// ═══════════════════════════════════════════════════════════════

pub async fn run(args: &DecodeArgs) -> Result<(), CliError> {
    let content = std::fs::read_to_string(&args.input).map_err(|source| CliError::Read {
        path: args.input.clone(),
        source,
    })?;
    let pages: Vec<QueryOutput> = serde_json::from_str(&content)?;
    tracing::info!(input = %args.input, pages = pages.len(), "replaying recording");

    let lines = decode_pages(pages, &args.query).await?;
    let mut out = std::io::stdout().lock();
    for line in lines {
        // Broken pipe on stdout just ends the listing.
        if writeln!(out, "{line}").is_err() {
            break;
        }
    }
    Ok(())
}

/// Decode every recorded row into a JSON object keyed by column name.
pub async fn decode_pages(
    pages: Vec<QueryOutput>,
    query: &str,
) -> Result<Vec<serde_json::Value>, CliError> {
    let conn = Connection::new(Arc::new(Replay::new(pages)));
    let rows = conn.query(query, &[]).await?;
    let names = rows.columns().to_vec();

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let row = row.map_err(tstream_driver::DriverError::from)?;
        let mut obj = serde_json::Map::with_capacity(names.len());
        for (name, cell) in names.iter().zip(row) {
            obj.insert(name.clone(), materialize(cell)?);
        }
        out.push(serde_json::Value::Object(obj));
    }
    Ok(out)
}

fn materialize(cell: Value) -> Result<serde_json::Value, CliError> {
    if !matches!(cell, Value::Array(_)) {
        return Ok(serde_json::Value::from(&cell));
    }
    let mut expanded = Value::Null;
    if let Some(scanner) = array(&mut expanded) {
        scanner
            .scan_value(&cell)
            .map_err(tstream_driver::DriverError::from)?;
    }
    Ok(serde_json::Value::from(&expanded))
}
