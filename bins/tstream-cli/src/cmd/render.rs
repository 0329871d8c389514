use chrono::{DateTime, Utc};
use clap::Args;
use tstream_driver::{NamedValue, Param, interpolate};

use super::error::CliError;

#[derive(Args, Clone, Debug)]
pub struct RenderArgs {
    /// Query template with `?` and `$name$` placeholders.
    #[arg(long)]
    pub query: String,

    /// Positional value as `<kind>:<value>`; kinds are int, float, bool,
    /// text, bare, bytes and ts (RFC 3339).
    #[arg(long = "param")]
    pub params: Vec<String>,

    /// Named value as `<name>=<kind>:<value>`.
    #[arg(long = "named")]
    pub named: Vec<String>,
}

pub fn run(args: &RenderArgs) -> Result<(), CliError> {
    let values = collect_values(args)?;
    let query = interpolate(&args.query, &values)?;
    println!("{query}");
    Ok(())
}

/// Positional values first, then named ones; ordinals follow that order.
fn collect_values(args: &RenderArgs) -> Result<Vec<NamedValue>, CliError> {
    let mut values = Vec::with_capacity(args.params.len() + args.named.len());
    for text in &args.params {
        values.push(NamedValue::positional(values.len() + 1, parse_param(text)?));
    }
    for text in &args.named {
        let (name, rest) = text
            .split_once('=')
            .ok_or_else(|| CliError::invalid_param(text, "expected <name>=<kind>:<value>"))?;
        values.push(NamedValue::named(name, values.len() + 1, parse_param(rest)?));
    }
    Ok(values)
}

pub fn parse_param(text: &str) -> Result<Param, CliError> {
    let (kind, raw) = text
        .split_once(':')
        .ok_or_else(|| CliError::invalid_param(text, "expected <kind>:<value>"))?;
    let bad = |e: &dyn std::fmt::Display| CliError::invalid_param(text, e.to_string());
    Ok(match kind {
        "int" => Param::Int64(raw.parse().map_err(|e| bad(&e))?),
        "float" => Param::Float64(raw.parse().map_err(|e| bad(&e))?),
        "bool" => Param::Bool(raw.parse().map_err(|e| bad(&e))?),
        "text" => Param::Text(raw.to_string()),
        "bare" => Param::bare(raw),
        "bytes" => Param::Bytes(raw.as_bytes().to_vec()),
        "ts" => {
            let ts = DateTime::parse_from_rfc3339(raw).map_err(|e| bad(&e))?;
            Param::Timestamp(ts.with_timezone(&Utc))
        }
        other => return Err(CliError::invalid_param(text, format!("unknown kind {other:?}"))),
    })
}
