mod cmd;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tstream", about = "Time-series query driver tools")]
struct Cli {
    /// Connection string, e.g. `awstimestream:///?region=us-east-1`.
    #[arg(long, global = true, env = "TSTREAM_DSN")]
    dsn: Option<String>,

    /// Path to TOML driver configuration. Ignored when `--dsn` is set.
    #[arg(long, global = true, env = "TSTREAM_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interpolate parameters into a query template and print it.
    Render(cmd::render::RenderArgs),
    /// Replay recorded query pages and print decoded rows as JSON.
    Decode(cmd::decode::DecodeArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = cmd::config::log_effective(cli.dsn.as_deref(), cli.config.as_deref()) {
        tracing::error!(error = %e, "failed to load driver configuration");
        std::process::exit(1);
    }

    let result = match &cli.command {
        Command::Render(args) => cmd::render::run(args),
        Command::Decode(args) => cmd::decode::run(args).await,
    };
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
