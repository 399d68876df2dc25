//! Geotrack CLI - Command-line interface
//!
//! Loads bulk GPS telemetry exports and serves bounding-box queries to map
//! clients over HTTP.

mod commands;
mod http;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "geotrack", version, about = "GPS trajectory telemetry server")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a bulk export file and serve bounding-box queries over HTTP.
    Serve(commands::serve::ServeArgs),
    /// Parse and load a bulk export file, then print the ingest report.
    Ingest(commands::ingest::IngestArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => commands::serve::run(args).await,
        Command::Ingest(args) => commands::ingest::run(args).await,
    }
}
