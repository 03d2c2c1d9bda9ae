use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tdarr_influx::duration::parse_timeout;
use tdarr_influx::{pipeline, RunOptions, Settings};

#[derive(Parser, Debug)]
#[command(name = "tdarr-influx")]
#[command(about = "Publish Tdarr server statistics to InfluxDB v2")]
struct Args {
    /// Path to the INI config file with [Tdarr] and [Influx] sections
    #[arg(short, long, default_value = "tdarr_influxdb.conf")]
    config: PathBuf,

    /// Read a saved cruddb response from this file instead of querying Tdarr
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Print line protocol to stdout instead of writing to InfluxDB
    #[arg(long)]
    dry_run: bool,

    /// HTTP request timeout (e.g., "10s", "500ms", "1m")
    #[arg(long, default_value = "10s")]
    timeout: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let timeout = parse_timeout(&args.timeout)
        .with_context(|| format!("Invalid --timeout value '{}'", args.timeout))?;

    let settings = Settings::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let options = RunOptions {
        input: args.input,
        dry_run: args.dry_run,
        timeout,
    };

    // One document per run, no concurrency between stages
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let stdout = std::io::stdout();
    let summary = rt.block_on(pipeline::run(&settings, &options, &mut stdout.lock()))?;

    info!(points = summary.points, written = summary.written, "Done");
    Ok(())
}

/// Log to stderr so dry-run output on stdout stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
