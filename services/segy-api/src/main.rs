//! SEG-Y API server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use extraction::{ExtractionLimits, DEFAULT_BATCH_OUTPUT};
use segy_api::config::ApiConfig;
use segy_api::state::AppState;

/// SEG-Y API server
#[derive(Parser, Debug)]
#[command(name = "segy-api")]
#[command(about = "HTTP server for manual SEG-Y header extraction")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:5000", env = "SEGY_API_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// File read by segy_manual_read when the request names none
    #[arg(long, env = "DEFAULT_SEGY_FILE")]
    default_segy_file: Option<PathBuf>,

    /// Reject files larger than this many megabytes
    #[arg(long, env = "SEGY_MAX_FILE_SIZE_MB")]
    max_file_size_mb: Option<u64>,

    /// Reject files with more traces than this
    #[arg(long, env = "SEGY_MAX_TRACE_COUNT")]
    max_trace_count: Option<u64>,

    /// Batch audit file
    #[arg(long, default_value = DEFAULT_BATCH_OUTPUT, env = "SEGY_BATCH_OUTPUT")]
    batch_output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let prometheus = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    info!("Prometheus metrics exporter initialized");

    let config = ApiConfig {
        default_segy_file: args.default_segy_file,
        batch_output: args.batch_output,
        limits: ExtractionLimits::from_options(args.max_file_size_mb, args.max_trace_count),
    };
    info!(
        batch_output = %config.batch_output.display(),
        default_segy_file = ?config.default_segy_file,
        "Starting SEG-Y API server"
    );

    let app = segy_api::router(Arc::new(AppState::new(config, Some(prometheus))));

    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;
    info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
