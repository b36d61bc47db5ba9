//! SEG-Y backend: stdio line protocol and batch CLI.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use extraction::{ExtractionLimits, DEFAULT_BATCH_OUTPUT};
use segy_backend::{run_batch_command, serve, Backend, BackendConfig};

#[derive(Parser, Debug)]
#[command(name = "segy-backend")]
#[command(about = "JSON line backend and batch extractor for SEG-Y files")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Log level
    #[arg(long, global = true, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Batch audit file
    #[arg(long, global = true, default_value = DEFAULT_BATCH_OUTPUT, env = "SEGY_BATCH_OUTPUT")]
    batch_output: PathBuf,

    /// Reject files larger than this many megabytes
    #[arg(long, global = true, env = "SEGY_MAX_FILE_SIZE_MB")]
    max_file_size_mb: Option<u64>,

    /// Reject files with more traces than this
    #[arg(long, global = true, env = "SEGY_MAX_TRACE_COUNT")]
    max_trace_count: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer JSON requests on stdin, one per line (default)
    Serve,
    /// Extract a batch described by a JSON document
    Batch {
        /// `{"files": [{"index", "filePath"}], ...}`
        json: String,
    },
}

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // stdout carries the protocol
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(io::stderr)
        .json()
        .init();

    let config = BackendConfig {
        batch_output: args.batch_output,
        limits: ExtractionLimits::from_options(args.max_file_size_mb, args.max_trace_count),
    };

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let backend = Backend::new(config);
            let stdin = io::stdin();
            let mut stdout = io::stdout().lock();
            serve(&backend, stdin.lock(), &mut stdout)?;
            stdout.flush()?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Batch { json } => {
            let mut stdout = io::stdout().lock();
            if run_batch_command(&config, &json, &mut stdout)? {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(1))
            }
        }
    }
}
