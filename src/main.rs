//! Kinesis Replay - send CSV rows to a Kinesis Data Stream
//!
//! Reads a CSV file and submits the header once, then each data row, pausing a
//! fixed interval between rows and stopping at end of file or after
//! `--max-rows` rows.
//!
//! # Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success (including graceful shutdown) |
//! | 1 | Configuration/argument error |
//! | 2 | Transport error (Kinesis call failed or timed out) |
//! | 3 | File/input error |

use clap::Parser;
use std::process::ExitCode;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use kinesis_replay::cli::{Args, RECOMMENDED_MAX_ROWS};
use kinesis_replay::csv_source::CsvSource;
use kinesis_replay::emitter::Emitter;
use kinesis_replay::error::ReplayError;
use kinesis_replay::kinesis::KinesisSink;

/// Exit code for success (including graceful shutdown)
const EXIT_SUCCESS: u8 = 0;
/// Exit code for configuration/argument errors
const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code for transport errors
const EXIT_TRANSPORT_ERROR: u8 = 2;
/// Exit code for file/input errors
const EXIT_INPUT_ERROR: u8 = 3;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();

    if let Err(e) = args.validate() {
        tracing::error!("Configuration error: {}", e);
        eprintln!("  Hint: Use --help for usage information");
        return ExitCode::from(EXIT_CONFIG_ERROR);
    }

    match run(args).await {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            match e.rows_sent() {
                Some(rows_sent) => {
                    tracing::error!(rows_sent, "Replay failed: {}", e)
                }
                None => tracing::error!("Replay failed: {}", e),
            }
            ExitCode::from(error_to_exit_code(&e))
        }
    }
}

/// Logs to stderr at `info` unless `RUST_LOG` says otherwise.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> Result<(), ReplayError> {
    if args.exceeds_recommended_rows() {
        tracing::warn!(
            max_rows = ?args.max_rows,
            "--max-rows is above the recommended limit of {}",
            RECOMMENDED_MAX_ROWS
        );
    }

    let source = CsvSource::open(&args.file, &args.partition_field)?;

    let sink = KinesisSink::connect(&args.kinesis_config()).await;

    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    tokio::spawn(async move {
        match wait_for_shutdown_signal().await {
            Ok(()) => {
                let _ = shutdown_tx.send(());
            }
            Err(e) => tracing::warn!("Error setting up signal handler: {}", e),
        }
    });

    let mut emitter = Emitter::new(sink, source, args.emitter_config());
    let summary = emitter.run(shutdown_rx).await?;

    eprintln!(
        "Replay complete. {} rows sent to {} ({}).",
        summary.rows_sent, args.stream_name, summary.stop_reason
    );
    Ok(())
}

/// Waits for SIGINT or SIGTERM (Ctrl+C only on non-Unix platforms).
async fn wait_for_shutdown_signal() -> Result<(), ReplayError> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => {
                tracing::info!("Received SIGINT (Ctrl+C), stopping after the current row...");
            }
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM, stopping after the current row...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        tracing::info!("Received Ctrl+C, stopping after the current row...");
    }

    Ok(())
}

/// Maps an error to its process exit code. An aborted run takes the code of
/// the error that stopped it.
fn error_to_exit_code(error: &ReplayError) -> u8 {
    match error {
        ReplayError::InvalidArgument(_) => EXIT_CONFIG_ERROR,
        ReplayError::Transport(_) | ReplayError::Timeout(_) => EXIT_TRANSPORT_ERROR,
        ReplayError::Io(_)
        | ReplayError::Csv(_)
        | ReplayError::EmptyInput
        | ReplayError::MissingColumn(_) => EXIT_INPUT_ERROR,
        ReplayError::Aborted { source, .. } => error_to_exit_code(source),
    }
}
