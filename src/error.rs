//! Error module
//!
//! Defines the error type shared by every stage of a replay run, from argument
//! validation through CSV reading to the Kinesis submission.

use std::time::Duration;
use thiserror::Error;

/// The main error type for the replay tool.
///
/// # Error Categories
///
/// - **Input errors**: the CSV file cannot be opened, parsed, or lacks the expected shape
/// - **Transport errors**: a record submission failed or timed out
/// - **Configuration errors**: invalid command-line arguments
/// - **Aborted runs**: a fatal error that stopped the emitter mid-stream, with progress so far
///
/// # Example
///
/// ```rust,ignore
/// use kinesis_replay::error::ReplayError;
///
/// fn example() -> Result<(), ReplayError> {
///     let file = std::fs::File::open("nonexistent.csv")?;
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum ReplayError {
    /// General I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error, including rows whose field count differs from the header.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The input file has no header line.
    #[error("Input file is empty: no header row")]
    EmptyInput,

    /// The header does not contain the field used to derive partition keys.
    #[error("Header has no '{0}' column")]
    MissingColumn(String),

    /// A record submission was rejected or could not be delivered.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A record submission did not complete within the configured timeout.
    #[error("Transport call timed out after {0:?}")]
    Timeout(Duration),

    /// Invalid command-line argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A fatal error stopped the run after some records were already emitted.
    ///
    /// `line` is the 1-based line of the CSV file being processed and `row` the
    /// 0-based data-row index; `rows_sent` counts data rows acknowledged before
    /// the failure.
    #[error(
        "Replay aborted at line {line} (row {row}) after {rows_sent} rows sent \
         (header sent: {header_sent}): {source}"
    )]
    Aborted {
        line: u64,
        row: u64,
        rows_sent: u64,
        header_sent: bool,
        #[source]
        source: Box<ReplayError>,
    },
}

impl ReplayError {
    /// Returns the innermost error, unwrapping an [`ReplayError::Aborted`] wrapper.
    pub fn root(&self) -> &ReplayError {
        match self {
            ReplayError::Aborted { source, .. } => source.root(),
            other => other,
        }
    }

    /// Number of data rows successfully emitted before this error, when known.
    pub fn rows_sent(&self) -> Option<u64> {
        match self {
            ReplayError::Aborted { rows_sent, .. } => Some(*rows_sent),
            _ => None,
        }
    }
}
