//! Replay emitter
//!
//! Reads rows from a [`CsvSource`] and submits them one at a time to a
//! [`RecordSink`], pausing a fixed interval after each row.
//!
//! The header is submitted once, keyed with `"header"`, immediately before the
//! first data row. A file with a header and no data rows therefore produces no
//! submissions at all.
//!
//! The run ends normally at end of input, when the row limit is reached, or
//! when a shutdown signal arrives. Any read or submission error ends the run
//! with [`ReplayError::Aborted`], which records where it stopped and how many
//! rows were already delivered. Nothing is retried.
//!
//! # Example
//!
//! ```rust,ignore
//! use kinesis_replay::csv_source::CsvSource;
//! use kinesis_replay::emitter::{Emitter, EmitterConfig};
//! use kinesis_replay::kinesis::{KinesisConfig, KinesisSink};
//! use std::time::Duration;
//! use tokio::sync::broadcast;
//!
//! let sink = KinesisSink::connect(&KinesisConfig::default()).await;
//! let source = CsvSource::open(Path::new("train.csv"), "species")?;
//! let config = EmitterConfig::new("iris-stream", Duration::from_secs(1), Some(150));
//!
//! let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);
//! let mut emitter = Emitter::new(sink, source, config);
//! let summary = emitter.run(shutdown_rx).await?;
//! println!("Sent {} rows", summary.rows_sent);
//! ```

use std::fmt;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::sleep;

use crate::csv_source::{CsvSource, SourceRow};
use crate::error::ReplayError;
use crate::record::Envelope;
use crate::sink::RecordSink;

/// Settings for one replay run.
#[derive(Debug, Clone, PartialEq)]
pub struct EmitterConfig {
    /// Destination stream.
    pub stream_name: String,
    /// Pause after each data row.
    pub interval: Duration,
    /// Stop after this many data rows; unlimited when `None`.
    pub max_rows: Option<u64>,
}

impl EmitterConfig {
    pub fn new(stream_name: impl Into<String>, interval: Duration, max_rows: Option<u64>) -> Self {
        Self {
            stream_name: stream_name.into(),
            interval,
            max_rows,
        }
    }
}

/// Progress of an [`Emitter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitterState {
    /// `run` has not been called.
    NotStarted,
    /// Running; the header has not been submitted yet.
    HeaderPending,
    /// Running; the header has been submitted.
    Streaming,
    /// Finished normally.
    Done,
    /// Stopped by a fatal error.
    Failed,
}

/// Why a run finished normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every data row in the file was sent.
    EndOfInput,
    /// The configured row limit was reached.
    RowLimit,
    /// A shutdown signal was received.
    Shutdown,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::EndOfInput => write!(f, "end of input"),
            StopReason::RowLimit => write!(f, "row limit reached"),
            StopReason::Shutdown => write!(f, "shutdown requested"),
        }
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitSummary {
    pub header_sent: bool,
    pub rows_sent: u64,
    pub stop_reason: StopReason,
}

/// Replays a CSV source into a record sink.
pub struct Emitter<S> {
    sink: S,
    source: CsvSource,
    config: EmitterConfig,
    state: EmitterState,
    header_sent: bool,
    rows_sent: u64,
}

impl<S: RecordSink> Emitter<S> {
    pub fn new(sink: S, source: CsvSource, config: EmitterConfig) -> Self {
        Self {
            sink,
            source,
            config,
            state: EmitterState::NotStarted,
            header_sent: false,
            rows_sent: 0,
        }
    }

    pub fn state(&self) -> EmitterState {
        self.state
    }

    /// Data rows acknowledged so far.
    pub fn rows_sent(&self) -> u64 {
        self.rows_sent
    }

    pub fn header_sent(&self) -> bool {
        self.header_sent
    }

    /// The sink, e.g. to inspect a test double after a run.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Runs the replay loop to completion.
    ///
    /// The shutdown receiver is checked before each row and during the pause
    /// between rows. A submission already in flight is always awaited.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Aborted`] if a row cannot be read or a
    /// submission fails. The run cannot be resumed afterwards.
    pub async fn run(
        &mut self,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<EmitSummary, ReplayError> {
        if self.state != EmitterState::NotStarted {
            return Err(ReplayError::InvalidArgument(
                "emitter has already been run".to_string(),
            ));
        }
        self.state = EmitterState::HeaderPending;

        tracing::info!(
            stream = %self.config.stream_name,
            file = %self.source.path().display(),
            interval_ms = self.config.interval.as_millis() as u64,
            max_rows = ?self.config.max_rows,
            "Starting replay"
        );

        let stop_reason = loop {
            if self.limit_reached() {
                break StopReason::RowLimit;
            }

            if shutdown_requested(&mut shutdown) {
                tracing::info!("Shutdown signal received, stopping replay");
                break StopReason::Shutdown;
            }

            let row = match self.source.read_next() {
                Some(Ok(row)) => row,
                Some(Err(e)) => {
                    let line = self.source.current_line();
                    let row = self.source.rows_read();
                    return Err(self.abort(line, row, e));
                }
                None => break StopReason::EndOfInput,
            };

            if let Err(e) = self.emit_row(&row).await {
                return Err(self.abort(row.line, row.index, e));
            }

            if !self.config.interval.is_zero() {
                tokio::select! {
                    _ = wait_for_shutdown(&mut shutdown) => {
                        tracing::info!("Shutdown signal received during delay, stopping replay");
                        break StopReason::Shutdown;
                    }
                    _ = sleep(self.config.interval) => {}
                }
            }
        };

        self.state = EmitterState::Done;
        tracing::info!(
            rows_sent = self.rows_sent,
            header_sent = self.header_sent,
            "Replay complete ({})",
            stop_reason
        );

        Ok(EmitSummary {
            header_sent: self.header_sent,
            rows_sent: self.rows_sent,
            stop_reason,
        })
    }

    /// Submits the header (first row only) and then the row itself.
    async fn emit_row(&mut self, row: &SourceRow) -> Result<(), ReplayError> {
        if !self.header_sent {
            let header = Envelope::header(&self.config.stream_name, self.source.header().iter());
            let ack = self.sink.submit(&header).await?;
            tracing::info!(shard = ?ack.shard_id, "Header sent: {}", ack.sequence_number);
            self.header_sent = true;
            self.state = EmitterState::Streaming;
        }

        let envelope = Envelope::row(&self.config.stream_name, row.values(), row.partition_key);
        let ack = self.sink.submit(&envelope).await?;
        tracing::info!(
            line = row.line,
            partition_key = row.partition_key,
            shard = ?ack.shard_id,
            "Record sent: {}",
            ack.sequence_number
        );
        self.rows_sent += 1;
        Ok(())
    }

    fn limit_reached(&self) -> bool {
        self.config
            .max_rows
            .is_some_and(|max| self.rows_sent >= max)
    }

    fn abort(&mut self, line: u64, row: u64, source: ReplayError) -> ReplayError {
        self.state = EmitterState::Failed;
        ReplayError::Aborted {
            line,
            row,
            rows_sent: self.rows_sent,
            header_sent: self.header_sent,
            source: Box::new(source),
        }
    }
}

/// Non-blocking check of the shutdown channel. A closed channel means no
/// sender is left, which is not a request to stop.
fn shutdown_requested(shutdown: &mut broadcast::Receiver<()>) -> bool {
    match shutdown.try_recv() {
        Ok(()) => true,
        Err(broadcast::error::TryRecvError::Lagged(_)) => true,
        Err(broadcast::error::TryRecvError::Empty) => false,
        Err(broadcast::error::TryRecvError::Closed) => false,
    }
}

/// Resolves when a shutdown signal arrives. Never resolves once every sender
/// has been dropped.
async fn wait_for_shutdown(shutdown: &mut broadcast::Receiver<()>) {
    match shutdown.recv().await {
        Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {}
        Err(broadcast::error::RecvError::Closed) => std::future::pending::<()>().await,
    }
}
