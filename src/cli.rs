//! CLI argument parsing module
//!
//! Handles command-line argument parsing using `clap` derive macros.
//! [`Args::validate`] checks values clap cannot express, and the `*_config`
//! methods turn validated arguments into the typed settings used by the
//! emitter and the Kinesis sink.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::emitter::EmitterConfig;
use crate::kinesis::KinesisConfig;
use crate::partition::DEFAULT_PARTITION_FIELD;

/// Default input file.
pub const DEFAULT_CSV_FILE: &str = "./train.csv";

/// Row count above which a run is considered unusually long.
pub const RECOMMENDED_MAX_ROWS: u64 = 150;

/// Command-line arguments for the replay tool.
///
/// # Example
///
/// ```rust,ignore
/// use clap::Parser;
/// use kinesis_replay::cli::Args;
///
/// let args = Args::parse();
/// args.validate()?;
/// ```
#[derive(Parser, Debug)]
#[command(name = "kinesis-replay")]
#[command(about = "Send CSV data to Kinesis Data Streams")]
#[command(version)]
pub struct Args {
    /// Name of the Kinesis Data Stream
    #[arg(short = 's', long, visible_alias = "stream_name")]
    pub stream_name: String,

    /// Time interval (in seconds) between two writes
    #[arg(short = 'i', long)]
    pub interval: f64,

    /// Maximum number of rows to write (recommended max: 150)
    #[arg(short = 'm', long, visible_alias = "max_rows")]
    pub max_rows: Option<u64>,

    /// CSV file to replay
    #[arg(short = 'f', long, default_value = DEFAULT_CSV_FILE)]
    pub file: PathBuf,

    /// Column whose value selects the partition key
    #[arg(long, default_value = DEFAULT_PARTITION_FIELD)]
    pub partition_field: String,

    /// AWS region (defaults to the ambient AWS configuration)
    #[arg(long)]
    pub region: Option<String>,

    /// Custom Kinesis endpoint, e.g. for LocalStack
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// Timeout (in seconds) for a single PutRecord call
    #[arg(long, default_value = "30")]
    pub put_timeout: f64,
}

impl Args {
    /// Validate argument values.
    ///
    /// - `--stream-name` must not be empty or whitespace
    /// - `--interval` must be non-negative and small enough to fit a [`Duration`]
    /// - `--max-rows`, when given, must be positive
    /// - `--put-timeout` must be positive and small enough to fit a [`Duration`]
    /// - `--partition-field` must not be empty
    pub fn validate(&self) -> Result<(), String> {
        if self.stream_name.trim().is_empty() {
            return Err("--stream-name must not be empty".to_string());
        }

        if Duration::try_from_secs_f64(self.interval).is_err() {
            return Err(format!(
                "Invalid interval: {}. Must be a non-negative number of seconds.",
                self.interval
            ));
        }

        if self.max_rows == Some(0) {
            return Err("--max-rows must be at least 1".to_string());
        }

        if self.put_timeout <= 0.0 || Duration::try_from_secs_f64(self.put_timeout).is_err() {
            return Err(format!(
                "Invalid put timeout: {}. Must be a positive number of seconds.",
                self.put_timeout
            ));
        }

        if self.partition_field.is_empty() {
            return Err("--partition-field must not be empty".to_string());
        }

        Ok(())
    }

    /// Whether the requested row count exceeds [`RECOMMENDED_MAX_ROWS`].
    pub fn exceeds_recommended_rows(&self) -> bool {
        self.max_rows.is_some_and(|max| max > RECOMMENDED_MAX_ROWS)
    }

    /// Emitter settings. Call [`Args::validate`] first.
    pub fn emitter_config(&self) -> EmitterConfig {
        EmitterConfig::new(
            self.stream_name.clone(),
            Duration::from_secs_f64(self.interval),
            self.max_rows,
        )
    }

    /// Kinesis client settings. Call [`Args::validate`] first.
    pub fn kinesis_config(&self) -> KinesisConfig {
        KinesisConfig {
            region: self.region.clone(),
            endpoint_url: self.endpoint_url.clone(),
            put_timeout: Duration::from_secs_f64(self.put_timeout),
        }
    }
}
