//! Kinesis Replay Library
//!
//! Core functionality for the `kinesis-replay` CLI tool: reading a CSV file
//! and submitting its rows, one at a time and at a fixed pace, to an AWS
//! Kinesis Data Stream.

pub mod cli;
pub mod csv_source;
pub mod emitter;
pub mod error;
pub mod kinesis;
pub mod partition;
pub mod record;
pub mod sink;
