//! Record sink abstraction
//!
//! The emitter talks to its destination only through [`RecordSink`], so the
//! replay loop can run against Kinesis or against an in-memory recorder.

use std::future::Future;

use crate::error::ReplayError;
use crate::record::Envelope;

/// Acknowledgment returned for a stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    /// Sequence number assigned by the stream.
    pub sequence_number: String,
    /// Shard the record landed in, when the sink reports it.
    pub shard_id: Option<String>,
}

impl Ack {
    pub fn new(sequence_number: impl Into<String>) -> Self {
        Self {
            sequence_number: sequence_number.into(),
            shard_id: None,
        }
    }

    pub fn with_shard(mut self, shard_id: impl Into<String>) -> Self {
        self.shard_id = Some(shard_id.into());
        self
    }
}

/// Destination that accepts one record at a time.
///
/// Each call submits a single envelope and resolves once the destination has
/// acknowledged it or failed. Implementations must not retry on their own.
pub trait RecordSink {
    fn submit(&self, envelope: &Envelope) -> impl Future<Output = Result<Ack, ReplayError>> + Send;
}
