//! Emission envelope
//!
//! An [`Envelope`] is one unit handed to a record sink: the destination stream,
//! the payload bytes, and the partition key.

use crate::partition::HEADER_PARTITION_KEY;

/// A record ready for submission to a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Name of the destination stream.
    pub stream_name: String,
    /// Raw payload bytes.
    pub payload: Vec<u8>,
    /// Key used by the stream to route the record to a shard.
    pub partition_key: String,
}

impl Envelope {
    /// Creates an envelope from its parts.
    pub fn new(stream_name: &str, payload: Vec<u8>, partition_key: &str) -> Self {
        Self {
            stream_name: stream_name.to_string(),
            payload,
            partition_key: partition_key.to_string(),
        }
    }

    /// Builds the header envelope, always keyed with [`HEADER_PARTITION_KEY`].
    pub fn header<'a, I>(stream_name: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::new(stream_name, encode_fields(fields), HEADER_PARTITION_KEY)
    }

    /// Builds a data-row envelope with the given partition key.
    pub fn row<'a, I>(stream_name: &str, fields: I, partition_key: &str) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::new(stream_name, encode_fields(fields), partition_key)
    }

    /// Returns the payload as text, replacing invalid UTF-8 sequences.
    pub fn payload_lossy(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

/// Joins fields with commas and appends a newline, as UTF-8 bytes.
///
/// Fields are not quoted: a field containing a comma will not split back into
/// the same list.
pub fn encode_fields<'a, I>(fields: I) -> Vec<u8>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut payload = fields.into_iter().collect::<Vec<_>>().join(",");
    payload.push('\n');
    payload.into_bytes()
}
