//! Partition key mapping
//!
//! Records are routed to shards by a key derived from a category field of each
//! row. The mapping is a fixed table with a single fallback.

/// Partition key used for the header record.
pub const HEADER_PARTITION_KEY: &str = "header";

/// Partition key used when the category value is not in the table.
pub const UNKNOWN_PARTITION_KEY: &str = "unknown";

/// Default name of the column whose value selects the partition key.
pub const DEFAULT_PARTITION_FIELD: &str = "species";

/// Maps a category value to its partition key.
///
/// `"0"` maps to `"1"`, `"1"` maps to `"2"`, and every other value (including
/// the empty string) maps to [`UNKNOWN_PARTITION_KEY`]. Values are compared
/// verbatim, so `" 0"` is unknown.
pub fn partition_key_for(value: &str) -> &'static str {
    match value {
        "0" => "1",
        "1" => "2",
        _ => UNKNOWN_PARTITION_KEY,
    }
}
