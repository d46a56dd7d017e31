//! Property-based tests for partition keys and payload encoding

use proptest::prelude::*;

use kinesis_replay::partition::{partition_key_for, HEADER_PARTITION_KEY, UNKNOWN_PARTITION_KEY};
use kinesis_replay::record::{encode_fields, Envelope};

/// Strategy for field values without commas or line breaks
fn plain_field_strategy() -> impl Strategy<Value = String> {
    "[^,\r\n]{0,20}"
}

/// Strategy for category values other than "0" and "1"
fn unmapped_value_strategy() -> impl Strategy<Value = String> {
    ".{0,10}".prop_filter("Must not be a mapped value", |s| s != "0" && s != "1")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every unmapped value, including the empty string, falls back to "unknown".
    #[test]
    fn prop_unmapped_values_are_unknown(value in unmapped_value_strategy()) {
        prop_assert_eq!(partition_key_for(&value), UNKNOWN_PARTITION_KEY);
    }

    /// Data rows never share the header's partition key.
    #[test]
    fn prop_data_key_never_header(value in ".{0,10}") {
        prop_assert_ne!(partition_key_for(&value), HEADER_PARTITION_KEY);
    }

    /// Splitting a payload on commas gives back the original fields.
    #[test]
    fn prop_payload_splits_back_to_fields(
        fields in prop::collection::vec(plain_field_strategy(), 1..10)
    ) {
        let payload = encode_fields(fields.iter().map(String::as_str));
        let text = String::from_utf8(payload).unwrap();

        prop_assert!(text.ends_with('\n'));
        let decoded: Vec<&str> = text.trim_end_matches('\n').split(',').collect();
        prop_assert_eq!(decoded, fields.iter().map(String::as_str).collect::<Vec<_>>());
    }

    /// The header envelope is always keyed "header", whatever the column names.
    #[test]
    fn prop_header_envelope_key(
        names in prop::collection::vec("[a-z_]{1,12}", 1..8)
    ) {
        let envelope = Envelope::header("iris", names.iter().map(String::as_str));
        prop_assert_eq!(envelope.partition_key.as_str(), HEADER_PARTITION_KEY);
    }
}

#[test]
fn test_mapped_values() {
    assert_eq!(partition_key_for("0"), "1");
    assert_eq!(partition_key_for("1"), "2");
}
