//! Property-based tests for CLI argument parsing

use clap::Parser;
use proptest::prelude::*;
use std::time::Duration;

use kinesis_replay::cli::Args;

/// Strategy for generating valid stream names
fn valid_stream_name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9_.-]{0,127}"
}

/// Strategy for generating valid intervals in seconds
fn valid_interval_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), 0.001f64..60.0]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any non-empty stream name, non-negative interval and positive row cap is accepted.
    #[test]
    fn prop_valid_arguments_validate(
        stream in valid_stream_name_strategy(),
        interval in valid_interval_strategy(),
        max_rows in 1u64..=10_000,
    ) {
        let interval_str = interval.to_string();
        let max_rows_str = max_rows.to_string();
        let args = Args::try_parse_from([
            "kinesis-replay",
            "--stream-name", stream.as_str(),
            "--interval", interval_str.as_str(),
            "--max-rows", max_rows_str.as_str(),
        ]).unwrap();

        prop_assert!(args.validate().is_ok());
        prop_assert_eq!(&args.stream_name, &stream);
        prop_assert_eq!(args.max_rows, Some(max_rows));

        let config = args.emitter_config();
        prop_assert_eq!(config.interval, Duration::from_secs_f64(interval));
        prop_assert_eq!(config.max_rows, Some(max_rows));
    }

    /// Negative intervals are rejected by validation.
    #[test]
    fn prop_negative_interval_rejected(interval in -1000.0f64..-0.0001) {
        let interval_str = interval.to_string();
        let args = Args::try_parse_from([
            "kinesis-replay",
            "--stream-name", "iris",
            "--interval", interval_str.as_str(),
        ]);
        // clap may reject the leading '-' itself; either way the run must not start.
        if let Ok(args) = args {
            prop_assert!(args.validate().is_err());
        }
    }

    /// Intervals and timeouts too large for a `Duration` fail validation instead of panicking later.
    #[test]
    fn prop_oversized_durations_rejected(seconds in 2.0e19f64..1.0e300) {
        let seconds_str = format!("{:e}", seconds);

        let args = Args::try_parse_from([
            "kinesis-replay",
            "--stream-name", "iris",
            "--interval", seconds_str.as_str(),
        ]).unwrap();
        prop_assert!(args.validate().is_err());

        let args = Args::try_parse_from([
            "kinesis-replay",
            "--stream-name", "iris",
            "--interval", "1",
            "--put-timeout", seconds_str.as_str(),
        ]).unwrap();
        prop_assert!(args.validate().is_err());
    }

    /// Non-numeric intervals fail at parse time.
    #[test]
    fn prop_non_numeric_interval_rejected(interval in "[a-z]{1,8}") {
        prop_assume!(interval != "inf" && interval != "nan" && interval != "infinity");
        let result = Args::try_parse_from([
            "kinesis-replay",
            "--stream-name", "iris",
            "--interval", interval.as_str(),
        ]);
        prop_assert!(result.is_err());
    }
}

#[test]
fn test_interval_equals_syntax_allows_negative() {
    let args = Args::try_parse_from(["kinesis-replay", "--stream-name", "iris", "--interval=-1"])
        .unwrap();
    assert!(args.validate().is_err());
}

#[test]
fn test_infinite_interval_rejected() {
    let args = Args::try_parse_from(["kinesis-replay", "--stream-name", "iris", "--interval", "inf"])
        .unwrap();
    assert!(args.validate().is_err());
}
