//! Integration tests for reading replay files

use kinesis_replay::csv_source::CsvSource;
use kinesis_replay::error::ReplayError;
use kinesis_replay::record::Envelope;

use std::io::Write;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

fn create_csv(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("train.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    (dir, path)
}

/// An iris-like file with the category in the last column.
const IRIS_SAMPLE: &str = "\
sepal_length,sepal_width,petal_length,petal_width,species
5.1,3.5,1.4,0.2,0
7.0,3.2,4.7,1.4,1
6.3,3.3,6.0,2.5,2
";

#[test]
fn test_iris_sample_keys_and_payloads() {
    let (_dir, path) = create_csv(IRIS_SAMPLE);
    let source = CsvSource::open(&path, "species").unwrap();

    let rows: Vec<_> = source.map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);

    let keys: Vec<_> = rows.iter().map(|r| r.partition_key).collect();
    assert_eq!(keys, vec!["1", "2", "unknown"]);

    let envelope = Envelope::row("iris", rows[0].values(), rows[0].partition_key);
    assert_eq!(envelope.payload_lossy(), "5.1,3.5,1.4,0.2,0\n");
}

#[test]
fn test_lines_are_tracked() {
    let (_dir, path) = create_csv(IRIS_SAMPLE);
    let source = CsvSource::open(&path, "species").unwrap();

    let lines: Vec<u64> = source.map(|r| r.unwrap().line).collect();
    assert_eq!(lines, vec![2, 3, 4]);
}

#[test]
fn test_crlf_line_endings() {
    let (_dir, path) = create_csv("id,species\r\n1,0\r\n2,1\r\n");
    let source = CsvSource::open(&path, "species").unwrap();

    let rows: Vec<_> = source.map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].values().collect::<Vec<_>>(), vec!["2", "1"]);
}

#[test]
fn test_quoted_field_is_unquoted_in_payload() {
    let (_dir, path) = create_csv("name,species\n\"a,b\",0\n");
    let mut source = CsvSource::open(&path, "species").unwrap();

    let row = source.next().unwrap().unwrap();
    assert_eq!(row.values().collect::<Vec<_>>(), vec!["a,b", "0"]);

    // Fields are joined without re-quoting.
    let envelope = Envelope::row("iris", row.values(), row.partition_key);
    assert_eq!(envelope.payload_lossy(), "a,b,0\n");
}

#[test]
fn test_empty_species_value_is_unknown() {
    let (_dir, path) = create_csv("id,species\n1,\n");
    let mut source = CsvSource::open(&path, "species").unwrap();
    assert_eq!(source.next().unwrap().unwrap().partition_key, "unknown");
}

#[test]
fn test_short_row_reports_line() {
    let (_dir, path) = create_csv("id,species\n1,0\n2,1\n3\n");
    let mut source = CsvSource::open(&path, "species").unwrap();

    assert!(source.next().unwrap().is_ok());
    assert!(source.next().unwrap().is_ok());
    let err = source.next().unwrap().unwrap_err();

    assert!(matches!(err, ReplayError::Csv(_)));
    assert_eq!(source.current_line(), 4);
}

#[test]
fn test_open_nonexistent_file() {
    let dir = tempdir().unwrap();
    let result = CsvSource::open(&dir.path().join("missing.csv"), "species");
    assert!(result.is_err());
}
