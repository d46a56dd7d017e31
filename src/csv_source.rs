//! CSV source
//!
//! Reads the header and data rows of the replay file.
//!
//! The first line is the header. Every following line is a data row that must
//! have the same number of fields as the header; a mismatch is reported as a
//! CSV error naming the offending line. The column that selects the partition
//! key is resolved once, when the file is opened.

use csv::{Reader, ReaderBuilder, StringRecord};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::ReplayError;
use crate::partition::partition_key_for;

/// One data row read from the source file.
#[derive(Debug, Clone)]
pub struct SourceRow {
    /// 1-based line number in the file (the header is line 1).
    pub line: u64,
    /// 0-based index among data rows.
    pub index: u64,
    /// Raw field values, in file order.
    pub fields: StringRecord,
    /// Partition key derived from the partition column.
    pub partition_key: &'static str,
}

impl SourceRow {
    /// Iterates the raw field values.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter()
    }
}

/// Sequential reader over a replay CSV file.
///
/// The file handle is held for the lifetime of the source and released when it
/// is dropped.
pub struct CsvSource {
    reader: Reader<File>,
    header: StringRecord,
    partition_field: String,
    partition_index: usize,
    path: PathBuf,
    /// Number of data rows read so far.
    rows_read: u64,
    /// Line of the last record read (header row is line 1).
    current_line: u64,
}

impl CsvSource {
    /// Opens `path` and reads its header.
    ///
    /// # Errors
    ///
    /// - [`ReplayError::Csv`] if the file cannot be opened or the header cannot be parsed
    /// - [`ReplayError::EmptyInput`] if the file has no header line
    /// - [`ReplayError::MissingColumn`] if the header has no `partition_field` column
    pub fn open(path: &Path, partition_field: &str) -> Result<Self, ReplayError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_path(path)?;

        let header = reader.headers()?.clone();
        if header.is_empty() {
            return Err(ReplayError::EmptyInput);
        }

        let partition_index = header
            .iter()
            .position(|name| name == partition_field)
            .ok_or_else(|| ReplayError::MissingColumn(partition_field.to_string()))?;

        tracing::debug!(
            path = %path.display(),
            columns = header.len(),
            partition_index,
            "Opened replay source"
        );

        Ok(Self {
            reader,
            header,
            partition_field: partition_field.to_string(),
            partition_index,
            path: path.to_path_buf(),
            rows_read: 0,
            current_line: 1,
        })
    }

    /// The header row's field names.
    pub fn header(&self) -> &StringRecord {
        &self.header
    }

    /// Name of the column that selects the partition key.
    pub fn partition_field(&self) -> &str {
        &self.partition_field
    }

    /// Path the source was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Line number of the record most recently read, or 1 before any data row.
    pub fn current_line(&self) -> u64 {
        self.current_line
    }

    /// Number of data rows read so far.
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Reads the next data row.
    pub fn read_next(&mut self) -> Option<Result<SourceRow, ReplayError>> {
        let mut fields = StringRecord::new();
        match self.reader.read_record(&mut fields) {
            Ok(false) => None,
            Ok(true) => {
                self.current_line = fields
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(self.current_line + 1);
                let index = self.rows_read;
                self.rows_read += 1;

                // Field count already matches the header, so the index is in range.
                let partition_key = partition_key_for(&fields[self.partition_index]);

                Some(Ok(SourceRow {
                    line: self.current_line,
                    index,
                    fields,
                    partition_key,
                }))
            }
            Err(e) => {
                if let Some(pos) = e.position() {
                    self.current_line = pos.line();
                } else {
                    self.current_line += 1;
                }
                Some(Err(e.into()))
            }
        }
    }
}

impl Iterator for CsvSource {
    type Item = Result<SourceRow, ReplayError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next()
    }
}
