use crate::error::LoaderError;
use core_types::RawRow;
use csv::{ByteRecord, ByteRecordsIntoIter, ReaderBuilder};
use std::collections::HashMap;
use std::fs::File;
use std::path::PathBuf;

/// A CSV file with a header row, read lazily as `RawRow`s.
///
/// The source is restartable: every call to `rows` opens the file again and starts
/// from the first data line. The file handle lives inside the returned iterator and
/// is released when the iterator is dropped.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Opens the file and reads its header row.
    pub fn rows(&self) -> Result<RawRows, LoaderError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            // Short or long rows are kept; absent columns surface as missing fields.
            .flexible(true)
            .from_path(&self.path)
            .map_err(|source| LoaderError::Open {
                path: self.path.clone(),
                source,
            })?;

        let headers: Vec<String> = reader
            .byte_headers()
            .map_err(|source| LoaderError::Header {
                path: self.path.clone(),
                source,
            })?
            .iter()
            .map(decode)
            .collect();
        tracing::trace!(path = %self.path.display(), ?headers, "Read header row");

        Ok(RawRows {
            path: self.path.clone(),
            headers,
            records: reader.into_byte_records(),
            error: None,
        })
    }
}

/// Iterator over the data rows of one `CsvSource`.
///
/// Every data line yields a row. Bytes that are not valid UTF-8 are replaced with
/// U+FFFD, leaving the field-level parsing to decide what the value is worth.
/// A read failure ends the iteration and is kept for `take_error`.
pub struct RawRows {
    path: PathBuf,
    headers: Vec<String>,
    records: ByteRecordsIntoIter<File>,
    error: Option<LoaderError>,
}

impl RawRows {
    /// The read failure that ended the iteration early, if any.
    pub fn take_error(&mut self) -> Option<LoaderError> {
        self.error.take()
    }

    fn to_raw_row(&self, record: &ByteRecord) -> RawRow {
        let line = record.position().map_or(0, |p| p.line());
        let fields: HashMap<String, String> = self
            .headers
            .iter()
            .zip(record.iter())
            .map(|(name, value)| (name.clone(), decode(value)))
            .collect();
        RawRow::new(line, fields)
    }
}

impl Iterator for RawRows {
    type Item = RawRow;

    fn next(&mut self) -> Option<RawRow> {
        if self.error.is_some() {
            return None;
        }
        match self.records.next()? {
            Ok(record) => Some(self.to_raw_row(&record)),
            Err(source) => {
                let line = source.position().map_or(0, |p| p.line());
                tracing::warn!(path = %self.path.display(), line, error = %source, "Stopped reading after a read error");
                self.error = Some(LoaderError::Read {
                    path: self.path.clone(),
                    line,
                    source,
                });
                None
            }
        }
    }
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
