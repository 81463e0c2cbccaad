use crate::error::LoaderError;
use crate::source::CsvSource;
use configuration::AnalysisConfig;
use core_types::{
    ExtremeEvent, FromRawRow, MissingPolicy, ParseFailure, RangeSample, RawRow, TradeOutcome,
};
use std::path::{Path, PathBuf};

/// The materialized result of reading one or more files.
#[derive(Debug)]
pub struct Loaded<R> {
    /// Accepted records, in file order and then row order.
    pub records: Vec<R>,
    /// Data rows read across all files, before any filtering.
    pub rows_read: usize,
    /// Rows dropped under `MissingPolicy::RejectRow`.
    pub rejected: usize,
    /// Files that could not be read. Each contributed no records (or, for a read
    /// error mid-file, only the rows before the error).
    pub failures: Vec<LoaderError>,
}

impl<R> Default for Loaded<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            rows_read: 0,
            rejected: 0,
            failures: Vec::new(),
        }
    }
}

impl<R> Loaded<R> {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends another batch, preserving order. No deduplication takes place.
    pub fn append(&mut self, mut other: Loaded<R>) {
        self.records.append(&mut other.records);
        self.rows_read += other.rows_read;
        self.rejected += other.rejected;
        self.failures.append(&mut other.failures);
    }
}

/// Reads every row of `path` and admits it through `admit`.
///
/// A file that cannot be opened is logged, recorded in `failures` and contributes
/// zero records. It never aborts the caller.
fn collect_file<R>(
    path: &Path,
    admit: impl Fn(&RawRow) -> Result<R, ParseFailure>,
) -> Loaded<R> {
    let mut loaded = Loaded::default();

    let mut rows = match CsvSource::new(path).rows() {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Could not read file; treating it as empty");
            loaded.failures.push(e);
            return loaded;
        }
    };

    for row in rows.by_ref() {
        loaded.rows_read += 1;
        match admit(&row) {
            Ok(record) => loaded.records.push(record),
            Err(failure) => {
                loaded.rejected += 1;
                tracing::debug!(path = %path.display(), line = row.line, %failure, "Skipping row");
            }
        }
    }
    if let Some(e) = rows.take_error() {
        loaded.failures.push(e);
    }

    tracing::info!(
        path = %path.display(),
        rows = loaded.rows_read,
        accepted = loaded.records.len(),
        rejected = loaded.rejected,
        "Loaded file"
    );
    loaded
}

/// Loads one file into records of type `R`, following `R::POLICY`.
pub fn load_file<R: FromRawRow>(path: &Path, timestamp_format: &str) -> Loaded<R> {
    if R::POLICY == MissingPolicy::Coerce {
        tracing::trace!(path = %path.display(), "Coercing unparseable fields to missing");
    }
    collect_file(path, |row| R::from_row(row, timestamp_format))
}

/// Loads several files and concatenates their records in the given order.
pub fn load_files<R: FromRawRow>(paths: &[PathBuf], timestamp_format: &str) -> Loaded<R> {
    let mut all = Loaded::default();
    for path in paths {
        all.append(load_file(path, timestamp_format));
    }
    all
}

/// Concatenates the raw rows of several files without any validation.
pub fn read_raw_rows(paths: &[PathBuf]) -> Loaded<RawRow> {
    let mut all = Loaded::default();
    for path in paths {
        all.append(collect_file(path, |row| Ok(row.clone())));
    }
    all
}

/// Loads the dip/rebound export. Rows lacking any required field are dropped.
pub fn load_extreme_events(config: &AnalysisConfig) -> Loaded<ExtremeEvent> {
    load_file(
        &config.input.extremes_trade_path(),
        &config.parsing.timestamp_format,
    )
}

/// Loads the min/max export. Rows lacking either price are dropped.
pub fn load_range_samples(config: &AnalysisConfig) -> Loaded<RangeSample> {
    load_file(&config.input.extremes_path(), &config.parsing.timestamp_format)
}

/// Loads and concatenates every trade-outcome export. Rows are never dropped.
pub fn load_trade_outcomes(config: &AnalysisConfig) -> Loaded<TradeOutcome> {
    load_files(
        &config.input.trade_outcome_paths(),
        &config.parsing.timestamp_format,
    )
}
