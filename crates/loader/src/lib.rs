//! # Rebound Analysis Loader
//!
//! Reads the hand-exported CSV files and turns their rows into validated records.
//!
//! ## Architectural Principles
//!
//! - **Layer 2 Adapter:** This is the only crate that touches the filesystem. It hides
//!   the `csv` reader behind `CsvSource` and hands out plain `core-types` records.
//! - **Best effort:** Row-level parse failures are logged and skipped. A file that
//!   cannot be opened is recorded in `Loaded::failures` and treated as empty; sibling
//!   files still load.
//! - **Scoped file handles:** Each file is materialized into memory in one pass and its
//!   handle is released as soon as the pass ends, on every exit path.
//!
//! ## Public API
//!
//! - `CsvSource` / `RawRows`: restartable, lazy raw-row reading.
//! - `load_file`, `load_files`, `read_raw_rows`: generic loading and concatenation.
//! - `load_extreme_events`, `load_range_samples`, `load_trade_outcomes`: the three
//!   configured inputs.
//! - `Loaded`: records plus read/reject counts and file failures.

pub mod error;
pub mod load;
pub mod source;

pub use error::LoaderError;
pub use load::{
    load_extreme_events, load_file, load_files, load_range_samples, load_trade_outcomes,
    read_raw_rows, Loaded,
};
pub use source::{CsvSource, RawRows};
