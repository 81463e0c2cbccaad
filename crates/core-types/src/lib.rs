//! # Rebound Analysis Core Types
//!
//! The shared vocabulary of the workspace: raw CSV rows, the validated records derived
//! from them, and the primitives used to parse a single field.
//!
//! ## Architectural Principles
//!
//! - **Layer 0:** This crate has no knowledge of files, configuration or statistics.
//!   Every other crate depends on it.
//! - **Two missing-data policies:** A field that fails to parse either rejects the
//!   whole row (`MissingPolicy::RejectRow`, used for extreme events and range samples)
//!   or is coerced to a missing value that propagates through derived fields
//!   (`MissingPolicy::Coerce`, used for trade outcomes). Each record type declares
//!   which one it follows through `FromRawRow::POLICY`.
//! - **Immutable records:** Derived values are computed once in `from_row` and never
//!   change afterwards.
//!
//! ## Public API
//!
//! - `RawRow`: an unvalidated column-name to string mapping.
//! - `ExtremeEvent`, `RangeSample`, `TradeOutcome`: the validated record types.
//! - `Record`: uniform access to numeric metrics and categorical keys for aggregation.
//! - `ParseFailure`: why a single field could not be interpreted.

pub mod enums;
pub mod error;
pub mod parse;
pub mod raw;
pub mod record;
pub mod records;

pub use enums::{Direction, TradeStatus};
pub use error::ParseFailure;
pub use parse::{FromRawRow, MissingPolicy};
pub use raw::RawRow;
pub use record::{Record, Uncategorized};
pub use records::{
    ExtremeCategory, ExtremeEvent, ExtremeMetric, RangeMetric, RangeSample, StrategyParams,
    TradeCategory, TradeMetric, TradeOutcome,
};
