//! # Rebound Analytics Engine
//!
//! This crate turns validated records into descriptive statistics: means, ratios,
//! nearest-rank percentiles and frequency tables, globally and per group.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files or
//!   output formats. It depends only on `core-types` and `configuration` (Layer 0).
//! - **Stateless Calculation:** The `AnalyticsEngine` is a stateless calculator. It takes
//!   loaded records as input and produces summary value objects as output.
//! - **Explicit "no data":** Reductions over an empty sample return
//!   `AnalyticsError::NoData` instead of dividing by zero or indexing out of bounds.
//!
//! ## Public API
//!
//! - `aggregate`: `mean`, `ratio`, `percentile`, `count_by`, `distribution`.
//! - `grouped`: `partition` and `partition_by`.
//! - `AnalyticsEngine`: the summaries and breakdowns the report is built from.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod aggregate;
pub mod engine;
pub mod error;
pub mod grouped;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use aggregate::{count_by, distribution, mean, percentile, percentiles, ratio};
pub use engine::{win_rate, AnalyticsEngine};
pub use error::AnalyticsError;
pub use grouped::{partition, partition_by};
pub use report::{
    Distribution, ExtremeAssetStats, ExtremeSummary, GroupStats, PercentilePoint, PriceBand,
    RangeSummary, TradeBreakdowns, TradeSummary,
};
