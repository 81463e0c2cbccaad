use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// One nearest-rank percentile estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentilePoint {
    /// In `[0, 1]`, e.g. `0.25` for the 25th percentile.
    pub fraction: f64,
    pub value: f64,
}

impl PercentilePoint {
    /// `25th`, `50th`, ...
    pub fn label(&self) -> String {
        format!("{}th", (self.fraction * 100.0).round() as i64)
    }
}

/// Descriptive statistics of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two values.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub percentiles: Vec<PercentilePoint>,
}

/// Summary of the dip/rebound extreme events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremeSummary {
    pub samples: usize,
    pub avg_min_ask: f64,
    /// Seconds.
    pub avg_rebound_duration: f64,
    /// Seconds.
    pub avg_total_low_duration: f64,
    pub volatile_count: usize,
    /// `volatile_count / samples`
    pub volatile_ratio: f64,
    pub min_ask_percentiles: Vec<PercentilePoint>,
}

/// Per-asset view of the extreme events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremeAssetStats {
    pub asset: String,
    pub samples: usize,
    pub avg_min_ask: f64,
    pub avg_rebound_duration: f64,
    pub volatile_ratio: f64,
}

/// Summary of the timestamp-free min/max export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSummary {
    pub samples: usize,
    pub avg_min_ask: f64,
    pub avg_max_ask: f64,
    pub avg_range: f64,
    pub range_percentiles: Vec<PercentilePoint>,
}

/// Global statistics over every trade outcome.
///
/// Averages are `None` when every input value was missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeSummary {
    pub total_trades: usize,
    pub status_counts: BTreeMap<String, usize>,
    pub take_profit: usize,
    pub stop_loss: usize,
    pub force_clear: usize,
    /// `take_profit / (take_profit + stop_loss)`, `0` when both are zero.
    pub win_rate: f64,
    pub avg_flash_drop: Option<f64>,
    pub avg_flash_duration: Option<f64>,
    pub avg_hold_duration: Option<f64>,
    /// Distinct `window/drop/tp/sl` parameter sets, sorted.
    pub params_used: Vec<String>,
    pub flash_drop_distribution: Option<Distribution>,
}

/// The statistics computed for one group of trades.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats<K> {
    pub key: K,
    pub trades: usize,
    pub win_rate: f64,
    pub avg_flash_drop: Option<f64>,
    pub avg_hold_duration: Option<f64>,
}

/// A half-open anchor-price bin `[lower, upper)`, ordered by its position.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PriceBand {
    pub index: usize,
    pub lower: f64,
    pub upper: f64,
}

impl PartialEq for PriceBand {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for PriceBand {}

impl PartialOrd for PriceBand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriceBand {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl fmt::Display for PriceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}-{:.1}", self.lower, self.upper)
    }
}

/// Every keyed breakdown of the trade outcomes, each sorted by its key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeBreakdowns {
    pub by_asset: Vec<GroupStats<String>>,
    pub by_direction: Vec<GroupStats<String>>,
    /// Keyed by asset and hour of `buy_time`.
    pub by_hour: Vec<GroupStats<(String, u32)>>,
    pub by_price_band: Vec<GroupStats<(String, PriceBand)>>,
    /// Keyed by asset and whole minutes between `window_start` and `buy_time`.
    pub by_window_minute: Vec<GroupStats<(String, i64)>>,
}
