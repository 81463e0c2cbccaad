use crate::enums::{Direction, TradeStatus};
use crate::error::ParseFailure;
use crate::parse::{
    coerce, field, non_empty, number, seconds_between, timestamp, FromRawRow, MissingPolicy,
};
use crate::raw::RawRow;
use crate::record::{Record, Uncategorized};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Column names of the exported CSV files.
pub mod columns {
    pub const ASSET: &str = "asset";
    pub const MIN_ASK: &str = "min_ask";
    pub const MAX_ASK: &str = "max_ask";
    pub const FIRST_BELOW: &str = "first_below_04";
    pub const FIRST_BACK_ABOVE: &str = "first_back_above_045";
    pub const LAST_BELOW: &str = "last_below_04";

    pub const DIRECTION: &str = "direction";
    pub const STATUS: &str = "status";
    pub const ANCHOR_PRICE: &str = "anchor_price";
    pub const BUY_PRICE: &str = "buy_price";
    pub const SELL_PRICE: &str = "sell_price";
    pub const ANCHOR_TIME: &str = "anchor_time";
    pub const BUY_TIME: &str = "buy_time";
    pub const SELL_TIME: &str = "sell_time";
    pub const WINDOW_START: &str = "window_start";
    pub const FLASH_WINDOW: &str = "flash_window";
    pub const DROP_THRESHOLD: &str = "drop_threshold";
    pub const TP_DISTANCE: &str = "tp_distance";
    pub const SL_DISTANCE: &str = "sl_distance";
}

// ==============================================================================
// Extreme events
// ==============================================================================

/// An episode where an asset's ask dropped below the low threshold and later
/// recovered above the rebound threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremeEvent {
    pub asset: String,
    pub min_ask: f64,
    /// Read when the column is present and parseable; never required.
    pub max_ask: Option<f64>,
    pub first_below: NaiveDateTime,
    pub first_back_above: NaiveDateTime,
    pub last_below: NaiveDateTime,

    /// Seconds from the first dip to the first recovery.
    pub rebound_duration: f64,
    /// Seconds from the first dip to the last dip.
    pub total_low_duration: f64,
    /// The price dipped again after it had already recovered.
    pub is_volatile: bool,
}

impl FromRawRow for ExtremeEvent {
    const POLICY: MissingPolicy = MissingPolicy::RejectRow;

    /// A `min_ask` of `nan` or `inf` counts as invalid and drops the row, even though
    /// it is syntactically a float.
    fn from_row(row: &RawRow, timestamp_format: &str) -> Result<Self, ParseFailure> {
        // Required: all four fields must parse, otherwise the row is dropped.
        let first_below = timestamp(row, columns::FIRST_BELOW, timestamp_format)?;
        let first_back_above = timestamp(row, columns::FIRST_BACK_ABOVE, timestamp_format)?;
        let last_below = timestamp(row, columns::LAST_BELOW, timestamp_format)?;
        let min_ask = number(row, columns::MIN_ASK)?;
        let asset = field(row, columns::ASSET)?.trim().to_string();

        Ok(Self {
            asset,
            min_ask,
            max_ask: coerce(number(row, columns::MAX_ASK)),
            first_below,
            first_back_above,
            last_below,
            rebound_duration: seconds_between(first_below, first_back_above),
            total_low_duration: seconds_between(first_below, last_below),
            is_volatile: last_below > first_back_above,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtremeMetric {
    MinAsk,
    MaxAsk,
    ReboundDuration,
    TotalLowDuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtremeCategory {
    Asset,
}

impl Record for ExtremeEvent {
    type Metric = ExtremeMetric;
    type Category = ExtremeCategory;

    fn metric(&self, metric: ExtremeMetric) -> Option<f64> {
        match metric {
            ExtremeMetric::MinAsk => Some(self.min_ask),
            ExtremeMetric::MaxAsk => self.max_ask,
            ExtremeMetric::ReboundDuration => Some(self.rebound_duration),
            ExtremeMetric::TotalLowDuration => Some(self.total_low_duration),
        }
    }

    fn category(&self, category: ExtremeCategory) -> &str {
        match category {
            ExtremeCategory::Asset => &self.asset,
        }
    }
}

// ==============================================================================
// General extremes
// ==============================================================================

/// The min/max ask observed over one market window, without timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeSample {
    pub min_ask: f64,
    pub max_ask: f64,
    /// `max_ask - min_ask`
    pub range: f64,
}

impl FromRawRow for RangeSample {
    const POLICY: MissingPolicy = MissingPolicy::RejectRow;

    fn from_row(row: &RawRow, _timestamp_format: &str) -> Result<Self, ParseFailure> {
        let min_ask = number(row, columns::MIN_ASK)?;
        let max_ask = number(row, columns::MAX_ASK)?;
        Ok(Self {
            min_ask,
            max_ask,
            range: max_ask - min_ask,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeMetric {
    MinAsk,
    MaxAsk,
    Range,
}

impl Record for RangeSample {
    type Metric = RangeMetric;
    type Category = Uncategorized;

    fn metric(&self, metric: RangeMetric) -> Option<f64> {
        Some(match metric {
            RangeMetric::MinAsk => self.min_ask,
            RangeMetric::MaxAsk => self.max_ask,
            RangeMetric::Range => self.range,
        })
    }

    fn category(&self, category: Uncategorized) -> &str {
        match category {}
    }
}

// ==============================================================================
// Trade outcomes
// ==============================================================================

/// The strategy parameters a simulated trade was produced with, kept as exported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StrategyParams {
    pub flash_window: String,
    pub drop_threshold: String,
    pub tp_distance: String,
    pub sl_distance: String,
}

impl StrategyParams {
    /// `window/drop/tp/sl`
    pub fn label(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.flash_window, self.drop_threshold, self.tp_distance, self.sl_distance
        )
    }
}

/// One simulated trade. Prices and times that fail to parse are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeOutcome {
    pub asset: String,
    pub direction: Direction,
    pub status: TradeStatus,
    pub anchor_price: Option<f64>,
    pub buy_price: Option<f64>,
    pub sell_price: Option<f64>,
    pub anchor_time: Option<NaiveDateTime>,
    pub buy_time: Option<NaiveDateTime>,
    pub sell_time: Option<NaiveDateTime>,
    pub window_start: Option<NaiveDateTime>,
    pub params: Option<StrategyParams>,

    /// `anchor_price - buy_price`
    pub flash_drop: Option<f64>,
    /// `sell_price - buy_price`
    pub actual_profit: Option<f64>,
    /// Seconds from anchor to buy.
    pub flash_duration: Option<f64>,
    /// Seconds from buy to sell.
    pub hold_duration: Option<f64>,
}

impl FromRawRow for TradeOutcome {
    const POLICY: MissingPolicy = MissingPolicy::Coerce;

    fn from_row(row: &RawRow, timestamp_format: &str) -> Result<Self, ParseFailure> {
        let text = |column: &str| row.get(column).unwrap_or_default().trim().to_string();
        let time = |column: &str| coerce(timestamp(row, column, timestamp_format));

        let anchor_price = coerce(number(row, columns::ANCHOR_PRICE));
        let buy_price = coerce(number(row, columns::BUY_PRICE));
        let sell_price = coerce(number(row, columns::SELL_PRICE));
        let anchor_time = time(columns::ANCHOR_TIME);
        let buy_time = time(columns::BUY_TIME);
        let sell_time = time(columns::SELL_TIME);

        let params = non_empty(row, columns::DROP_THRESHOLD)
            .ok()
            .map(|drop_threshold| StrategyParams {
                flash_window: text(columns::FLASH_WINDOW),
                drop_threshold: drop_threshold.to_string(),
                tp_distance: text(columns::TP_DISTANCE),
                sl_distance: text(columns::SL_DISTANCE),
            });

        Ok(Self {
            asset: text(columns::ASSET),
            direction: Direction::parse(row.get(columns::DIRECTION).unwrap_or_default().trim()),
            status: TradeStatus::parse(row.get(columns::STATUS).unwrap_or_default().trim()),
            anchor_price,
            buy_price,
            sell_price,
            anchor_time,
            buy_time,
            sell_time,
            window_start: time(columns::WINDOW_START),
            params,
            flash_drop: anchor_price.zip(buy_price).map(|(a, b)| a - b),
            actual_profit: sell_price.zip(buy_price).map(|(s, b)| s - b),
            flash_duration: anchor_time.zip(buy_time).map(|(a, b)| seconds_between(a, b)),
            hold_duration: buy_time.zip(sell_time).map(|(b, s)| seconds_between(b, s)),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeMetric {
    AnchorPrice,
    BuyPrice,
    SellPrice,
    FlashDrop,
    ActualProfit,
    FlashDuration,
    HoldDuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeCategory {
    Asset,
    Direction,
    Status,
}

impl Record for TradeOutcome {
    type Metric = TradeMetric;
    type Category = TradeCategory;

    fn metric(&self, metric: TradeMetric) -> Option<f64> {
        match metric {
            TradeMetric::AnchorPrice => self.anchor_price,
            TradeMetric::BuyPrice => self.buy_price,
            TradeMetric::SellPrice => self.sell_price,
            TradeMetric::FlashDrop => self.flash_drop,
            TradeMetric::ActualProfit => self.actual_profit,
            TradeMetric::FlashDuration => self.flash_duration,
            TradeMetric::HoldDuration => self.hold_duration,
        }
    }

    fn category(&self, category: TradeCategory) -> &str {
        match category {
            TradeCategory::Asset => &self.asset,
            TradeCategory::Direction => self.direction.as_str(),
            TradeCategory::Status => self.status.as_str(),
        }
    }
}
