use crate::aggregate::{count_by, distribution, mean, percentiles, ratio};
use crate::error::AnalyticsError;
use crate::grouped::{partition, partition_by};
use crate::report::{
    ExtremeAssetStats, ExtremeSummary, GroupStats, PriceBand, RangeSummary, TradeBreakdowns,
    TradeSummary,
};
use chrono::Timelike;
use configuration::Statistics;
use core_types::{
    ExtremeCategory, ExtremeEvent, ExtremeMetric, RangeMetric, RangeSample, Record, TradeCategory,
    TradeMetric, TradeOutcome, TradeStatus,
};
use std::borrow::Borrow;
use std::collections::BTreeSet;

/// Take-profit share of decided trades. Force-cleared trades count toward neither side.
pub fn win_rate<T: Borrow<TradeOutcome>>(trades: &[T]) -> f64 {
    ratio(
        trades,
        |t| outcome(t).status.is_take_profit(),
        |t| outcome(t).status.is_stop_loss(),
    )
}

fn outcome<T: Borrow<TradeOutcome>>(trade: &T) -> &TradeOutcome {
    trade.borrow()
}

/// A stateless calculator for deriving descriptive statistics from loaded records.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    stats: Statistics,
}

impl AnalyticsEngine {
    pub fn new(stats: Statistics) -> Self {
        Self { stats }
    }

    /// Averages, volatility share and min-ask percentiles of the extreme events.
    ///
    /// # Returns
    ///
    /// `AnalyticsError::NoData` when `events` is empty.
    pub fn summarize_extremes(
        &self,
        events: &[ExtremeEvent],
    ) -> Result<ExtremeSummary, AnalyticsError> {
        if events.is_empty() {
            return Err(AnalyticsError::NoData("extreme events".to_string()));
        }

        let volatile_count = events.iter().filter(|e| e.is_volatile).count();
        let summary = ExtremeSummary {
            samples: events.len(),
            avg_min_ask: mean(events, ExtremeMetric::MinAsk)?,
            avg_rebound_duration: mean(events, ExtremeMetric::ReboundDuration)?,
            avg_total_low_duration: mean(events, ExtremeMetric::TotalLowDuration)?,
            volatile_count,
            volatile_ratio: volatile_count as f64 / events.len() as f64,
            min_ask_percentiles: percentiles(events, ExtremeMetric::MinAsk, &self.stats.percentiles)?,
        };

        tracing::debug!(samples = summary.samples, "Summarized extreme events");
        Ok(summary)
    }

    /// One row per asset, in asset order.
    pub fn extremes_by_asset(
        &self,
        events: &[ExtremeEvent],
    ) -> Result<Vec<ExtremeAssetStats>, AnalyticsError> {
        partition(events, ExtremeCategory::Asset)
            .into_iter()
            .map(|(asset, members)| {
                Ok(ExtremeAssetStats {
                    samples: members.len(),
                    avg_min_ask: mean(&members, ExtremeMetric::MinAsk)?,
                    avg_rebound_duration: mean(&members, ExtremeMetric::ReboundDuration)?,
                    volatile_ratio: ratio(&members, |e| e.is_volatile, |e| !e.is_volatile),
                    asset,
                })
            })
            .collect()
    }

    /// Averages and range percentiles of the min/max export.
    pub fn summarize_ranges(&self, samples: &[RangeSample]) -> Result<RangeSummary, AnalyticsError> {
        if samples.is_empty() {
            return Err(AnalyticsError::NoData("range samples".to_string()));
        }

        Ok(RangeSummary {
            samples: samples.len(),
            avg_min_ask: mean(samples, RangeMetric::MinAsk)?,
            avg_max_ask: mean(samples, RangeMetric::MaxAsk)?,
            avg_range: mean(samples, RangeMetric::Range)?,
            range_percentiles: percentiles(samples, RangeMetric::Range, &self.stats.percentiles)?,
        })
    }

    /// Status tallies, win rate and averages over every trade outcome.
    ///
    /// Missing derived values are left out of the averages but every trade is counted.
    pub fn summarize_trades(&self, trades: &[TradeOutcome]) -> Result<TradeSummary, AnalyticsError> {
        if trades.is_empty() {
            return Err(AnalyticsError::NoData("trade outcomes".to_string()));
        }

        let status_counts = count_by(trades, TradeCategory::Status);
        let tally = |label: &str| status_counts.get(label).copied().unwrap_or(0);

        let params_used: BTreeSet<String> = trades
            .iter()
            .filter_map(|t| t.params.as_ref().map(|p| p.label()))
            .collect();

        let summary = TradeSummary {
            total_trades: trades.len(),
            take_profit: tally(TradeStatus::TAKE_PROFIT),
            stop_loss: tally(TradeStatus::STOP_LOSS),
            force_clear: tally(TradeStatus::FORCE_CLEAR),
            win_rate: win_rate(trades),
            avg_flash_drop: mean(trades, TradeMetric::FlashDrop).ok(),
            avg_flash_duration: mean(trades, TradeMetric::FlashDuration).ok(),
            avg_hold_duration: mean(trades, TradeMetric::HoldDuration).ok(),
            params_used: params_used.into_iter().collect(),
            flash_drop_distribution: distribution(
                trades,
                TradeMetric::FlashDrop,
                &self.stats.percentiles,
            )
            .ok(),
            status_counts,
        };

        tracing::debug!(
            trades = summary.total_trades,
            win_rate = summary.win_rate,
            "Summarized trade outcomes"
        );
        Ok(summary)
    }

    pub fn trades_by_asset(&self, trades: &[TradeOutcome]) -> Vec<GroupStats<String>> {
        partition(trades, TradeCategory::Asset)
            .into_iter()
            .map(|(key, members)| group_stats(key, &members))
            .collect()
    }

    pub fn trades_by_direction(&self, trades: &[TradeOutcome]) -> Vec<GroupStats<String>> {
        partition(trades, TradeCategory::Direction)
            .into_iter()
            .map(|(key, members)| group_stats(key, &members))
            .collect()
    }

    /// Keyed by asset and the hour of `buy_time`. Trades without a buy time are skipped.
    pub fn trades_by_hour(&self, trades: &[TradeOutcome]) -> Vec<GroupStats<(String, u32)>> {
        partition_by(trades, |t| t.buy_time.map(|bt| (t.asset.clone(), bt.hour())))
            .into_iter()
            .map(|(key, members)| group_stats(key, &members))
            .collect()
    }

    /// Keyed by asset and the anchor-price band. Trades outside every band are skipped.
    pub fn trades_by_price_band(
        &self,
        trades: &[TradeOutcome],
    ) -> Vec<GroupStats<(String, PriceBand)>> {
        partition_by(trades, |t| {
            let band = self.price_band(t.anchor_price?)?;
            Some((t.asset.clone(), band))
        })
        .into_iter()
        .map(|(key, members)| group_stats(key, &members))
        .collect()
    }

    /// Keyed by asset and whole minutes from `window_start` to `buy_time`. Only
    /// minutes inside `[0, window_minutes)` are kept.
    pub fn trades_by_window_minute(&self, trades: &[TradeOutcome]) -> Vec<GroupStats<(String, i64)>> {
        let window = i64::from(self.stats.window_minutes);
        partition_by(trades, |t| {
            let elapsed = t.buy_time? - t.window_start?;
            let minute = elapsed.num_milliseconds().div_euclid(60_000);
            (0..window)
                .contains(&minute)
                .then(|| (t.asset.clone(), minute))
        })
        .into_iter()
        .map(|(key, members)| group_stats(key, &members))
        .collect()
    }

    pub fn breakdowns(&self, trades: &[TradeOutcome]) -> TradeBreakdowns {
        TradeBreakdowns {
            by_asset: self.trades_by_asset(trades),
            by_direction: self.trades_by_direction(trades),
            by_hour: self.trades_by_hour(trades),
            by_price_band: self.trades_by_price_band(trades),
            by_window_minute: self.trades_by_window_minute(trades),
        }
    }

    /// The half-open band containing `price`, if any.
    pub fn price_band(&self, price: f64) -> Option<PriceBand> {
        self.stats
            .anchor_price_bins
            .windows(2)
            .enumerate()
            .find(|(_, edges)| price >= edges[0] && price < edges[1])
            .map(|(index, edges)| PriceBand {
                index,
                lower: edges[0],
                upper: edges[1],
            })
    }
}

fn group_stats<K, R>(key: K, members: &[R]) -> GroupStats<K>
where
    R: Record<Metric = TradeMetric> + Borrow<TradeOutcome>,
{
    GroupStats {
        key,
        trades: members.len(),
        win_rate: win_rate(members),
        avg_flash_drop: mean(members, TradeMetric::FlashDrop).ok(),
        avg_hold_duration: mean(members, TradeMetric::HoldDuration).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{FromRawRow, RawRow};

    const FORMAT: &str = "%Y/%m/%d %H:%M:%S";

    fn engine() -> AnalyticsEngine {
        AnalyticsEngine::new(Statistics::default())
    }

    fn extreme(asset: &str, min_ask: &str, back_above: &str, last_below: &str) -> ExtremeEvent {
        let row = RawRow::from_pairs(
            2,
            [
                ("asset", asset),
                ("min_ask", min_ask),
                ("first_below_04", "2026/01/15 00:46:53"),
                ("first_back_above_045", back_above),
                ("last_below_04", last_below),
            ],
        );
        ExtremeEvent::from_row(&row, FORMAT).unwrap()
    }

    fn trade(pairs: &[(&str, &str)]) -> TradeOutcome {
        TradeOutcome::from_row(&RawRow::from_pairs(2, pairs.iter().copied()), FORMAT).unwrap()
    }

    fn simple_trade(asset: &str, direction: &str, status: &str, anchor: &str, buy: &str) -> TradeOutcome {
        trade(&[
            ("asset", asset),
            ("direction", direction),
            ("status", status),
            ("anchor_price", anchor),
            ("buy_price", buy),
            ("sell_price", "0.5"),
            ("anchor_time", "2026/01/17 11:39:20"),
            ("buy_time", "2026/01/17 11:39:24"),
            ("sell_time", "2026/01/17 11:40:24"),
            ("window_start", "2026/01/17 11:30:00"),
        ])
    }

    #[test]
    fn single_event_summary_matches_expected_values() {
        let events = vec![extreme("btc", "0.39", "2026/01/15 00:47:10", "2026/01/15 00:46:53")];
        let summary = engine().summarize_extremes(&events).unwrap();
        assert_eq!(summary.samples, 1);
        assert_eq!(summary.avg_min_ask, 0.39);
        assert_eq!(summary.avg_rebound_duration, 17.0);
        assert_eq!(summary.volatile_count, 0);
        let values: Vec<f64> = summary.min_ask_percentiles.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![0.39, 0.39, 0.39]);
    }

    #[test]
    fn extremes_summary_counts_volatile_events() {
        let events = vec![
            extreme("btc", "0.30", "2026/01/15 00:47:10", "2026/01/15 00:50:00"),
            extreme("btc", "0.20", "2026/01/15 00:47:13", "2026/01/15 00:46:53"),
            extreme("eth", "0.10", "2026/01/15 00:47:33", "2026/01/15 00:46:53"),
            extreme("eth", "0.35", "2026/01/15 00:47:03", "2026/01/15 00:48:00"),
        ];
        let summary = engine().summarize_extremes(&events).unwrap();
        assert_eq!(summary.volatile_count, 2);
        assert_eq!(summary.volatile_ratio, 0.5);
        assert_eq!(summary.avg_rebound_duration, (17.0 + 20.0 + 40.0 + 10.0) / 4.0);
        assert_eq!(summary.min_ask_percentiles[1].value, 0.30);

        let by_asset = engine().extremes_by_asset(&events).unwrap();
        assert_eq!(by_asset.len(), 2);
        assert_eq!(by_asset[0].asset, "btc");
        assert_eq!(by_asset[0].volatile_ratio, 0.5);
    }

    #[test]
    fn empty_inputs_report_no_data() {
        assert!(matches!(engine().summarize_extremes(&[]), Err(AnalyticsError::NoData(_))));
        assert!(matches!(engine().summarize_ranges(&[]), Err(AnalyticsError::NoData(_))));
        assert!(matches!(engine().summarize_trades(&[]), Err(AnalyticsError::NoData(_))));
    }

    #[test]
    fn range_summary_averages_and_percentiles() {
        let samples: Vec<RangeSample> = [(0.1, 0.5), (0.2, 0.9), (0.3, 0.4), (0.0, 0.2)]
            .into_iter()
            .map(|(min_ask, max_ask)| RangeSample { min_ask, max_ask, range: max_ask - min_ask })
            .collect();
        let summary = engine().summarize_ranges(&samples).unwrap();
        assert_eq!(summary.samples, 4);
        assert!((summary.avg_max_ask - 0.5).abs() < 1e-12);
        // sorted ranges: 0.1, 0.2, 0.4, 0.7
        assert!((summary.range_percentiles[1].value - 0.4).abs() < 1e-12);
    }

    #[test]
    fn trade_summary_tallies_statuses_and_excludes_force_clear_from_win_rate() {
        let trades = vec![
            simple_trade("btc", "Up", "TAKE_PROFIT", "0.6", "0.5"),
            simple_trade("btc", "Down", "TAKE_PROFIT", "0.7", "0.5"),
            simple_trade("eth", "Up", "STOP_LOSS", "0.6", "bad"),
            simple_trade("eth", "Up", "FORCE_CLEAR", "0.6", "0.4"),
        ];
        let summary = engine().summarize_trades(&trades).unwrap();
        assert_eq!(summary.total_trades, 4);
        assert_eq!(summary.take_profit, 2);
        assert_eq!(summary.stop_loss, 1);
        assert_eq!(summary.force_clear, 1);
        assert!((summary.win_rate - 2.0 / 3.0).abs() < 1e-12);
        // The unparseable buy price drops one flash drop but not the trade.
        let drops = summary.flash_drop_distribution.as_ref().unwrap();
        assert_eq!(drops.count, 3);
        assert!((summary.avg_flash_drop.unwrap() - 0.5 / 3.0).abs() < 1e-12);
        assert_eq!(summary.avg_flash_duration, Some(4.0));
        assert_eq!(summary.avg_hold_duration, Some(60.0));
        assert!(summary.params_used.is_empty());
    }

    #[test]
    fn trade_summary_with_only_missing_values_still_counts_trades() {
        let trades = vec![trade(&[("asset", "btc"), ("status", "FORCE_CLEAR")])];
        let summary = engine().summarize_trades(&trades).unwrap();
        assert_eq!(summary.total_trades, 1);
        assert_eq!(summary.win_rate, 0.0);
        assert_eq!(summary.avg_flash_drop, None);
        assert_eq!(summary.flash_drop_distribution, None);
    }

    #[test]
    fn grouped_stats_are_sorted_and_complete() {
        let trades = vec![
            simple_trade("sol", "Up", "STOP_LOSS", "0.6", "0.5"),
            simple_trade("btc", "Down", "TAKE_PROFIT", "0.6", "0.5"),
            simple_trade("btc", "Up", "STOP_LOSS", "0.6", "0.5"),
            simple_trade("btc", "Up", "FORCE_CLEAR", "0.6", "0.5"),
        ];
        let by_asset = engine().trades_by_asset(&trades);
        let keys: Vec<&str> = by_asset.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["btc", "sol"]);
        assert_eq!(by_asset[0].trades, 3);
        assert_eq!(by_asset[0].win_rate, 0.5);
        assert_eq!(by_asset[1].win_rate, 0.0);
        assert_eq!(by_asset.iter().map(|g| g.trades).sum::<usize>(), trades.len());

        let by_direction = engine().trades_by_direction(&trades);
        assert_eq!(by_direction[0].key, "Down");
        assert_eq!(by_direction[0].win_rate, 1.0);
        assert_eq!(by_direction[1].trades, 3);
    }

    #[test]
    fn price_bands_are_half_open() {
        let engine = engine();
        assert_eq!(engine.price_band(0.2).unwrap().index, 1);
        assert_eq!(engine.price_band(0.1999).unwrap().index, 0);
        assert_eq!(engine.price_band(1.0), None);
        assert_eq!(engine.price_band(-0.1), None);
        assert_eq!(engine.price_band(0.45).unwrap().to_string(), "0.4-0.6");
    }

    #[test]
    fn time_and_price_breakdowns_skip_unkeyed_trades() {
        let mut late = simple_trade("btc", "Up", "TAKE_PROFIT", "1.2", "0.5");
        late.window_start = None;
        let trades = vec![
            simple_trade("btc", "Up", "TAKE_PROFIT", "0.45", "0.4"),
            simple_trade("btc", "Up", "STOP_LOSS", "0.55", "0.4"),
            late,
        ];
        let engine = engine();

        let by_hour = engine.trades_by_hour(&trades);
        assert_eq!(by_hour.len(), 1);
        assert_eq!(by_hour[0].key, ("btc".to_string(), 11));
        assert_eq!(by_hour[0].trades, 3);

        let by_band = engine.trades_by_price_band(&trades);
        assert_eq!(by_band.len(), 1);
        assert_eq!(by_band[0].trades, 2);
        assert_eq!(by_band[0].key.1.to_string(), "0.4-0.6");

        let by_minute = engine.trades_by_window_minute(&trades);
        assert_eq!(by_minute.len(), 1);
        assert_eq!(by_minute[0].key, ("btc".to_string(), 9));
        assert_eq!(by_minute[0].trades, 2);
    }

    #[test]
    fn window_minute_outside_the_window_is_dropped() {
        let early = trade(&[
            ("asset", "btc"),
            ("status", "TAKE_PROFIT"),
            ("window_start", "2026/01/17 12:00:00"),
            ("buy_time", "2026/01/17 11:59:30"),
        ]);
        let late = trade(&[
            ("asset", "btc"),
            ("status", "TAKE_PROFIT"),
            ("window_start", "2026/01/17 10:00:00"),
            ("buy_time", "2026/01/17 11:00:00"),
        ]);
        assert!(engine().trades_by_window_minute(&[early, late]).is_empty());
    }
}
