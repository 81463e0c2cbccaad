//! # Rebound Strategy Analyzer
//!
//! Turns trade statistics into judgements: whether entry thresholds should move,
//! and whether trading should pause after a stop-loss.
//!
//! ## Architectural Principles
//!
//! - **Layer 2 Logic:** Builds on the `analytics` crate and never touches files.
//! - **Configurable Judgement:** Every threshold comes from `AdviceThresholds`.
//!
//! ## Public API
//!
//! - `Analyzer`: `advise` and `stop_loss_impact`.
//! - `Advice`, `Verdict`, `StopLossImpact`: the judgements it produces.

use analytics::{partition_by, win_rate};
use chrono::TimeDelta;
use configuration::AdviceThresholds;
use core_types::TradeOutcome;
use tracing::debug;

pub mod advice;
pub mod error;
pub mod stop_loss;

pub use advice::Advice;
pub use error::AnalyzerError;
pub use stop_loss::{StopLossImpact, Verdict};

/// The main judgement engine.
pub struct Analyzer {
    config: AdviceThresholds,
}

impl Analyzer {
    pub fn new(config: AdviceThresholds) -> Self {
        Self { config }
    }

    /// Recommends a tuning direction from the global trade summary.
    pub fn advise(&self, summary: &analytics::TradeSummary) -> Advice {
        if summary.take_profit + summary.stop_loss == 0 {
            return Advice::Undecided;
        }
        if summary.win_rate < self.config.low_win_rate {
            Advice::TightenEntry {
                avg_flash_drop: summary.avg_flash_drop,
            }
        } else if summary.win_rate > self.config.high_win_rate {
            Advice::Expand
        } else {
            Advice::Balanced
        }
    }

    /// Compares, per asset, the win rate of trades opened shortly after a stop-loss
    /// with the asset's overall win rate.
    ///
    /// Trades without a buy time cannot be ordered and are left out.
    pub fn stop_loss_impact(
        &self,
        trades: &[TradeOutcome],
    ) -> Result<Vec<StopLossImpact>, AnalyzerError> {
        let by_asset = partition_by(trades, |t| t.buy_time.map(|_| t.asset.clone()));
        if by_asset.is_empty() {
            return Err(AnalyzerError::NoTimedTrades);
        }

        let window = TimeDelta::minutes(i64::from(self.config.follow_up_window_minutes));
        let impacts = by_asset
            .into_iter()
            .map(|(asset, mut members)| {
                // Stable, so trades sharing a buy time keep their file order.
                members.sort_by_key(|t| t.buy_time);
                self.asset_impact(asset, &members, window)
            })
            .collect();
        Ok(impacts)
    }

    fn asset_impact(
        &self,
        asset: String,
        trades: &[&TradeOutcome],
        window: TimeDelta,
    ) -> StopLossImpact {
        let follow_ups: Vec<&TradeOutcome> = trades
            .windows(2)
            .filter(|pair| pair[0].status.is_stop_loss())
            .filter(|pair| match (pair[0].buy_time, pair[1].buy_time) {
                (Some(current), Some(next)) => next - current < window,
                _ => false,
            })
            .map(|pair| pair[1])
            .collect();

        let overall_win_rate = win_rate(trades);
        let follow_up_win_rate = (!follow_ups.is_empty()).then(|| win_rate(follow_ups.as_slice()));
        let verdict = self.verdict(overall_win_rate, follow_up_win_rate);
        debug!(%asset, follow_ups = follow_ups.len(), ?verdict, "Stop-loss impact evaluated");

        StopLossImpact {
            asset,
            trades: trades.len(),
            wins: count(trades, |t| t.status.is_take_profit()),
            losses: count(trades, |t| t.status.is_stop_loss()),
            overall_win_rate,
            follow_ups: follow_ups.len(),
            follow_up_wins: count(&follow_ups, |t| t.status.is_take_profit()),
            follow_up_losses: count(&follow_ups, |t| t.status.is_stop_loss()),
            follow_up_win_rate,
            verdict,
        }
    }

    fn verdict(&self, overall: f64, follow_up: Option<f64>) -> Verdict {
        let Some(follow_up) = follow_up else {
            return Verdict::InsufficientData;
        };
        let diff_pct = (follow_up - overall) * 100.0;
        if diff_pct < -self.config.impact_threshold_pct {
            Verdict::Pause { drop_pct: -diff_pct }
        } else if diff_pct > self.config.impact_threshold_pct {
            Verdict::Continue
        } else {
            Verdict::Hold
        }
    }
}

fn count(trades: &[&TradeOutcome], predicate: impl Fn(&TradeOutcome) -> bool) -> usize {
    trades.iter().filter(|&&t| predicate(t)).count()
}
