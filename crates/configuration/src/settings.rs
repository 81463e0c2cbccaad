use crate::error::ConfigError;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure for the entire application.
///
/// Every section falls back to its defaults, so an empty or absent file is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub input: InputFiles,
    pub parsing: Parsing,
    pub statistics: Statistics,
    pub advice: AdviceThresholds,
}

/// Where the exported CSV files live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFiles {
    /// Relative file names below are resolved against this directory.
    pub data_dir: PathBuf,
    /// Extreme events with dip/rebound timestamps.
    pub extremes_trade: PathBuf,
    /// Per-window min/max ask, without timestamps.
    pub extremes: PathBuf,
    /// Trade-outcome exports, concatenated in this order.
    pub trade_outcomes: Vec<PathBuf>,
}

/// How raw fields are interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parsing {
    /// A chrono format string. Exports carry no timezone.
    pub timestamp_format: String,
}

/// Parameters of the descriptive statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    /// Fractions in `[0, 1]` reported with nearest-rank indexing.
    pub percentiles: Vec<f64>,
    /// Ascending edges of the half-open anchor-price bins.
    pub anchor_price_bins: Vec<f64>,
    /// Length of a market window. Bounds the minute-into-window breakdown.
    pub window_minutes: u32,
}

/// Thresholds used when judging a trade summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdviceThresholds {
    /// Below this win rate the entry is considered too loose.
    pub low_win_rate: f64,
    /// Above this win rate the strategy is considered stable enough to expand.
    pub high_win_rate: f64,
    /// A trade opened within this many minutes of a stop-loss counts as its follow-up.
    pub follow_up_window_minutes: u32,
    /// Percentage points by which the follow-up win rate must differ to change the verdict.
    pub impact_threshold_pct: f64,
}

// --- Default Implementations ---
// This allows a user to omit any section from their toml
// and still have it work with the values the exports were produced for.

impl Default for InputFiles {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            extremes_trade: PathBuf::from("single_asset_extremes_trade.csv"),
            extremes: PathBuf::from("single_asset_extremes.csv"),
            trade_outcomes: vec![
                PathBuf::from("strategy_analysis.csv"),
                PathBuf::from("rebound.csv"),
            ],
        }
    }
}

impl Default for Parsing {
    fn default() -> Self {
        Self {
            timestamp_format: "%Y/%m/%d %H:%M:%S".to_string(),
        }
    }
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            percentiles: vec![0.25, 0.50, 0.75],
            anchor_price_bins: vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0],
            window_minutes: 60,
        }
    }
}

impl Default for AdviceThresholds {
    fn default() -> Self {
        Self {
            low_win_rate: 0.5,
            high_win_rate: 0.7,
            follow_up_window_minutes: 60,
            impact_threshold_pct: 5.0,
        }
    }
}

impl InputFiles {
    /// Resolves a configured file name against `data_dir`. Absolute paths are kept.
    pub fn resolve(&self, file: &Path) -> PathBuf {
        self.data_dir.join(file)
    }

    pub fn extremes_trade_path(&self) -> PathBuf {
        self.resolve(&self.extremes_trade)
    }

    pub fn extremes_path(&self) -> PathBuf {
        self.resolve(&self.extremes)
    }

    pub fn trade_outcome_paths(&self) -> Vec<PathBuf> {
        self.trade_outcomes.iter().map(|f| self.resolve(f)).collect()
    }
}

impl AnalysisConfig {
    /// Checks the invariants the loaders and aggregators rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let format = &self.parsing.timestamp_format;
        if format.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "parsing.timestamp_format must not be empty".to_string(),
            ));
        }
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::ValidationError(format!(
                "parsing.timestamp_format '{format}' is not a valid format string"
            )));
        }

        let stats = &self.statistics;
        if stats.percentiles.is_empty() {
            return Err(ConfigError::ValidationError(
                "statistics.percentiles must list at least one fraction".to_string(),
            ));
        }
        if let Some(p) = stats.percentiles.iter().find(|p| !(0.0..=1.0).contains(*p)) {
            return Err(ConfigError::ValidationError(format!(
                "statistics.percentiles must lie in [0, 1], found {p}"
            )));
        }
        if stats.anchor_price_bins.len() < 2 {
            return Err(ConfigError::ValidationError(
                "statistics.anchor_price_bins needs at least two edges".to_string(),
            ));
        }
        if stats.anchor_price_bins.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::ValidationError(
                "statistics.anchor_price_bins must be strictly ascending".to_string(),
            ));
        }
        if stats.window_minutes == 0 {
            return Err(ConfigError::ValidationError(
                "statistics.window_minutes must be greater than 0".to_string(),
            ));
        }

        let advice = &self.advice;
        if advice.low_win_rate > advice.high_win_rate {
            return Err(ConfigError::ValidationError(
                "advice.low_win_rate must not exceed advice.high_win_rate".to_string(),
            ));
        }
        if advice.follow_up_window_minutes == 0 {
            return Err(ConfigError::ValidationError(
                "advice.follow_up_window_minutes must be greater than 0".to_string(),
            ));
        }
        if advice.impact_threshold_pct < 0.0 {
            return Err(ConfigError::ValidationError(
                "advice.impact_threshold_pct must not be negative".to_string(),
            ));
        }

        Ok(())
    }
}
