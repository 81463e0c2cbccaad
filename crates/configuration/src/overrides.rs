use crate::settings::AnalysisConfig;
use std::path::PathBuf;

/// Command-line overrides for the `[input]` section.
///
/// With the `clap` feature enabled this can be flattened into a binary's argument parser.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct InputOverrides {
    /// Directory the CSV exports are read from.
    #[cfg_attr(feature = "clap", arg(long))]
    pub data_dir: Option<PathBuf>,

    /// Extreme-event export with dip/rebound timestamps.
    #[cfg_attr(feature = "clap", arg(long))]
    pub extremes_trade: Option<PathBuf>,

    /// Per-window min/max ask export.
    #[cfg_attr(feature = "clap", arg(long))]
    pub extremes: Option<PathBuf>,

    /// Trade-outcome export. Repeat to concatenate several files in order.
    #[cfg_attr(feature = "clap", arg(long = "trades"))]
    pub trade_outcomes: Vec<PathBuf>,
}

impl InputOverrides {
    /// Replaces every configured value for which an override was given.
    pub fn apply(&self, config: &mut AnalysisConfig) {
        let input = &mut config.input;
        if let Some(dir) = &self.data_dir {
            input.data_dir = dir.clone();
        }
        if let Some(file) = &self.extremes_trade {
            input.extremes_trade = file.clone();
        }
        if let Some(file) = &self.extremes {
            input.extremes = file.clone();
        }
        if !self.trade_outcomes.is_empty() {
            input.trade_outcomes = self.trade_outcomes.clone();
        }
    }
}
