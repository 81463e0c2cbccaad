use serde::Serialize;
use std::fmt;

/// A tuning recommendation derived from the global win rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Advice {
    /// The win rate is below the low threshold: entries are too loose.
    TightenEntry { avg_flash_drop: Option<f64> },
    /// The win rate is above the high threshold: there is room to take more trades.
    Expand,
    /// The win rate lies between both thresholds.
    Balanced,
    /// No trade ended in a take-profit or a stop-loss.
    Undecided,
}

impl fmt::Display for Advice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advice::TightenEntry { avg_flash_drop } => {
                match avg_flash_drop {
                    Some(drop) => writeln!(
                        f,
                        "- Raise the drop threshold (average flash drop is {drop:.4}); many buys look like ordinary swings rather than genuine flash crashes."
                    )?,
                    None => writeln!(
                        f,
                        "- Raise the drop threshold; many buys look like ordinary swings rather than genuine flash crashes."
                    )?,
                }
                write!(
                    f,
                    "- Tighten the stop-loss distance, or trade less often while the win rate stays low."
                )
            }
            Advice::Expand => write!(
                f,
                "- The strategy is stable. Try a slightly lower drop threshold to catch more entries, or widen the take-profit for larger gains."
            ),
            Advice::Balanced => write!(
                f,
                "- The take-profit/stop-loss balance holds up. Compare the average drop per asset to tune thresholds individually."
            ),
            Advice::Undecided => write!(
                f,
                "- No trade reached take-profit or stop-loss yet; collect more data before tuning."
            ),
        }
    }
}
