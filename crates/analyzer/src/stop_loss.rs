use serde::Serialize;
use std::fmt;

/// What the follow-up win rate suggests doing after a stop-loss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Verdict {
    /// Follow-ups win markedly less often: losses tend to chain.
    Pause { drop_pct: f64 },
    /// Follow-ups win markedly more often: a second dip often rebounds.
    Continue,
    /// No meaningful difference.
    Hold,
    /// No stop-loss had a follow-up inside the window.
    InsufficientData,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pause { drop_pct } => write!(
                f,
                "[pause trading] win rate after a stop-loss falls by {drop_pct:.2} points; losses may chain"
            ),
            Verdict::Continue => write!(
                f,
                "[keep trading] win rate improves after a stop-loss; second dips tend to rebound"
            ),
            Verdict::Hold => write!(f, "[no change] a stop-loss has little effect on the next trade"),
            Verdict::InsufficientData => {
                write!(f, "[insufficient data] too few trades follow a stop-loss")
            }
        }
    }
}

/// How one asset's trades fare right after a stop-loss.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopLossImpact {
    pub asset: String,
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub overall_win_rate: f64,
    /// Trades opened within the follow-up window after a stop-loss.
    pub follow_ups: usize,
    pub follow_up_wins: usize,
    pub follow_up_losses: usize,
    /// `None` when there were no follow-ups.
    pub follow_up_win_rate: Option<f64>,
    pub verdict: Verdict,
}
