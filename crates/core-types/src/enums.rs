use serde::{Deserialize, Serialize};
use std::fmt;

/// The terminal state of a simulated trade.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeStatus {
    TakeProfit,
    StopLoss,
    ForceClear,
    /// Any other label found in the export, kept verbatim.
    Other(String),
}

impl TradeStatus {
    pub const TAKE_PROFIT: &'static str = "TAKE_PROFIT";
    pub const STOP_LOSS: &'static str = "STOP_LOSS";
    pub const FORCE_CLEAR: &'static str = "FORCE_CLEAR";

    /// Maps an exported status label onto a variant. Matching is exact.
    pub fn parse(raw: &str) -> Self {
        match raw {
            Self::TAKE_PROFIT => TradeStatus::TakeProfit,
            Self::STOP_LOSS => TradeStatus::StopLoss,
            Self::FORCE_CLEAR => TradeStatus::ForceClear,
            other => TradeStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TradeStatus::TakeProfit => Self::TAKE_PROFIT,
            TradeStatus::StopLoss => Self::STOP_LOSS,
            TradeStatus::ForceClear => Self::FORCE_CLEAR,
            TradeStatus::Other(label) => label,
        }
    }

    pub fn is_take_profit(&self) -> bool {
        matches!(self, TradeStatus::TakeProfit)
    }

    pub fn is_stop_loss(&self) -> bool {
        matches!(self, TradeStatus::StopLoss)
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The side of the binary market a trade was placed on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Other(String),
}

impl Direction {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Up" => Direction::Up,
            "Down" => Direction::Down,
            other => Direction::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Other(label) => label,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_round_trip_through_as_str() {
        for label in ["TAKE_PROFIT", "STOP_LOSS", "FORCE_CLEAR", "EXPIRED"] {
            assert_eq!(TradeStatus::parse(label).as_str(), label);
        }
        assert!(TradeStatus::parse("TAKE_PROFIT").is_take_profit());
        assert!(TradeStatus::parse("STOP_LOSS").is_stop_loss());
    }

    #[test]
    fn status_matching_is_case_sensitive() {
        assert_eq!(
            TradeStatus::parse("take_profit"),
            TradeStatus::Other("take_profit".to_string())
        );
    }

    #[test]
    fn unknown_direction_is_preserved() {
        assert_eq!(Direction::parse("Up"), Direction::Up);
        assert_eq!(Direction::parse("Sideways").as_str(), "Sideways");
    }
}
