use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyzerError {
    #[error("No trade outcome carries a parseable buy time")]
    NoTimedTrades,
}
