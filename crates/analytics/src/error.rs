use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("No data available for '{0}'")]
    NoData(String),

    #[error("Percentile fraction {0} is outside [0, 1]")]
    InvalidFraction(f64),
}
