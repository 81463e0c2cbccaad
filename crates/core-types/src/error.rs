use thiserror::Error;

/// The reason a single field of a raw row could not be interpreted.
///
/// These are expected noise in hand-exported data. Loaders log them at `debug`
/// level and never surface them to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("column '{0}' is not present in the row")]
    MissingField(String),

    #[error("column '{0}' is empty")]
    EmptyField(String),

    #[error("column '{column}' holds '{value}', which is not a finite number")]
    InvalidNumber { column: String, value: String },

    #[error("column '{column}' holds '{value}', which does not match the timestamp format")]
    InvalidTimestamp { column: String, value: String },
}
