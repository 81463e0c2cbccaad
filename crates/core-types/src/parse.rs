use crate::error::ParseFailure;
use crate::raw::RawRow;
use chrono::{NaiveDateTime, TimeDelta};

/// How a record type reacts when one of its fields fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Any failed required field drops the whole row. No partially populated record exists.
    RejectRow,
    /// A failed field becomes a missing value. The row is always kept and every
    /// derived value that depends on the field is missing too.
    Coerce,
}

/// Construction of a validated record from a raw row.
pub trait FromRawRow: Sized {
    const POLICY: MissingPolicy;

    /// Builds the record. `timestamp_format` is a chrono format string such as
    /// `"%Y/%m/%d %H:%M:%S"`.
    ///
    /// Types following `MissingPolicy::Coerce` never return `Err`.
    fn from_row(row: &RawRow, timestamp_format: &str) -> Result<Self, ParseFailure>;
}

/// Returns the column's raw text, failing if the column is absent.
pub fn field<'a>(row: &'a RawRow, column: &str) -> Result<&'a str, ParseFailure> {
    row.get(column)
        .ok_or_else(|| ParseFailure::MissingField(column.to_string()))
}

/// Like `field`, but also rejects values that are empty after trimming.
pub fn non_empty<'a>(row: &'a RawRow, column: &str) -> Result<&'a str, ParseFailure> {
    let value = field(row, column)?.trim();
    if value.is_empty() {
        return Err(ParseFailure::EmptyField(column.to_string()));
    }
    Ok(value)
}

/// Parses a finite floating-point number.
pub fn number(row: &RawRow, column: &str) -> Result<f64, ParseFailure> {
    let value = non_empty(row, column)?;
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(ParseFailure::InvalidNumber {
            column: column.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Parses a timezone-free timestamp under `format`.
pub fn timestamp(row: &RawRow, column: &str, format: &str) -> Result<NaiveDateTime, ParseFailure> {
    let value = non_empty(row, column)?;
    NaiveDateTime::parse_from_str(value, format).map_err(|_| ParseFailure::InvalidTimestamp {
        column: column.to_string(),
        value: value.to_string(),
    })
}

/// The `MissingPolicy::Coerce` step: a failed parse becomes a missing value.
pub fn coerce<T>(parsed: Result<T, ParseFailure>) -> Option<T> {
    match parsed {
        Ok(value) => Some(value),
        Err(failure) => {
            tracing::trace!(%failure, "Coercing field to missing");
            None
        }
    }
}

/// Signed elapsed seconds from `start` to `end`. Negative when `end` precedes `start`.
pub fn seconds_between(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    elapsed_seconds(end - start)
}

fn elapsed_seconds(delta: TimeDelta) -> f64 {
    delta.num_milliseconds() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORMAT: &str = "%Y/%m/%d %H:%M:%S";

    #[test]
    fn number_rejects_empty_and_non_finite_values() {
        let row = RawRow::from_pairs(2, [("a", " 0.39 "), ("b", ""), ("c", "nan"), ("d", "x")]);
        assert_eq!(number(&row, "a"), Ok(0.39));
        assert_eq!(number(&row, "b"), Err(ParseFailure::EmptyField("b".into())));
        assert!(matches!(number(&row, "c"), Err(ParseFailure::InvalidNumber { .. })));
        assert!(matches!(number(&row, "d"), Err(ParseFailure::InvalidNumber { .. })));
        assert_eq!(number(&row, "e"), Err(ParseFailure::MissingField("e".into())));
    }

    #[test]
    fn timestamp_uses_the_given_format_only() {
        let row = RawRow::from_pairs(2, [("t", "2026/01/15 00:46:53"), ("iso", "2026-01-15 00:46:53")]);
        let parsed = timestamp(&row, "t", FORMAT).unwrap();
        assert_eq!(parsed.to_string(), "2026-01-15 00:46:53");
        assert!(matches!(
            timestamp(&row, "iso", FORMAT),
            Err(ParseFailure::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn seconds_between_is_signed() {
        let row = RawRow::from_pairs(2, [("a", "2026/01/15 00:46:53"), ("b", "2026/01/15 00:47:10")]);
        let a = timestamp(&row, "a", FORMAT).unwrap();
        let b = timestamp(&row, "b", FORMAT).unwrap();
        assert_eq!(seconds_between(a, b), 17.0);
        assert_eq!(seconds_between(b, a), -17.0);
    }

    #[test]
    fn coerce_turns_failures_into_missing() {
        let row = RawRow::from_pairs(2, [("p", "abc")]);
        assert_eq!(coerce(number(&row, "p")), None);
        assert_eq!(coerce(Ok::<_, ParseFailure>(1.5)), Some(1.5));
    }
}
