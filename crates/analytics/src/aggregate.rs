//! Reductions over a sequence of records.
//!
//! Missing values are skipped by every numeric reduction without shrinking the record
//! count reported elsewhere.

use crate::error::AnalyticsError;
use crate::report::{Distribution, PercentilePoint};
use core_types::Record;
use std::collections::BTreeMap;

/// Non-missing values of `metric`, in record order.
pub fn values<R: Record>(records: &[R], metric: R::Metric) -> Vec<f64> {
    records.iter().filter_map(|r| r.metric(metric)).collect()
}

/// Non-missing values of `metric`, sorted ascending.
pub fn sorted_values<R: Record>(records: &[R], metric: R::Metric) -> Vec<f64> {
    let mut values = values(records, metric);
    values.sort_by(f64::total_cmp);
    values
}

/// Arithmetic mean over the non-missing values of `metric`.
///
/// Fails with `NoData` when there are no records or every value is missing.
pub fn mean<R: Record>(records: &[R], metric: R::Metric) -> Result<f64, AnalyticsError> {
    let values = values(records, metric);
    if values.is_empty() {
        return Err(AnalyticsError::NoData(format!("mean of {metric:?}")));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// `a / (a + b)` where `a` and `b` count the records matching each predicate.
///
/// Returns exactly `0.0` when neither predicate matches anything.
pub fn ratio<R>(
    records: &[R],
    match_a: impl Fn(&R) -> bool,
    match_b: impl Fn(&R) -> bool,
) -> f64 {
    let a = records.iter().filter(|&r| match_a(r)).count();
    let b = records.iter().filter(|&r| match_b(r)).count();
    if a + b == 0 {
        return 0.0;
    }
    a as f64 / (a + b) as f64
}

/// Nearest-rank percentile over already sorted values: the value at index
/// `floor(fraction * n)`, zero-based and without interpolation.
pub fn percentile_of_sorted(sorted: &[f64], fraction: f64) -> Result<f64, AnalyticsError> {
    if !(0.0..=1.0).contains(&fraction) {
        return Err(AnalyticsError::InvalidFraction(fraction));
    }
    let n = sorted.len();
    if n == 0 {
        return Err(AnalyticsError::NoData(format!("percentile {fraction}")));
    }
    // fraction == 1.0 would index one past the end.
    let index = ((fraction * n as f64).floor() as usize).min(n - 1);
    Ok(sorted[index])
}

/// Nearest-rank percentile of `metric` over the non-missing values.
pub fn percentile<R: Record>(
    records: &[R],
    metric: R::Metric,
    fraction: f64,
) -> Result<f64, AnalyticsError> {
    percentile_of_sorted(&sorted_values(records, metric), fraction)
}

/// Several percentiles of the same metric, sorting only once.
pub fn percentiles<R: Record>(
    records: &[R],
    metric: R::Metric,
    fractions: &[f64],
) -> Result<Vec<PercentilePoint>, AnalyticsError> {
    let sorted = sorted_values(records, metric);
    fractions
        .iter()
        .map(|&fraction| {
            Ok(PercentilePoint {
                fraction,
                value: percentile_of_sorted(&sorted, fraction)?,
            })
        })
        .collect()
}

/// Frequency table of a categorical column.
pub fn count_by<R: Record>(records: &[R], category: R::Category) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.category(category).to_string()).or_insert(0) += 1;
    }
    counts
}

/// Count, mean, sample standard deviation, extremes and percentiles of `metric`.
pub fn distribution<R: Record>(
    records: &[R],
    metric: R::Metric,
    fractions: &[f64],
) -> Result<Distribution, AnalyticsError> {
    let sorted = sorted_values(records, metric);
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Err(AnalyticsError::NoData(format!("distribution of {metric:?}")));
    };

    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std_dev = (count > 1).then(|| {
        let variance =
            sorted.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (count - 1) as f64;
        variance.sqrt()
    });

    let percentiles = fractions
        .iter()
        .map(|&fraction| {
            Ok(PercentilePoint {
                fraction,
                value: percentile_of_sorted(&sorted, fraction)?,
            })
        })
        .collect::<Result<Vec<_>, AnalyticsError>>()?;

    Ok(Distribution {
        count,
        mean,
        std_dev,
        min,
        max,
        percentiles,
    })
}
