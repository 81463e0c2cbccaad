use std::fmt::Debug;

/// Uniform access to a record's numeric metrics and categorical keys.
///
/// Aggregation is written once against this trait and works for every record type.
/// A metric returns `None` when its value is missing.
pub trait Record {
    type Metric: Copy + Debug;
    type Category: Copy + Debug;

    fn metric(&self, metric: Self::Metric) -> Option<f64>;

    fn category(&self, category: Self::Category) -> &str;
}

impl<R: Record + ?Sized> Record for &R {
    type Metric = R::Metric;
    type Category = R::Category;

    fn metric(&self, metric: Self::Metric) -> Option<f64> {
        (**self).metric(metric)
    }

    fn category(&self, category: Self::Category) -> &str {
        (**self).category(category)
    }
}

/// Category type for records that carry no categorical column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uncategorized {}
