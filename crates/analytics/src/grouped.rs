//! Partitioning records by a key before reducing each partition.

use core_types::Record;
use std::collections::BTreeMap;

/// Partitions records by the value of a categorical column.
///
/// Every record lands in exactly one group; groups iterate in the key's natural order.
pub fn partition<R: Record>(records: &[R], category: R::Category) -> BTreeMap<String, Vec<&R>> {
    partition_by(records, |r| Some(r.category(category).to_string()))
}

/// Partitions records by an arbitrary key. Records for which `key` returns `None`
/// are left out of every group.
pub fn partition_by<R, K: Ord>(
    records: &[R],
    key: impl Fn(&R) -> Option<K>,
) -> BTreeMap<K, Vec<&R>> {
    let mut groups: BTreeMap<K, Vec<&R>> = BTreeMap::new();
    for record in records {
        if let Some(k) = key(record) {
            groups.entry(k).or_default().push(record);
        }
    }
    groups
}
