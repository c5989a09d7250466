//! Single-pass grouping of sorted records into keyed buckets.
//!
//! Records arrive sorted by the aggregated attribute. A new group starts
//! whenever the derived key of a record differs from the key of the record
//! before it, so every group is one contiguous run of the sorted sequence.
//!
//! The key function must be order-consistent with the sort: if two records
//! share a derived key, every record between them must share it as well.
//! When that does not hold the same key shows up in two separate runs and the
//! later run replaces the earlier one. This is logged at `warn` level and left
//! to the caller to avoid.

use std::borrow::Borrow;
use std::hash::Hash;

use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::models::{ArrivalRecord, AttributeValue};
use crate::utils::logging::log_warning;

/// Derived key to the ordered records that share it
///
/// Groups iterate in the order they were committed, which is the sort order of
/// the aggregated attribute.
#[derive(Debug, Clone)]
pub struct AggregationMap<K> {
    groups: Vec<(K, Vec<ArrivalRecord>)>,
    index: FxHashMap<K, usize>,
}

impl<K> Default for AggregationMap<K> {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

impl<K> AggregationMap<K>
where
    K: Eq + Hash + Clone,
{
    /// Create an empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a finished run under its key
    fn commit(&mut self, key: K, records: Vec<ArrivalRecord>) {
        if let Some(&pos) = self.index.get(&key) {
            log_warning(
                "Aggregation key seen in two separate runs",
                Some(&format!(
                    "{} records replaced by {}",
                    self.groups[pos].1.len(),
                    records.len()
                )),
            );
            self.groups[pos].1 = records;
        } else {
            self.index.insert(key.clone(), self.groups.len());
            self.groups.push((key, records));
        }
    }

    /// Records stored under `key`
    pub fn get<Q>(&self, key: &Q) -> Option<&[ArrivalRecord]>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index
            .get(key)
            .map(|&pos| self.groups[pos].1.as_slice())
    }

    /// Number of records under `key`, zero when the key is absent
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).map_or(0, <[ArrivalRecord]>::len)
    }

    /// Whether `key` has a group
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Number of groups
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no groups
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Keys in commit order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.groups.iter().map(|(k, _)| k)
    }

    /// Groups in commit order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[ArrivalRecord])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Consume the map, yielding groups in commit order
    #[must_use]
    pub fn into_groups(self) -> Vec<(K, Vec<ArrivalRecord>)> {
        self.groups
    }
}

impl<K> IntoIterator for AggregationMap<K> {
    type Item = (K, Vec<ArrivalRecord>);
    type IntoIter = std::vec::IntoIter<(K, Vec<ArrivalRecord>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Group `(value, record)` pairs, already sorted by value, into runs of equal derived key
pub fn group_runs<K, F, I>(sorted: I, mut key_fn: F) -> AggregationMap<K>
where
    I: IntoIterator<Item = (AttributeValue, ArrivalRecord)>,
    F: FnMut(&AttributeValue) -> K,
    K: Eq + Hash + Clone,
{
    let mut aggregation = AggregationMap::new();
    let runs = sorted.into_iter().chunk_by(|(value, _)| key_fn(value));
    for (key, run) in &runs {
        aggregation.commit(key, run.map(|(_, record)| record).collect());
    }
    aggregation
}
