use crate::classifier::Key;
use serde::Serialize;
use std::collections::BTreeMap;

/// Finished key → count table, ordered by key.
///
/// Only keys with a nonzero count are stored, so two runs over the same input
/// compare equal regardless of which aggregator produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Histogram {
    counts: BTreeMap<Key, u64>,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `count` occurrences of `key`. Zero counts are not stored.
    pub fn add(&mut self, key: Key, count: u64) {
        if count == 0 {
            return;
        }
        *self.counts.entry(key).or_insert(0) += count;
    }

    pub fn get(&self, key: Key) -> u64 {
        self.counts.get(&key).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct keys seen.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Ascending by key.
    pub fn iter(&self) -> impl Iterator<Item = (Key, u64)> + '_ {
        self.counts.iter().map(|(&k, &c)| (k, c))
    }
}

impl FromIterator<(Key, u64)> for Histogram {
    fn from_iter<I: IntoIterator<Item = (Key, u64)>>(iter: I) -> Self {
        let mut histogram = Histogram::new();
        for (key, count) in iter {
            histogram.add(key, count);
        }
        histogram
    }
}

impl<'a> IntoIterator for &'a Histogram {
    type Item = (Key, u64);
    type IntoIter = std::iter::Map<
        std::collections::btree_map::Iter<'a, Key, u64>,
        fn((&'a Key, &'a u64)) -> (Key, u64),
    >;

    fn into_iter(self) -> Self::IntoIter {
        let copy_pair: fn((&'a Key, &'a u64)) -> (Key, u64) = |(&k, &c)| (k, c);
        self.counts.iter().map(copy_pair)
    }
}
