//! Concurrent key → count tallies.
//!
//! [`ShardedAggregator`] takes any key and serializes updates per shard of a
//! concurrent map. [`AtomicAggregator`] only takes keys in `0..=MAX_KEY` and
//! keeps one independent atomic counter per key. Neither has a lock shared by
//! all keys.

use crate::classifier::{KEY_DOMAIN, Key};
use crate::histogram::Histogram;
use crossbeam_utils::CachePadded;
use dashmap::DashMap;
use itertools::Itertools;
use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;
use std::sync::atomic::{AtomicU64, Ordering};

type FxBuildHasher = BuildHasherDefault<FxHasher>;

pub trait Aggregator: Send + Sync {
    /// Records one occurrence of `key`. Safe to call from any thread.
    fn increment(&self, key: Key);

    /// Visits every key with a nonzero count in ascending order. The `&mut`
    /// receiver rules out concurrent writers for the duration of the pass.
    fn for_each_sorted_by_key<F: FnMut(Key, u64)>(&mut self, visit: F);

    fn into_histogram(mut self) -> Histogram
    where
        Self: Sized,
    {
        let mut histogram = Histogram::new();
        self.for_each_sorted_by_key(|key, count| histogram.add(key, count));
        histogram
    }
}

/// Key-sharded concurrent map of counts.
///
/// An increment locks only the shard holding its key; increments on keys in
/// other shards proceed in parallel.
#[derive(Debug)]
pub struct ShardedAggregator {
    counts: DashMap<Key, u64, FxBuildHasher>,
}

impl ShardedAggregator {
    pub fn new() -> Self {
        Self {
            counts: DashMap::with_capacity_and_hasher(KEY_DOMAIN, FxBuildHasher::default()),
        }
    }

    pub fn get(&self, key: Key) -> u64 {
        self.counts.get(&key).map(|count| *count).unwrap_or(0)
    }
}

impl Default for ShardedAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator for ShardedAggregator {
    fn increment(&self, key: Key) {
        // The entry guard holds the shard's write lock, so insert-if-absent
        // and the add are one step for this key.
        *self.counts.entry(key).or_insert(0) += 1;
    }

    fn for_each_sorted_by_key<F: FnMut(Key, u64)>(&mut self, mut visit: F) {
        self.counts
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .filter(|&(_, count)| count > 0)
            .sorted_unstable_by_key(|&(key, _)| key)
            .for_each(|(key, count)| visit(key, count));
    }
}

/// One cache-padded atomic counter per key in `0..=MAX_KEY`.
#[derive(Debug)]
pub struct AtomicAggregator {
    counters: Box<[CachePadded<AtomicU64>]>,
}

impl AtomicAggregator {
    pub fn new() -> Self {
        Self {
            counters: (0..KEY_DOMAIN)
                .map(|_| CachePadded::new(AtomicU64::new(0)))
                .collect(),
        }
    }

    pub fn get(&self, key: Key) -> u64 {
        self.counters
            .get(key as usize)
            .map(|counter| counter.load(Ordering::Relaxed))
            .unwrap_or(0)
    }
}

impl Default for AtomicAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator for AtomicAggregator {
    /// Keys outside the domain are ignored.
    fn increment(&self, key: Key) {
        if let Some(counter) = self.counters.get(key as usize) {
            // Counters are independent; no ordering with other keys is needed.
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn for_each_sorted_by_key<F: FnMut(Key, u64)>(&mut self, mut visit: F) {
        for (key, counter) in self.counters.iter_mut().enumerate() {
            let count = *counter.get_mut();
            if count > 0 {
                visit(key as Key, count);
            }
        }
    }
}
