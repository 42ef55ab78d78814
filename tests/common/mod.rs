#![allow(dead_code)]

use agehist::classifier::{Key, MAX_KEY};
use agehist::histogram::Histogram;

/// `A:<n>` maps to key `n` when `0 <= n <= MAX_KEY`; anything else is invalid.
pub fn tag_classifier(line: &str) -> Option<Key> {
    let n: i64 = line.strip_prefix("A:")?.parse().ok()?;
    if (0..=MAX_KEY as i64).contains(&n) {
        Some(n as Key)
    } else {
        None
    }
}

/// Deterministic `A:<n>` lines with a skewed key distribution.
pub fn tagged_lines(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let key = (i * 7919 + i / 3) % (MAX_KEY as usize + 1);
            format!("A:{}", key)
        })
        .collect()
}

/// Sequential reference tally.
pub fn reference_histogram<S: AsRef<str>>(lines: &[S]) -> Histogram {
    let mut histogram = Histogram::new();
    for line in lines {
        let line = line.as_ref();
        if line.is_empty() {
            continue;
        }
        if let Some(key) = tag_classifier(line) {
            histogram.add(key, 1);
        }
    }
    histogram
}
