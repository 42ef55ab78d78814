use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counts work items handed out and work items released.
///
/// Every [`WorkItem`] is created through [`ItemLedger::issue`] and reports
/// back when dropped, so after a run `issued() == released()` unless an item
/// is still alive somewhere.
#[derive(Debug, Default)]
pub struct ItemLedger {
    issued: AtomicU64,
    released: AtomicU64,
}

impl ItemLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn issue(self: &Arc<Self>, line: String) -> WorkItem {
        self.issued.fetch_add(1, Ordering::Relaxed);
        WorkItem {
            line,
            ledger: Arc::clone(self),
        }
    }

    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::Relaxed)
    }

    pub fn released(&self) -> u64 {
        self.released.load(Ordering::Relaxed)
    }

    pub fn outstanding(&self) -> u64 {
        self.issued().saturating_sub(self.released())
    }
}

/// One input line in flight between the producer and a consumer.
///
/// Deliberately neither `Clone` nor `Copy`: the producer moves it into the
/// queue, the queue moves it out to exactly one consumer, and that consumer
/// releases it by dropping it.
#[derive(Debug)]
pub struct WorkItem {
    line: String,
    ledger: Arc<ItemLedger>,
}

impl WorkItem {
    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn is_blank(&self) -> bool {
        self.line.is_empty()
    }
}

impl Drop for WorkItem {
    fn drop(&mut self) {
        self.ledger.released.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_release_pairs() {
        let ledger = ItemLedger::new();
        let a = ledger.issue("2005-01-06".to_string());
        let b = ledger.issue(String::new());
        assert_eq!(ledger.issued(), 2);
        assert_eq!(ledger.outstanding(), 2);
        assert_eq!(a.line(), "2005-01-06");
        assert!(b.is_blank());

        drop(a);
        assert_eq!(ledger.released(), 1);
        drop(b);
        assert_eq!(ledger.released(), 2);
        assert_eq!(ledger.outstanding(), 0);
    }

    #[test]
    fn test_release_follows_the_owner_across_threads() {
        let ledger = ItemLedger::new();
        let item = ledger.issue("x".to_string());
        std::thread::spawn(move || {
            assert_eq!(item.line(), "x");
        })
        .join()
        .unwrap();
        assert_eq!(ledger.issued(), ledger.released());
    }
}
