use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-run counters shared by the producer and every consumer.
///
/// Counts are relaxed: they are only read after the workers have joined.
#[derive(Debug, Default)]
pub struct PipelineCounters {
    lines_read: AtomicU64,
    blank: AtomicU64,
    counted: AtomicU64,
    rejected: AtomicU64,
}

impl PipelineCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line_read(&self) {
        self.lines_read.fetch_add(1, Ordering::Relaxed);
    }

    pub fn blank(&self) {
        self.blank.fetch_add(1, Ordering::Relaxed);
    }

    pub fn counted(&self) {
        self.counted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RunStats {
        RunStats {
            lines_read: self.lines_read.load(Ordering::Relaxed),
            blank: self.blank.load(Ordering::Relaxed),
            counted: self.counted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}

/// Frozen counters for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub lines_read: u64,
    pub blank: u64,
    pub counted: u64,
    /// Lines the classifier could not turn into an in-range key.
    pub rejected: u64,
}

impl RunStats {
    /// Lines that went through a consumer, whatever the outcome.
    pub fn processed(&self) -> u64 {
        self.blank + self.counted + self.rejected
    }
}
