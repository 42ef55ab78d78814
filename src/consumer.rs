use crate::aggregator::Aggregator;
use crate::backoff::Backoff;
use crate::classifier::{Classify, in_domain};
use crate::queue::BoundedQueue;
use crate::signal::CompletionFlag;
use crate::stats::PipelineCounters;
use crate::work_item::WorkItem;

/// Classifies work items and feeds their keys to an aggregator.
///
/// Shared by reference between all worker threads; it holds no state of its
/// own beyond the borrowed collaborators.
pub struct Consumer<'a, C: ?Sized, A> {
    classifier: &'a C,
    aggregator: &'a A,
    counters: &'a PipelineCounters,
}

impl<'a, C, A> Consumer<'a, C, A>
where
    C: Classify + ?Sized,
    A: Aggregator,
{
    pub fn new(classifier: &'a C, aggregator: &'a A, counters: &'a PipelineCounters) -> Self {
        Self {
            classifier,
            aggregator,
            counters,
        }
    }

    /// Handles one item and releases it. Blank lines never reach the
    /// classifier; keys outside `0..=MAX_KEY` are dropped.
    pub fn process(&self, item: WorkItem) {
        if item.is_blank() {
            self.counters.blank();
            return;
        }
        match self.classifier.classify(item.line()).filter(|&key| in_domain(key)) {
            Some(key) => {
                self.aggregator.increment(key);
                self.counters.counted();
            }
            None => self.counters.rejected(),
        }
    }

    /// Pulls from `queue` until the producer is done and the queue is
    /// drained. Returns the number of items this call handled.
    ///
    /// Emptiness is only trusted when checked after `flag` reads DONE; an
    /// empty queue seen earlier may still be refilled.
    pub fn drain(&self, queue: &BoundedQueue<WorkItem>, flag: &CompletionFlag) -> u64 {
        let mut backoff = Backoff::new();
        let mut handled = 0u64;
        loop {
            if let Some(item) = queue.try_pop() {
                self.process(item);
                handled += 1;
                backoff.reset();
                continue;
            }
            if flag.is_done() && queue.is_empty() {
                return handled;
            }
            backoff.wait();
        }
    }
}
