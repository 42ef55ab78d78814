//! The two pipeline variants.
//!
//! [`run_queue`] has one thread produce into a [`BoundedQueue`] while every
//! thread, the producer included once it is done, drains it. [`run_tasks`]
//! turns each line into a rayon task and lets the scope join them.
//!
//! Both finish with every issued work item released and return a
//! [`RunSummary`]; an unreadable input is reported in the summary, not as an
//! error.

use crate::aggregator::{Aggregator, AtomicAggregator, ShardedAggregator};
use crate::backoff::Backoff;
use crate::classifier::Classify;
use crate::config::{Mode, PipelineConfig};
use crate::consumer::Consumer;
use crate::error::AgehistError;
use crate::histogram::Histogram;
use crate::producer::Producer;
use crate::queue::BoundedQueue;
use crate::signal::CompletionFlag;
use crate::source::{Input, SourceError};
use crate::stats::{PipelineCounters, RunStats};
use crate::work_item::{ItemLedger, WorkItem};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct RunSummary {
    pub histogram: Histogram,
    pub stats: RunStats,
    pub items_issued: u64,
    pub items_released: u64,
    pub source_error: Option<SourceError>,
    pub mode: Mode,
    pub workers: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    fn log(&self) {
        info!(
            mode = ?self.mode,
            workers = self.workers,
            lines = self.stats.lines_read,
            processed = self.stats.processed(),
            counted = self.stats.counted,
            rejected = self.stats.rejected,
            blank = self.stats.blank,
            keys = self.histogram.len(),
            elapsed_ms = self.elapsed.as_millis() as u64,
            "pipeline finished"
        );
    }
}

/// Runs the variant `config.mode` selects with its usual aggregator.
pub fn run<C>(
    input: Input,
    classifier: &C,
    config: &PipelineConfig,
) -> Result<RunSummary, AgehistError>
where
    C: Classify + ?Sized,
{
    match config.mode {
        Mode::Queue => run_queue(input, classifier, ShardedAggregator::new(), config),
        Mode::Tasks => run_tasks(input, classifier, AtomicAggregator::new(), config),
    }
}

/// Queue variant on `config.workers` scoped OS threads.
///
/// The calling thread is the producer. When the queue is full it handles one
/// queued item itself before backing off, so a single worker or a stalled
/// pool still makes progress.
pub fn run_queue<C, A>(
    input: Input,
    classifier: &C,
    aggregator: A,
    config: &PipelineConfig,
) -> Result<RunSummary, AgehistError>
where
    C: Classify + ?Sized,
    A: Aggregator,
{
    config.validate()?;
    config.log_summary();
    let started = Instant::now();

    let queue: BoundedQueue<WorkItem> = BoundedQueue::with_capacity(config.queue_capacity);
    debug!(capacity = queue.capacity(), "work queue ready");
    let flag = CompletionFlag::new();
    let ledger = ItemLedger::new();
    let counters = PipelineCounters::new();
    let consumer = Consumer::new(classifier, &aggregator, &counters);

    let source_error = std::thread::scope(|s| {
        for worker in 1..config.workers {
            let (consumer, queue, flag) = (&consumer, &queue, &flag);
            s.spawn(move || {
                let handled = consumer.drain(queue, flag);
                debug!(worker, handled, "consumer finished");
            });
        }

        let producer = Producer::new(&ledger, &counters, &flag);
        let mut backoff = Backoff::new();
        let source_error = producer.run(input, |mut item| loop {
            match queue.try_push(item) {
                Ok(()) => {
                    backoff.reset();
                    break;
                }
                Err(back) => {
                    item = back;
                    match queue.try_pop() {
                        Some(queued) => consumer.process(queued),
                        None => backoff.wait(),
                    }
                }
            }
        });

        debug!(queued = queue.len(), "producer done reading, draining");
        let handled = consumer.drain(&queue, &flag);
        debug!(worker = 0, handled, "producer thread finished consuming");
        source_error
    });

    Ok(finish(aggregator, &counters, &ledger, source_error, config, started))
}

/// Task variant on a dedicated rayon pool of `config.workers` threads.
///
/// At most `config.queue_capacity` tasks are in flight; past that the
/// producer runs queued tasks itself or backs off.
pub fn run_tasks<C, A>(
    input: Input,
    classifier: &C,
    aggregator: A,
    config: &PipelineConfig,
) -> Result<RunSummary, AgehistError>
where
    C: Classify + ?Sized,
    A: Aggregator,
{
    config.validate()?;
    config.log_summary();
    let started = Instant::now();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .thread_name(|i| format!("agehist-task-{}", i))
        .build()?;

    let flag = CompletionFlag::new();
    let ledger = ItemLedger::new();
    let counters = PipelineCounters::new();
    let consumer = Consumer::new(classifier, &aggregator, &counters);
    let in_flight = AtomicUsize::new(0);
    let limit = config.queue_capacity;

    let source_error = pool.scope(|s| {
        let producer = Producer::new(&ledger, &counters, &flag);
        let mut backoff = Backoff::new();
        producer.run(input, |item| {
            while in_flight.load(Ordering::Acquire) >= limit {
                match rayon::yield_local() {
                    Some(rayon::Yield::Executed) => backoff.reset(),
                    _ => backoff.wait(),
                }
            }
            in_flight.fetch_add(1, Ordering::Relaxed);
            let (consumer, in_flight) = (&consumer, &in_flight);
            s.spawn(move |_| {
                consumer.process(item);
                in_flight.fetch_sub(1, Ordering::Release);
            });
        })
    });

    Ok(finish(aggregator, &counters, &ledger, source_error, config, started))
}

fn finish<A: Aggregator>(
    aggregator: A,
    counters: &PipelineCounters,
    ledger: &ItemLedger,
    source_error: Option<SourceError>,
    config: &PipelineConfig,
    started: Instant,
) -> RunSummary {
    let outstanding = ledger.outstanding();
    if outstanding > 0 {
        warn!(outstanding, "work items still alive after the run");
    }
    let summary = RunSummary {
        histogram: aggregator.into_histogram(),
        stats: counters.snapshot(),
        items_issued: ledger.issued(),
        items_released: ledger.released(),
        source_error,
        mode: config.mode,
        workers: config.workers,
        elapsed: started.elapsed(),
    };
    summary.log();
    summary
}
