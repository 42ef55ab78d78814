use crate::signal::CompletionFlag;
use crate::source::{Input, SourceError, next_line};
use crate::stats::PipelineCounters;
use crate::work_item::{ItemLedger, WorkItem};
use std::sync::Arc;
use tracing::debug;

/// Reads the input one line at a time and hands each line, as a
/// [`WorkItem`], to a dispatch callback.
///
/// The completion flag is finished on every exit path: after the last line,
/// when the input cannot be opened, when a read fails, and on panic.
pub struct Producer<'a> {
    ledger: &'a Arc<ItemLedger>,
    counters: &'a PipelineCounters,
    flag: &'a CompletionFlag,
}

impl<'a> Producer<'a> {
    pub fn new(
        ledger: &'a Arc<ItemLedger>,
        counters: &'a PipelineCounters,
        flag: &'a CompletionFlag,
    ) -> Self {
        Self {
            ledger,
            counters,
            flag,
        }
    }

    /// Produces every line of `input`. `dispatch` must take ownership of the
    /// item and return only once it has been handed off; retrying under
    /// backpressure is the callback's job.
    ///
    /// Returns the source error, if any. Lines read before a read error have
    /// already been dispatched and still count.
    pub fn run<F>(&self, input: Input, mut dispatch: F) -> Option<SourceError>
    where
        F: FnMut(WorkItem),
    {
        let _done = self.flag.guard();

        let (name, mut reader) = match input.open() {
            Ok(opened) => opened,
            Err(err) => {
                debug!(input = %err.name, error = %err.source, "cannot open input");
                return Some(err);
            }
        };

        let mut buf = Vec::with_capacity(64);
        let mut produced = 0u64;
        loop {
            match next_line(&mut reader, &mut buf) {
                Ok(Some(line)) => {
                    self.counters.line_read();
                    dispatch(self.ledger.issue(line));
                    produced += 1;
                }
                Ok(None) => break,
                Err(source) => {
                    debug!(input = %name, produced, error = %source, "read failed, stopping input");
                    return Some(SourceError::read(name, source));
                }
            }
        }

        debug!(input = %name, produced, "producer finished");
        None
    }
}
