use std::sync::atomic::{AtomicBool, Ordering};

/// Write-once "no more work is coming" flag.
///
/// `finish` is a release store and `is_done` an acquire load: everything the
/// producer did before finishing, including every successful enqueue, is
/// visible to a thread that sees `is_done() == true`.
#[derive(Debug, Default)]
pub struct CompletionFlag {
    done: AtomicBool,
}

impl CompletionFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the flag to DONE. Returns `true` only for the call that made
    /// the transition.
    pub fn finish(&self) -> bool {
        !self.done.swap(true, Ordering::AcqRel)
    }

    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Finishes the flag when dropped, including during a panic unwind.
    pub fn guard(&self) -> FinishOnDrop<'_> {
        FinishOnDrop { flag: self }
    }
}

pub struct FinishOnDrop<'a> {
    flag: &'a CompletionFlag,
}

impl Drop for FinishOnDrop<'_> {
    fn drop(&mut self) {
        self.flag.finish();
    }
}
