use std::time::Duration;

const MIN_SLEEP: Duration = Duration::from_micros(50);
const MAX_SLEEP: Duration = Duration::from_millis(1);

/// Cooperative wait for a queue that is momentarily full or empty.
///
/// Spins and yields through `crossbeam_utils::Backoff` first; once that is
/// exhausted each further wait sleeps, doubling from 50µs up to 1ms.
/// Call [`Backoff::reset`] after making progress.
pub struct Backoff {
    inner: crossbeam_utils::Backoff,
    sleep: Duration,
}

impl Backoff {
    pub fn new() -> Self {
        Self {
            inner: crossbeam_utils::Backoff::new(),
            sleep: MIN_SLEEP,
        }
    }

    pub fn wait(&mut self) {
        if !self.inner.is_completed() {
            self.inner.snooze();
            return;
        }
        std::thread::sleep(self.sleep);
        self.sleep = (self.sleep * 2).min(MAX_SLEEP);
    }

    pub fn reset(&mut self) {
        self.inner.reset();
        self.sleep = MIN_SLEEP;
    }

    #[cfg(test)]
    fn is_sleeping(&self) -> bool {
        self.inner.is_completed()
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new()
    }
}
