use crate::error::AgehistError;
use crate::queue::DEFAULT_QUEUE_CAPACITY;
use clap::ValueEnum;
use serde::Serialize;
use tracing::info;

/// Which pipeline runs the histogram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Bounded MPMC queue drained by a thread pool, sharded-map aggregation.
    #[default]
    Queue,
    /// One rayon task per line, atomic-array aggregation.
    Tasks,
}

/// Sizing for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Total threads, the producer included.
    pub workers: usize,
    /// Work queue slots, and the in-flight task cap in [`Mode::Tasks`].
    pub queue_capacity: usize,
    pub mode: Mode,
}

impl PipelineConfig {
    /// One worker per logical CPU and the default queue size.
    pub fn detect() -> Self {
        Self {
            workers: num_cpus::get().max(1),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            mode: Mode::default(),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn validate(&self) -> Result<(), AgehistError> {
        if self.workers == 0 {
            return Err(AgehistError::Config("workers must be at least 1".to_string()));
        }
        if self.queue_capacity == 0 {
            return Err(AgehistError::Config(
                "queue capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn log_summary(&self) {
        info!(
            mode = ?self.mode,
            workers = self.workers,
            queue_capacity = self.queue_capacity,
            cpus = num_cpus::get(),
            "pipeline configuration"
        );
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::detect()
    }
}
