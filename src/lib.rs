pub mod aggregator;
pub mod backoff;
pub mod classifier;
pub mod config;
pub mod consumer;
pub mod error;
pub mod histogram;
pub mod pipeline;
pub mod producer;
pub mod queue;
pub mod report;
pub mod signal;
pub mod source;
pub mod stats;
pub mod work_item;

pub use classifier::{AgeClassifier, Classify, Key, MAX_KEY};
pub use config::{Mode, PipelineConfig};
pub use error::*;
pub use histogram::Histogram;
pub use pipeline::{RunSummary, run, run_queue, run_tasks};
pub use source::Input;
