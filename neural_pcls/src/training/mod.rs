//! Training infrastructure for point-cloud classification.
//!
//! This module provides:
//! - `Trainer`: the epoch loop
//! - `evaluate`: the shared no-gradient pass
//! - Optimizer selection
//! - Pass reports in run-log format
//! - Checkpoint save/load

mod batch;
mod checkpoint;
mod evaluator;
mod metrics;
mod optimizer;
mod progress;
mod trainer;

pub use batch::{predictions, ClassificationBatch};
pub use checkpoint::{checkpoint_exists, load_checkpoint, save_checkpoint};
pub use evaluator::{evaluate, PassOptions};
pub use metrics::{EpochReport, PassKind, PassReport, TrainingOutcome, TrainingSummary};
pub use optimizer::{
    adam_config, momentum_config, sgd_config, OptimizerKind, ADAM_EPSILON, SGD_LR_SCALE,
};
pub use progress::batch_progress;
pub use trainer::Trainer;
