//! # pcls_core
//!
//! Pure algorithms behind point-cloud classification runs.
//!
//! Nothing in this crate touches tensors, devices or files. It holds the
//! parts of a training run that are plain arithmetic and therefore worth
//! testing exhaustively on their own:
//!
//! - [`metrics`]: accuracy and class-balanced accuracy over a whole pass
//! - [`schedule`]: cosine and floored step learning-rate schedules
//! - [`checkpoint`]: the keep-latest-best checkpoint decision
//! - [`accumulator`]: running loss and prediction/label accumulation
//! - [`error`]: error types
//!
//! ## Usage
//!
//! ```
//! use pcls_core::prelude::*;
//!
//! let mut pass = PassAccumulator::new();
//! pass.record(0.7, vec![0, 1, 1], vec![0, 1, 0]).unwrap();
//! let summary = pass.finish().unwrap();
//!
//! let mut best = BestAccuracy::new();
//! assert!(best.observe(summary.metrics.accuracy));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod accumulator;
pub mod checkpoint;
pub mod error;
pub mod metrics;
pub mod schedule;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::accumulator::{PassAccumulator, PassSummary, PredictionAccumulator, RunningLoss};
    pub use crate::checkpoint::BestAccuracy;
    pub use crate::error::PclsCoreError;
    pub use crate::metrics::{accuracy, balanced_accuracy, ConfusionMatrix, PassMetrics};
    pub use crate::schedule::{
        CosineAnnealing, LrSchedule, LrScheduler, SchedulerKind, StepDecay,
    };
}

pub use accumulator::{PassAccumulator, PassSummary, PredictionAccumulator, RunningLoss};
pub use checkpoint::BestAccuracy;
pub use error::{PclsCoreError, Result};
pub use metrics::{accuracy, balanced_accuracy, ConfusionMatrix, PassMetrics};
pub use schedule::{
    CosineAnnealing, LrSchedule, LrScheduler, SchedulerKind, StepDecay, COSINE_LR_FLOOR,
    STEP_GAMMA, STEP_LR_FLOOR, STEP_SIZE,
};
