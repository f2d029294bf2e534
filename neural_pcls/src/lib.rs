//! # neural_pcls
//!
//! Point-cloud classification with Burn.
//!
//! This crate holds the models, the label-smoothed loss and the
//! train / evaluate / checkpoint loop, driven by the `main_cls` and
//! `eval_cls` binaries.
//!
//! ## Features
//!
//! - **Models**: PointNet and the IBT attention classifier behind one
//!   [`PointClassifier`] trait
//! - **Loss**: label-smoothed cross entropy
//! - **Training**: SGD or Adam under a cosine or step schedule, best-accuracy
//!   checkpointing to a fixed path
//! - **Evaluation**: standalone checkpoint scoring with accuracy and
//!   balanced accuracy
//!
//! ## Quick Start
//!
//! ```ignore
//! use neural_pcls::{config::TrainingConfig, run::train};
//! use burn::backend::{Autodiff, NdArray};
//!
//! type MyBackend = Autodiff<NdArray>;
//!
//! let config = TrainingConfig::new()
//!     .with_model(neural_pcls::ModelKind::PointNet)
//!     .with_epochs(10);
//! let device = Default::default();
//!
//! let summary = train::<MyBackend>(&config, "outputs/exp/models/model.t7".into(), &device)?;
//! println!("best test acc: {:.6}", summary.best_accuracy);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! pcls_core (metrics, schedules)
//!     │
//!     ├──────────────────┐
//!     ▼                  ▼
//! pcls_io           neural_pcls
//! (datasets,  ───▶  (models, training,
//!  outputs)          main_cls / eval_cls)
//! ```
//!
//! ## Feature Flags
//!
//! - `wgpu`: GPU acceleration via WebGPU (CPU ndarray backend otherwise)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod loss;
pub mod nn;
pub mod run;
pub mod training;

// Re-export key types for convenience
pub use config::{ModelConfig, TrainingConfig};
pub use error::{NeuralPclsError, Result};
pub use loss::ClassificationLoss;
pub use nn::{ModelKind, PointClassifier};
pub use run::{run, RunOutcome};
pub use training::{Trainer, TrainingOutcome, TrainingSummary};

// Re-export from pcls_core and pcls_io for convenience
pub use pcls_core::{PassMetrics, PassSummary, SchedulerKind};
pub use pcls_io::{DatasetKind, Experiment};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::backend::{select_device, ADBackend, TrainBackend, TrainDevice};
    pub use crate::config::{IbtClsConfig, ModelConfig, PointNetClsConfig, TrainingConfig};
    pub use crate::error::{NeuralPclsError, Result};
    pub use crate::loss::ClassificationLoss;
    pub use crate::nn::{IbtCls, ModelKind, PointClassifier, PointNetCls};
    pub use crate::run::{evaluate_checkpoint, run, train, RunOutcome};
    pub use crate::training::{
        checkpoint_exists, evaluate, load_checkpoint, save_checkpoint, ClassificationBatch,
        EpochReport, OptimizerKind, PassOptions, PassReport, Trainer, TrainingOutcome,
        TrainingSummary,
    };

    pub use pcls_core::{PassMetrics, PassSummary, SchedulerKind};
    pub use pcls_io::{DataLoader, DatasetKind, Experiment, PointCloudDataset};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api() {
        let config = TrainingConfig::default();
        let model = config.model_config();

        assert_eq!(model.num_classes, DatasetKind::ModelNet40.num_classes());
        assert_eq!(model.kind, ModelKind::Ibt);
        assert_eq!(ClassificationLoss::default().smoothing(), 0.2);
    }
}
