//! Run configuration.

use std::path::PathBuf;

use burn::config::Config;

use pcls_core::SchedulerKind;
use pcls_io::DatasetKind;

use super::ModelConfig;
use crate::nn::ModelKind;

/// Everything a training or evaluation run needs, saved to `config.json`.
#[derive(Config, Debug)]
pub struct TrainingConfig {
    /// Experiment name; outputs go to `<output_root>/<exp_name>`.
    #[config(default = "String::from(\"exp\")")]
    pub exp_name: String,

    /// Model architecture.
    #[config(default = "ModelKind::Ibt")]
    pub model: ModelKind,

    /// Benchmark dataset.
    #[config(default = "DatasetKind::ModelNet40")]
    pub dataset: DatasetKind,

    /// Directory holding `<dataset>/<split>.pcls` files.
    #[config(default = "PathBuf::from(\"data\")")]
    pub data_root: PathBuf,

    /// Directory holding experiment outputs.
    #[config(default = "PathBuf::from(\"outputs\")")]
    pub output_root: PathBuf,

    /// Training batch size.
    #[config(default = 24)]
    pub batch_size: usize,

    /// Evaluation batch size.
    #[config(default = 12)]
    pub test_batch_size: usize,

    /// Number of training epochs.
    #[config(default = 200)]
    pub epochs: usize,

    /// SGD when true, Adam otherwise.
    #[config(default = true)]
    pub use_sgd: bool,

    /// Base learning rate. SGD runs at 100x this value.
    #[config(default = 0.001)]
    pub lr: f64,

    /// SGD momentum.
    #[config(default = 0.9)]
    pub momentum: f64,

    /// L2 penalty for both optimizers.
    #[config(default = 1e-4)]
    pub weight_decay: f64,

    /// Learning-rate schedule.
    #[config(default = "SchedulerKind::Cos")]
    pub scheduler: SchedulerKind,

    /// Force the CPU device.
    #[config(default = false)]
    pub no_cuda: bool,

    /// Random seed.
    #[config(default = 1)]
    pub seed: u64,

    /// Evaluate a checkpoint instead of training.
    #[config(default = false)]
    pub eval: bool,

    /// Points kept per sample.
    #[config(default = 1024)]
    pub num_points: usize,

    /// Head dropout probability.
    #[config(default = 0.5)]
    pub dropout: f64,

    /// Embedding width.
    #[config(default = 1024)]
    pub emb_dims: usize,

    /// Neighbours aggregated per point (IBT).
    #[config(default = 40)]
    pub k: usize,

    /// Label-smoothing factor of the loss.
    #[config(default = 0.2)]
    pub label_smoothing: f64,

    /// Checkpoint to evaluate.
    pub model_path: Option<PathBuf>,

    /// Show progress bars.
    #[config(default = true)]
    pub progress: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.exp_name.is_empty() {
            return Err("exp_name must not be empty".to_string());
        }
        if self.batch_size == 0 || self.test_batch_size == 0 {
            return Err("batch sizes must be positive".to_string());
        }
        if self.epochs == 0 && !self.eval {
            return Err("epochs must be positive".to_string());
        }
        if self.lr <= 0.0 {
            return Err("lr must be positive".to_string());
        }
        if self.num_points == 0 {
            return Err("num_points must be positive".to_string());
        }
        if self.model == ModelKind::Ibt {
            if self.k > self.num_points {
                return Err(format!(
                    "k must be at most num_points ({})",
                    self.num_points
                ));
            }
            self.model_config().ibt().validate()?;
        }
        if !(0.0..1.0).contains(&self.dropout) {
            return Err("dropout must be in [0, 1)".to_string());
        }
        if !(0.0..1.0).contains(&self.label_smoothing) {
            return Err("label_smoothing must be in [0, 1)".to_string());
        }
        if self.eval && self.model_path.is_none() {
            return Err("eval mode requires model_path".to_string());
        }
        Ok(())
    }

    /// Model settings for the configured dataset.
    pub fn model_config(&self) -> ModelConfig {
        ModelConfig::new(self.model, self.dataset.num_classes())
            .with_emb_dims(self.emb_dims)
            .with_k(self.k)
            .with_dropout(self.dropout)
    }

    /// Whether a GPU was requested.
    pub fn use_gpu(&self) -> bool {
        !self.no_cuda
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_training_config() {
        let config = TrainingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.batch_size, 24);
        assert_eq!(config.test_batch_size, 12);
        assert_eq!(config.epochs, 200);
        assert!(config.use_sgd);
        assert_eq!(config.scheduler, SchedulerKind::Cos);
        assert_eq!(config.model, ModelKind::Ibt);
        assert_eq!(config.model_path, None);
    }

    #[test]
    fn test_builder_pattern() {
        let config = TrainingConfig::default()
            .with_lr(0.01)
            .with_model(ModelKind::PointNet);

        assert_eq!(config.lr, 0.01);
        assert_eq!(config.model, ModelKind::PointNet);
    }

    #[test]
    fn test_eval_requires_model_path() {
        let config = TrainingConfig::default().with_eval(true);
        assert!(config.validate().is_err());

        let config = config.with_model_path(Some(PathBuf::from("model.t7")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_k_bounded_by_points() {
        let config = TrainingConfig::default().with_num_points(32).with_k(40);
        assert!(config.validate().is_err());

        let config = config.with_model(ModelKind::PointNet);
        assert!(config.validate().is_ok());

        // A neighbourhood may span the whole cloud.
        let config = TrainingConfig::default().with_num_points(32).with_k(32);
        assert!(config.validate().is_ok());

        let config = config.with_k(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_model_config_uses_dataset_classes() {
        let config = TrainingConfig::default().with_dataset(DatasetKind::ScanObjectNN);
        assert_eq!(config.model_config().num_classes, 15);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = TrainingConfig::default()
            .with_exp_name("roundtrip".to_string())
            .with_dataset(DatasetKind::Mnist)
            .with_scheduler(SchedulerKind::Step);

        let json = config.to_string();
        assert!(json.contains("\"mnist\""));
        assert!(json.contains("\"step\""));

        let parsed = TrainingConfig::load_binary(json.as_bytes()).unwrap();
        assert_eq!(parsed.exp_name, "roundtrip");
        assert_eq!(parsed.dataset, DatasetKind::Mnist);
        assert_eq!(parsed.scheduler, SchedulerKind::Step);
    }
}
