//! Command-line arguments shared by the `main_cls` and `eval_cls` binaries.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use pcls_core::SchedulerKind;
use pcls_io::DatasetKind;

use crate::config::TrainingConfig;
use crate::nn::ModelKind;

/// Point cloud classification.
#[derive(Parser, Debug, Clone)]
#[command(name = "main_cls", about = "Point cloud classification training and evaluation")]
pub struct ClsArgs {
    /// Name of the experiment.
    #[arg(long, default_value = "exp")]
    pub exp_name: String,
    /// Model to use.
    #[arg(long, value_enum, default_value_t = ModelKind::Ibt)]
    pub model: ModelKind,
    /// Dataset to use: modelnet40, modelnet10, scanobjectnn or mnist.
    #[arg(long, default_value = "modelnet40")]
    pub dataset: DatasetKind,
    /// Directory holding the dataset files.
    #[arg(long, default_value = "data")]
    pub data_root: PathBuf,
    /// Directory holding experiment outputs.
    #[arg(long, default_value = "outputs")]
    pub output_root: PathBuf,
    /// Size of batch.
    #[arg(long, default_value_t = 24)]
    pub batch_size: usize,
    /// Size of test batch.
    #[arg(long, default_value_t = 12)]
    pub test_batch_size: usize,
    /// Number of epochs to train.
    #[arg(long, default_value_t = 200)]
    pub epochs: usize,
    /// Use SGD (true) or Adam (false).
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    pub use_sgd: bool,
    /// Learning rate (SGD runs at 100x this value).
    #[arg(long, default_value_t = 0.001)]
    pub lr: f64,
    /// SGD momentum.
    #[arg(long, default_value_t = 0.9)]
    pub momentum: f64,
    /// Scheduler to use: cos or step.
    #[arg(long, default_value = "cos")]
    pub scheduler: SchedulerKind,
    /// Disable the GPU.
    #[arg(long)]
    pub no_cuda: bool,
    /// Random seed.
    #[arg(long, default_value_t = 1)]
    pub seed: u64,
    /// Evaluate the model instead of training.
    #[arg(long)]
    pub eval: bool,
    /// Number of points per sample.
    #[arg(long, default_value_t = 1024)]
    pub num_points: usize,
    /// Dropout rate.
    #[arg(long, default_value_t = 0.5)]
    pub dropout: f64,
    /// Dimension of embeddings.
    #[arg(long, default_value_t = 1024)]
    pub emb_dims: usize,
    /// Number of nearest neighbours.
    #[arg(long, default_value_t = 40)]
    pub k: usize,
    /// Label-smoothing factor of the loss.
    #[arg(long, default_value_t = 0.2)]
    pub label_smoothing: f64,
    /// Pretrained model path.
    #[arg(long)]
    pub model_path: Option<PathBuf>,
    /// Hide progress bars.
    #[arg(long)]
    pub no_progress: bool,
}

impl ClsArgs {
    /// Turn the parsed flags into a run configuration.
    pub fn into_config(self) -> TrainingConfig {
        TrainingConfig::new()
            .with_exp_name(self.exp_name)
            .with_model(self.model)
            .with_dataset(self.dataset)
            .with_data_root(self.data_root)
            .with_output_root(self.output_root)
            .with_batch_size(self.batch_size)
            .with_test_batch_size(self.test_batch_size)
            .with_epochs(self.epochs)
            .with_use_sgd(self.use_sgd)
            .with_lr(self.lr)
            .with_momentum(self.momentum)
            .with_scheduler(self.scheduler)
            .with_no_cuda(self.no_cuda)
            .with_seed(self.seed)
            .with_eval(self.eval)
            .with_num_points(self.num_points)
            .with_dropout(self.dropout)
            .with_emb_dims(self.emb_dims)
            .with_k(self.k)
            .with_label_smoothing(self.label_smoothing)
            .with_model_path(self.model_path)
            .with_progress(!self.no_progress)
    }
}
