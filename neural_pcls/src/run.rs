//! Run orchestration: dispatch to training or checkpoint evaluation.
//!
//! ```text
//! run ── validate ── log config ── save config.json ── device ── seed
//!          │
//!          ├── eval = false ── train ──────────── Trainer::fit
//!          └── eval = true  ── evaluate_checkpoint ── evaluate
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use burn::config::Config;
use burn::module::AutodiffModule;
use burn::prelude::*;
use burn::tensor::backend::AutodiffBackend;

use pcls_core::PassSummary;
use pcls_io::{DataLoader, Experiment, PointCloudDataset, Split};

use crate::backend::{select_device, seed, ADBackend, TrainBackend};
use crate::config::TrainingConfig;
use crate::error::{NeuralPclsError, Result};
use crate::nn::{IbtCls, ModelKind, PointClassifier, PointNetCls};
use crate::training::{
    adam_config, checkpoint_exists, evaluate, load_checkpoint, sgd_config, OptimizerKind,
    PassOptions, PassReport, Trainer, TrainingSummary,
};

/// What a run produced.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Per-epoch history of a training run.
    Trained(TrainingSummary),
    /// Metrics of a standalone evaluation.
    Evaluated(PassSummary),
}

/// Source files copied next to the run outputs, relative to the crate root.
pub const BACKUP_FILES: [&str; 6] = [
    "src/bin/main_cls.rs",
    "src/nn/pointnet.rs",
    "src/nn/ibt.rs",
    "src/training/trainer.rs",
    "src/loss.rs",
    "src/run.rs",
];

/// Sources copied next to the run outputs for provenance.
///
/// Each file is looked up in the working directory first, then in the
/// directory the crate was built from. An installed binary run outside a
/// source checkout finds neither and the backups are skipped with a warning.
pub fn backup_sources() -> Vec<PathBuf> {
    let roots = [
        std::env::current_dir().unwrap_or_default(),
        PathBuf::from(env!("CARGO_MANIFEST_DIR")),
    ];
    resolve_backups(&roots)
}

/// Resolve [`BACKUP_FILES`] against `roots`, taking the first root that
/// holds each file. Files found nowhere resolve under the first root.
pub fn resolve_backups(roots: &[PathBuf]) -> Vec<PathBuf> {
    BACKUP_FILES
        .iter()
        .map(|file| {
            roots
                .iter()
                .map(|root| root.join(file))
                .find(|path| path.is_file())
                .or_else(|| roots.first().map(|root| root.join(file)))
                .unwrap_or_else(|| PathBuf::from(file))
        })
        .collect()
}

/// Execute one run inside an initialised experiment directory.
///
/// The global logger should already point at the experiment's run log so
/// the configuration and per-epoch lines land there.
pub fn run(config: &TrainingConfig, experiment: &Experiment) -> Result<RunOutcome> {
    config
        .validate()
        .map_err(|message| NeuralPclsError::InvalidConfig { message })?;

    log::info!("{:?}", config);
    config.save(experiment.config_path())?;

    let (device, _) = select_device(config.use_gpu());
    seed(config.seed);

    if config.eval {
        evaluate_checkpoint::<TrainBackend>(config, &device).map(RunOutcome::Evaluated)
    } else {
        train::<ADBackend>(config, experiment.checkpoint_path(), &device).map(RunOutcome::Trained)
    }
}

/// Train the configured model, writing the best weights to
/// `checkpoint_path`.
pub fn train<B: AutodiffBackend>(
    config: &TrainingConfig,
    checkpoint_path: PathBuf,
    device: &B::Device,
) -> Result<TrainingSummary> {
    let train = open_split(config, Split::Train)?;
    let test = open_split(config, Split::Test)?;

    let train_loader = DataLoader::new(Arc::new(train), config.batch_size)?
        .with_shuffle(config.seed)
        .with_drop_last(true);
    let test_loader =
        DataLoader::new(Arc::new(test), config.test_batch_size)?.with_shuffle(config.seed);

    let trainer = Trainer::<B>::new(config.clone(), device.clone(), checkpoint_path);
    let model_config = config.model_config();

    match config.model {
        ModelKind::PointNet => {
            let model = PointNetCls::<B>::new(&model_config.pointnet(), device);
            fit_with(&trainer, model, &train_loader, &test_loader)
        }
        ModelKind::Ibt => {
            let model = IbtCls::<B>::new(&model_config.ibt(), device);
            fit_with(&trainer, model, &train_loader, &test_loader)
        }
    }
}

fn fit_with<B, M>(
    trainer: &Trainer<B>,
    model: M,
    train: &DataLoader,
    test: &DataLoader,
) -> Result<TrainingSummary>
where
    B: AutodiffBackend,
    M: PointClassifier<B> + AutodiffModule<B>,
    M::InnerModule: PointClassifier<B::InnerBackend>,
{
    let kind = OptimizerKind::from_config(trainer.config());
    log::info!("{}", kind.announcement());

    let outcome = match kind {
        OptimizerKind::Sgd => {
            let optim = sgd_config(trainer.config()).init::<B, M>();
            trainer.fit(model, optim, train, test)?
        }
        OptimizerKind::Adam => {
            let optim = adam_config(trainer.config()).init::<B, M>();
            trainer.fit(model, optim, train, test)?
        }
    };

    Ok(outcome.summary)
}

/// Evaluate the checkpoint at `config.model_path` on the test split.
///
/// The loader is not shuffled and no loss is computed. A missing
/// checkpoint is reported before any data is read.
pub fn evaluate_checkpoint<B: Backend>(
    config: &TrainingConfig,
    device: &B::Device,
) -> Result<PassSummary> {
    let model_path = config
        .model_path
        .clone()
        .ok_or_else(|| NeuralPclsError::InvalidConfig {
            message: "eval mode requires model_path".to_string(),
        })?;
    if !checkpoint_exists(&model_path) {
        return Err(NeuralPclsError::CheckpointNotFound { path: model_path });
    }

    let test = open_split(config, Split::Test)?;
    let loader = DataLoader::new(Arc::new(test), config.test_batch_size)?;
    let options = PassOptions {
        epoch: 0,
        progress: config.progress,
    };
    let model_config = config.model_config();

    let summary = match config.model {
        ModelKind::PointNet => {
            let model = PointNetCls::<B>::new(&model_config.pointnet(), device);
            let model = load_checkpoint(model, &model_path, device)?;
            evaluate(&model, &loader, None, device, options)?
        }
        ModelKind::Ibt => {
            let model = IbtCls::<B>::new(&model_config.ibt(), device);
            let model = load_checkpoint(model, &model_path, device)?;
            evaluate(&model, &loader, None, device, options)?
        }
    };

    log::info!("{}", PassReport::standalone(summary));
    Ok(summary)
}

fn open_split(config: &TrainingConfig, split: Split) -> Result<PointCloudDataset> {
    Ok(PointCloudDataset::open(
        &config.data_root,
        config.dataset,
        split,
        config.num_points,
    )?)
}
