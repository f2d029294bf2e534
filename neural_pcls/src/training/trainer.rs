//! Epoch loop.

use std::path::{Path, PathBuf};

use burn::module::AutodiffModule;
use burn::optim::{GradientsParams, Optimizer};
use burn::tensor::backend::AutodiffBackend;
use burn::tensor::ElementConversion;

use pcls_core::{BestAccuracy, LrSchedule, PassAccumulator, PassSummary};
use pcls_io::DataLoader;

use super::batch::{predictions, ClassificationBatch};
use super::checkpoint::save_checkpoint;
use super::evaluator::{evaluate, PassOptions};
use super::metrics::{EpochReport, PassReport, TrainingOutcome, TrainingSummary};
use super::optimizer::OptimizerKind;
use super::progress::batch_progress;
use crate::config::TrainingConfig;
use crate::error::Result;
use crate::loss::ClassificationLoss;
use crate::nn::PointClassifier;

/// Runs the train / evaluate / checkpoint cycle for a configured number of
/// epochs.
///
/// Each epoch trains on every batch at the current learning rate, advances
/// the schedule, logs the training metrics, evaluates on the test loader and
/// overwrites the checkpoint when the test accuracy is at least the best so
/// far.
#[derive(Debug)]
pub struct Trainer<B: AutodiffBackend> {
    config: TrainingConfig,
    device: B::Device,
    loss: ClassificationLoss,
    checkpoint_path: PathBuf,
}

impl<B: AutodiffBackend> Trainer<B> {
    /// Create a new trainer writing its checkpoint to `checkpoint_path`.
    pub fn new(config: TrainingConfig, device: B::Device, checkpoint_path: PathBuf) -> Self {
        let loss = ClassificationLoss::new(config.label_smoothing);
        Self {
            config,
            device,
            loss,
            checkpoint_path,
        }
    }

    /// Get the training configuration.
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Where the best model is written.
    pub fn checkpoint_path(&self) -> &Path {
        &self.checkpoint_path
    }

    /// Train `model` with `optim` and return it with the per-epoch history.
    pub fn fit<M, O>(
        &self,
        mut model: M,
        mut optim: O,
        train: &DataLoader,
        test: &DataLoader,
    ) -> Result<TrainingOutcome<M>>
    where
        M: PointClassifier<B> + AutodiffModule<B>,
        M::InnerModule: PointClassifier<B::InnerBackend>,
        O: Optimizer<M, B>,
    {
        let base_lr = OptimizerKind::from_config(&self.config).base_lr(self.config.lr);
        let mut schedule = self.config.scheduler.build(base_lr, self.config.epochs);
        let mut best = BestAccuracy::new();
        let mut epochs = Vec::with_capacity(self.config.epochs);

        for epoch in 0..self.config.epochs {
            let learning_rate = schedule.learning_rate();
            let (trained, train_summary) =
                self.train_epoch(model, &mut optim, train, epoch, learning_rate)?;
            model = trained;

            schedule.step();
            log::info!("{}", PassReport::train(epoch, train_summary));

            let options = PassOptions {
                epoch,
                progress: self.config.progress,
            };
            let test_summary = evaluate::<B::InnerBackend, _>(
                &model.valid(),
                test,
                Some(&self.loss),
                &self.device,
                options,
            )?;
            log::info!("{}", PassReport::test(epoch, test_summary));

            let checkpoint_saved = best.observe(test_summary.metrics.accuracy);
            if checkpoint_saved {
                save_checkpoint(&model, &self.checkpoint_path)?;
            }

            epochs.push(EpochReport {
                epoch,
                learning_rate,
                train: train_summary,
                test: test_summary,
                checkpoint_saved,
            });
        }

        Ok(TrainingOutcome {
            model,
            summary: TrainingSummary {
                epochs,
                best_accuracy: best.value(),
            },
        })
    }

    /// One optimisation pass over the training loader.
    fn train_epoch<M, O>(
        &self,
        mut model: M,
        optim: &mut O,
        loader: &DataLoader,
        epoch: usize,
        learning_rate: f64,
    ) -> Result<(M, PassSummary)>
    where
        M: PointClassifier<B> + AutodiffModule<B>,
        O: Optimizer<M, B>,
    {
        let bar = batch_progress(loader.num_batches(), self.config.progress);
        let mut pass = PassAccumulator::new();

        for batch in loader.iter(epoch) {
            let batch = ClassificationBatch::<B>::from_samples(&batch, &self.device);

            let logits = model.forward(batch.points);
            let preds = predictions(logits.clone().detach());
            let loss = self.loss.forward(logits, &batch.labels);
            let loss_value = loss.clone().detach().into_scalar().elem::<f64>();

            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optim.step(learning_rate, model, grads);

            pass.record(loss_value, preds, batch.labels)?;
            bar.inc(1);
        }

        bar.finish_and_clear();
        Ok((model, pass.finish()?))
    }
}
