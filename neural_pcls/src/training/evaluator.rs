//! Shared evaluation pass.

use burn::prelude::*;
use burn::tensor::ElementConversion;

use pcls_core::{PassAccumulator, PassSummary};
use pcls_io::DataLoader;

use super::batch::{predictions, ClassificationBatch};
use super::progress::batch_progress;
use crate::error::Result;
use crate::loss::ClassificationLoss;
use crate::nn::PointClassifier;

/// Per-pass knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassOptions {
    /// Epoch index, used to pick the shuffle order.
    pub epoch: usize,
    /// Show a progress bar.
    pub progress: bool,
}

impl Default for PassOptions {
    fn default() -> Self {
        Self {
            epoch: 0,
            progress: true,
        }
    }
}

/// One pass over `loader` without gradients.
///
/// Call it with a model on a non-autodiff backend (`model.valid()` during
/// training) so batch norm uses its running statistics and dropout is off.
/// The loss is accumulated only when `loss` is given.
pub fn evaluate<B: Backend, M: PointClassifier<B>>(
    model: &M,
    loader: &DataLoader,
    loss: Option<&ClassificationLoss>,
    device: &B::Device,
    options: PassOptions,
) -> Result<PassSummary> {
    let bar = batch_progress(loader.num_batches(), options.progress);
    let mut pass = PassAccumulator::new();

    for batch in loader.iter(options.epoch) {
        let batch = ClassificationBatch::<B>::from_samples(&batch, device);
        let logits = model.forward(batch.points);
        let preds = predictions(logits.clone());

        match loss {
            Some(loss) => {
                let value = loss
                    .forward(logits, &batch.labels)
                    .into_scalar()
                    .elem::<f64>();
                pass.record(value, preds, batch.labels)?;
            }
            None => pass.record_predictions(preds, batch.labels)?,
        }
        bar.inc(1);
    }

    bar.finish_and_clear();
    Ok(pass.finish()?)
}
