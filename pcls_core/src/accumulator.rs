//! Per-pass running totals.
//!
//! A fresh accumulator is created at the start of every training epoch and
//! every evaluation pass; nothing carries over between passes.

use crate::error::{PclsCoreError, Result};
use crate::metrics::PassMetrics;

/// Batch-size weighted loss sum.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningLoss {
    sum: f64,
    count: usize,
}

impl RunningLoss {
    /// Empty running total.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the mean loss of a batch of `batch_size` samples.
    pub fn add(&mut self, batch_loss: f64, batch_size: usize) {
        self.sum += batch_loss * batch_size as f64;
        self.count += batch_size;
    }

    /// Number of samples seen.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Mean loss per sample, or `None` if nothing was added.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

/// Ordered per-batch predictions and labels for one pass.
#[derive(Debug, Clone, Default)]
pub struct PredictionAccumulator {
    predictions: Vec<Vec<usize>>,
    labels: Vec<Vec<usize>>,
}

impl PredictionAccumulator {
    /// Empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one batch. Prediction and label counts must agree.
    pub fn push(&mut self, predictions: Vec<usize>, labels: Vec<usize>) -> Result<()> {
        if predictions.len() != labels.len() {
            return Err(PclsCoreError::LengthMismatch {
                predictions: predictions.len(),
                labels: labels.len(),
            });
        }
        self.predictions.push(predictions);
        self.labels.push(labels);
        Ok(())
    }

    /// Number of batches recorded.
    pub fn num_batches(&self) -> usize {
        self.labels.len()
    }

    /// Concatenate every batch into whole-pass arrays.
    pub fn concat(&self) -> (Vec<usize>, Vec<usize>) {
        (self.predictions.concat(), self.labels.concat())
    }

    /// Compute whole-pass metrics.
    pub fn metrics(&self) -> Result<PassMetrics> {
        let (predictions, labels) = self.concat();
        PassMetrics::compute(&predictions, &labels)
    }
}

/// Everything reported at the end of a pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassSummary {
    /// Mean loss per sample.
    pub loss: f64,
    /// Accuracy and balanced accuracy.
    pub metrics: PassMetrics,
    /// Samples seen in the pass.
    pub samples: usize,
}

/// Loss and predictions for a single pass.
#[derive(Debug, Clone, Default)]
pub struct PassAccumulator {
    loss: RunningLoss,
    predictions: PredictionAccumulator,
}

impl PassAccumulator {
    /// Fresh accumulator for a new pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one batch: its mean loss, predictions and true labels.
    pub fn record(&mut self, batch_loss: f64, predictions: Vec<usize>, labels: Vec<usize>) -> Result<()> {
        let batch_size = labels.len();
        self.predictions.push(predictions, labels)?;
        self.loss.add(batch_loss, batch_size);
        Ok(())
    }

    /// Record one batch without a loss value.
    pub fn record_predictions(&mut self, predictions: Vec<usize>, labels: Vec<usize>) -> Result<()> {
        self.predictions.push(predictions, labels)
    }

    /// Running loss so far.
    pub fn running_loss(&self) -> &RunningLoss {
        &self.loss
    }

    /// Close the pass.
    pub fn finish(&self) -> Result<PassSummary> {
        let metrics = self.predictions.metrics()?;
        let (_, labels) = self.predictions.concat();
        Ok(PassSummary {
            loss: self.loss.mean().unwrap_or(0.0),
            metrics,
            samples: labels.len(),
        })
    }
}
