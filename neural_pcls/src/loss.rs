//! Label-smoothed cross entropy.

use burn::prelude::*;
use burn::tensor::activation::log_softmax;

/// Cross entropy against smoothed one-hot targets.
///
/// The true class gets `1 - smoothing` and every other class
/// `smoothing / (num_classes - 1)`. With `smoothing = 0` this is plain
/// cross entropy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationLoss {
    smoothing: f64,
}

impl Default for ClassificationLoss {
    fn default() -> Self {
        Self::new(0.2)
    }
}

impl ClassificationLoss {
    /// Create a loss with the given smoothing factor.
    pub fn new(smoothing: f64) -> Self {
        Self { smoothing }
    }

    /// Smoothing factor.
    pub fn smoothing(&self) -> f64 {
        self.smoothing
    }

    /// Smoothed target distribution, row-major `[labels.len(), num_classes]`.
    pub fn targets(&self, labels: &[usize], num_classes: usize) -> Vec<f32> {
        let (on, off) = if num_classes > 1 {
            (
                1.0 - self.smoothing,
                self.smoothing / (num_classes - 1) as f64,
            )
        } else {
            (1.0, 0.0)
        };

        let mut targets = vec![off as f32; labels.len() * num_classes];
        for (row, &label) in labels.iter().enumerate() {
            targets[row * num_classes + label] = on as f32;
        }
        targets
    }

    /// Mean loss over the batch.
    ///
    /// Input: logits [batch, num_classes] and one label per row
    /// Output: scalar tensor [1]
    pub fn forward<B: Backend>(&self, logits: Tensor<B, 2>, labels: &[usize]) -> Tensor<B, 1> {
        let [batch, num_classes] = logits.dims();
        let targets = Tensor::<B, 2>::from_data(
            TensorData::new(self.targets(labels, num_classes), [batch, num_classes]),
            &logits.device(),
        );

        (targets * log_softmax(logits, 1))
            .sum_dim(1)
            .mean()
            .neg()
    }
}
