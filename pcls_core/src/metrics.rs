//! Classification metrics over whole-pass prediction/label arrays.
//!
//! Both metrics are computed once per pass over the concatenated arrays,
//! never averaged across batches.

use std::collections::BTreeMap;

use crate::error::{PclsCoreError, Result};

fn check_lengths(predictions: &[usize], labels: &[usize]) -> Result<()> {
    if predictions.len() != labels.len() {
        return Err(PclsCoreError::LengthMismatch {
            predictions: predictions.len(),
            labels: labels.len(),
        });
    }
    if labels.is_empty() {
        return Err(PclsCoreError::EmptyPass);
    }
    Ok(())
}

/// Fraction of predictions that exactly match their label.
///
/// Always in `[0, 1]`; equals `1.0` iff every prediction is correct.
pub fn accuracy(predictions: &[usize], labels: &[usize]) -> Result<f64> {
    check_lengths(predictions, labels)?;

    let correct = predictions
        .iter()
        .zip(labels)
        .filter(|(p, l)| p == l)
        .count();

    Ok(correct as f64 / labels.len() as f64)
}

/// Mean of per-class recall, each class weighted equally.
///
/// Only classes that occur in `labels` contribute a recall term. A class that
/// appears solely among the predictions has no support and is skipped, so a
/// split with a missing class is still well defined.
pub fn balanced_accuracy(predictions: &[usize], labels: &[usize]) -> Result<f64> {
    let matrix = ConfusionMatrix::from_predictions(predictions, labels)?;
    let recalls = matrix.per_class_recall();

    let sum: f64 = recalls.values().sum();
    Ok(sum / recalls.len() as f64)
}

/// Sparse confusion matrix keyed by `(true, predicted)` class.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfusionMatrix {
    counts: BTreeMap<(usize, usize), usize>,
    support: BTreeMap<usize, usize>,
}

impl ConfusionMatrix {
    /// Build the matrix from matching prediction/label arrays.
    pub fn from_predictions(predictions: &[usize], labels: &[usize]) -> Result<Self> {
        check_lengths(predictions, labels)?;

        let mut matrix = Self::default();
        for (&pred, &label) in predictions.iter().zip(labels) {
            *matrix.counts.entry((label, pred)).or_insert(0) += 1;
            *matrix.support.entry(label).or_insert(0) += 1;
        }
        Ok(matrix)
    }

    /// Number of samples whose true class is `label` and prediction is `pred`.
    pub fn count(&self, label: usize, pred: usize) -> usize {
        self.counts.get(&(label, pred)).copied().unwrap_or(0)
    }

    /// Number of samples whose true class is `label`.
    pub fn support(&self, label: usize) -> usize {
        self.support.get(&label).copied().unwrap_or(0)
    }

    /// Recall for every class with non-zero support, ordered by class.
    pub fn per_class_recall(&self) -> BTreeMap<usize, f64> {
        self.support
            .iter()
            .map(|(&class, &support)| (class, self.count(class, class) as f64 / support as f64))
            .collect()
    }

    /// Total number of samples in the matrix.
    pub fn total(&self) -> usize {
        self.support.values().sum()
    }
}

/// The two metrics reported after every pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassMetrics {
    /// Plain accuracy.
    pub accuracy: f64,
    /// Class-balanced accuracy.
    pub balanced_accuracy: f64,
}

impl PassMetrics {
    /// Compute both metrics over one pass.
    pub fn compute(predictions: &[usize], labels: &[usize]) -> Result<Self> {
        Ok(Self {
            accuracy: accuracy(predictions, labels)?,
            balanced_accuracy: balanced_accuracy(predictions, labels)?,
        })
    }
}
