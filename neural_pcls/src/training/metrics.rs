//! Pass reports and run summaries.

use std::fmt;

use pcls_core::PassSummary;

/// Which pass a report describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Training pass of an epoch.
    Train {
        /// Zero-based epoch index.
        epoch: usize,
    },
    /// Evaluation pass of an epoch.
    Test {
        /// Zero-based epoch index.
        epoch: usize,
    },
    /// One-off evaluation of a stored checkpoint.
    Standalone,
}

/// Metrics of one pass, formatted as a run-log line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassReport {
    /// Pass the metrics belong to.
    pub kind: PassKind,
    /// Aggregated loss and accuracies.
    pub summary: PassSummary,
}

impl PassReport {
    /// Report of a training pass.
    pub fn train(epoch: usize, summary: PassSummary) -> Self {
        Self {
            kind: PassKind::Train { epoch },
            summary,
        }
    }

    /// Report of an evaluation pass during training.
    pub fn test(epoch: usize, summary: PassSummary) -> Self {
        Self {
            kind: PassKind::Test { epoch },
            summary,
        }
    }

    /// Report of a standalone evaluation.
    pub fn standalone(summary: PassSummary) -> Self {
        Self {
            kind: PassKind::Standalone,
            summary,
        }
    }

    /// Overall accuracy.
    pub fn accuracy(&self) -> f64 {
        self.summary.metrics.accuracy
    }

    /// Mean per-class recall.
    pub fn balanced_accuracy(&self) -> f64 {
        self.summary.metrics.balanced_accuracy
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        match self.kind {
            PassKind::Train { epoch } => write!(
                f,
                "Train {}, loss: {:.6}, train acc: {:.6}, train avg acc: {:.6}",
                epoch, s.loss, s.metrics.accuracy, s.metrics.balanced_accuracy
            ),
            PassKind::Test { epoch } => write!(
                f,
                "Test {}, loss: {:.6}, test acc: {:.6}, test avg acc: {:.6}",
                epoch, s.loss, s.metrics.accuracy, s.metrics.balanced_accuracy
            ),
            PassKind::Standalone => write!(
                f,
                "Test :: test acc: {:.6}, test avg acc: {:.6}",
                s.metrics.accuracy, s.metrics.balanced_accuracy
            ),
        }
    }
}

/// What happened in one epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochReport {
    /// Zero-based epoch index.
    pub epoch: usize,
    /// Learning rate used for every step of the epoch.
    pub learning_rate: f64,
    /// Training pass.
    pub train: PassSummary,
    /// Evaluation pass.
    pub test: PassSummary,
    /// Whether this epoch overwrote the checkpoint.
    pub checkpoint_saved: bool,
}

/// Result of a full training run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSummary {
    /// One report per epoch, in order.
    pub epochs: Vec<EpochReport>,
    /// Best test accuracy seen.
    pub best_accuracy: f64,
}

impl TrainingSummary {
    /// Epochs that wrote a checkpoint.
    pub fn checkpoint_epochs(&self) -> Vec<usize> {
        self.epochs
            .iter()
            .filter(|e| e.checkpoint_saved)
            .map(|e| e.epoch)
            .collect()
    }
}

/// Trained model plus its summary.
#[derive(Debug)]
pub struct TrainingOutcome<M> {
    /// Model after the last epoch.
    pub model: M,
    /// Per-epoch history.
    pub summary: TrainingSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcls_core::PassMetrics;

    fn summary(loss: f64, accuracy: f64, balanced_accuracy: f64) -> PassSummary {
        PassSummary {
            loss,
            metrics: PassMetrics {
                accuracy,
                balanced_accuracy,
            },
            samples: 10,
        }
    }

    #[test]
    fn test_train_line() {
        let report = PassReport::train(3, summary(1.5, 0.5, 0.25));
        assert_eq!(
            report.to_string(),
            "Train 3, loss: 1.500000, train acc: 0.500000, train avg acc: 0.250000"
        );
    }

    #[test]
    fn test_test_line() {
        let report = PassReport::test(0, summary(0.123456789, 1.0, 1.0));
        assert_eq!(
            report.to_string(),
            "Test 0, loss: 0.123457, test acc: 1.000000, test avg acc: 1.000000"
        );
    }

    #[test]
    fn test_standalone_line() {
        let report = PassReport::standalone(summary(0.0, 0.5, 0.5));
        assert_eq!(
            report.to_string(),
            "Test :: test acc: 0.500000, test avg acc: 0.500000"
        );
    }

    #[test]
    fn test_checkpoint_epochs() {
        let epoch = |epoch, checkpoint_saved| EpochReport {
            epoch,
            learning_rate: 0.1,
            train: summary(1.0, 0.5, 0.5),
            test: summary(1.0, 0.5, 0.5),
            checkpoint_saved,
        };
        let summary = TrainingSummary {
            epochs: vec![epoch(0, true), epoch(1, false), epoch(2, true)],
            best_accuracy: 0.5,
        };

        assert_eq!(summary.checkpoint_epochs(), vec![0, 2]);
    }
}
