//! Error types for pcls_core operations.
//!
//! Kept dependency-free so the crate stays a pure algorithm layer.

use core::fmt;

/// Errors that can occur while aggregating a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PclsCoreError {
    /// A metric was requested over a pass that saw no samples.
    EmptyPass,
    /// Predictions and labels disagree in length.
    LengthMismatch {
        /// Number of predictions supplied.
        predictions: usize,
        /// Number of labels supplied.
        labels: usize,
    },
    /// A scheduler name that is neither `cos` nor `step`.
    UnknownScheduler,
}

impl fmt::Display for PclsCoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PclsCoreError::EmptyPass => write!(f, "cannot compute metrics over an empty pass"),
            PclsCoreError::UnknownScheduler => {
                write!(f, "unknown scheduler, expected one of: cos, step")
            }
            PclsCoreError::LengthMismatch {
                predictions,
                labels,
            } => {
                write!(
                    f,
                    "prediction/label length mismatch: {} predictions, {} labels",
                    predictions, labels
                )
            }
        }
    }
}

impl std::error::Error for PclsCoreError {}

/// Result type alias for pcls_core operations.
pub type Result<T> = core::result::Result<T, PclsCoreError>;
