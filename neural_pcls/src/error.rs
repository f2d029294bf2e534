//! Error types for neural_pcls.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while training or evaluating a classifier.
#[derive(Error, Debug)]
pub enum NeuralPclsError {
    /// Invalid configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// Model name outside the supported set.
    #[error("unknown model '{name}', expected one of: pointnet, ibt")]
    UnknownModel {
        /// The rejected name.
        name: String,
    },

    /// Checkpoint file does not exist.
    #[error("checkpoint not found: {}", path.display())]
    CheckpointNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Model record could not be encoded or decoded.
    #[error("checkpoint record error: {0}")]
    Recorder(String),

    /// Metric aggregation failed.
    #[error("metric error: {0}")]
    Core(#[from] pcls_core::PclsCoreError),

    /// Dataset or experiment I/O error from pcls_io.
    #[error("I/O error: {0}")]
    IoError(#[from] pcls_io::PclsIoError),

    /// Filesystem error outside pcls_io.
    #[error("file error: {0}")]
    File(#[from] std::io::Error),
}

/// Result type for neural_pcls operations.
pub type Result<T> = std::result::Result<T, NeuralPclsError>;
