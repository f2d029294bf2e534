//! Error types for pcls_io operations.
//!
//! Covers dataset file parsing, batching configuration and experiment
//! directory setup.

use core::fmt;
use std::path::PathBuf;

/// Errors that can occur during pcls_io operations.
#[derive(Debug, Clone, PartialEq)]
pub enum PclsIoError {
    /// Invalid file format during deserialization.
    InvalidFormat {
        /// Description of the format error.
        message: &'static str,
    },

    /// Unsupported container version.
    UnsupportedVersion {
        /// Version found in the header.
        got: u16,
    },

    /// A stored label is not a valid class index.
    LabelOutOfRange {
        /// Sample index.
        index: usize,
        /// Label found.
        label: usize,
        /// Number of classes declared.
        num_classes: usize,
    },

    /// A sample holds fewer points than the run requests.
    NotEnoughPoints {
        /// Points requested per sample.
        requested: usize,
        /// Points available per sample.
        available: usize,
    },

    /// Samples in one container disagree in point count.
    RaggedSample {
        /// Sample index.
        index: usize,
        /// Expected point count.
        expected: usize,
        /// Actual point count.
        got: usize,
    },

    /// Dataset split file does not exist.
    DatasetNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Dataset name not recognised.
    UnknownDataset {
        /// Name that was given.
        name: String,
    },

    /// Batch size of zero.
    ZeroBatchSize,

    /// I/O error during serialization/deserialization.
    Io(String),
}

impl fmt::Display for PclsIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PclsIoError::InvalidFormat { message } => {
                write!(f, "invalid file format: {}", message)
            }
            PclsIoError::UnsupportedVersion { got } => {
                write!(f, "unsupported point-set version {}", got)
            }
            PclsIoError::LabelOutOfRange {
                index,
                label,
                num_classes,
            } => write!(
                f,
                "sample {} has label {} but only {} classes are declared",
                index, label, num_classes
            ),
            PclsIoError::NotEnoughPoints {
                requested,
                available,
            } => write!(
                f,
                "requested {} points per sample but only {} are stored",
                requested, available
            ),
            PclsIoError::RaggedSample {
                index,
                expected,
                got,
            } => write!(
                f,
                "sample {} has {} points, expected {}",
                index, got, expected
            ),
            PclsIoError::DatasetNotFound { path } => {
                write!(f, "dataset split not found at {}", path.display())
            }
            PclsIoError::UnknownDataset { name } => write!(
                f,
                "unknown dataset '{}' (expected one of: modelnet40, modelnet10, scanobjectnn, mnist)",
                name
            ),
            PclsIoError::ZeroBatchSize => write!(f, "batch size cannot be zero"),
            PclsIoError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for PclsIoError {}

impl From<std::io::Error> for PclsIoError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            return PclsIoError::InvalidFormat {
                message: "unexpected end of data",
            };
        }
        PclsIoError::Io(err.to_string())
    }
}

/// Result type alias for pcls_io operations.
pub type Result<T> = core::result::Result<T, PclsIoError>;
