//! pcls_io - datasets, batching and experiment bookkeeping for point-cloud
//! classification.
//!
//! This crate is the host-side data layer. It knows nothing about tensors:
//! batches leave it as flat `f32` buffers that the training crate uploads to
//! a device.
//!
//! # Core Types
//!
//! - [`PointCloudDataset`]: in-memory split of labelled point sets
//! - [`DataLoader`]: shuffled / drop-last batch iteration
//! - [`Experiment`]: the `outputs/<exp_name>` directory tree
//! - [`RunLog`]: append-only console mirror
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pcls_io::{DataLoader, PointCloudDataset};
//!
//! let train = Arc::new(PointCloudDataset::synthetic(48, 64, 4, 0));
//! let loader = DataLoader::new(train, 24)
//!     .unwrap()
//!     .with_shuffle(1)
//!     .with_drop_last(true);
//!
//! for batch in loader.iter(0) {
//!     assert_eq!(batch.shape(), [24, 64, 3]);
//! }
//! ```

#![warn(missing_docs)]

pub mod dataset;
pub mod error;
pub mod experiment;
pub mod format;
pub mod loader;
pub mod run_log;

pub use dataset::{DatasetKind, PointCloudDataset, PointSample, Split};
pub use error::{PclsIoError, Result};
pub use experiment::{Experiment, CHECKPOINT_FILE, CONFIG_FILE, RUN_LOG_FILE};
pub use loader::{BatchIter, DataLoader, SampleBatch};
pub use run_log::RunLog;
