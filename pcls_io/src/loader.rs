//! Batch iteration over a dataset.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::dataset::PointCloudDataset;
use crate::error::{PclsIoError, Result};

/// A stacked batch of samples, still sample-major on the host.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBatch {
    /// Flat coordinates laid out as `[batch_size, num_points, 3]`.
    pub points: Vec<f32>,
    /// One label per sample.
    pub labels: Vec<usize>,
    /// Number of samples in the batch.
    pub batch_size: usize,
    /// Points per sample.
    pub num_points: usize,
}

impl SampleBatch {
    /// Shape of the coordinate buffer.
    pub fn shape(&self) -> [usize; 3] {
        [self.batch_size, self.num_points, 3]
    }
}

/// Batches a dataset, optionally shuffled and with the trailing partial
/// batch optionally dropped.
#[derive(Debug, Clone)]
pub struct DataLoader {
    dataset: Arc<PointCloudDataset>,
    batch_size: usize,
    shuffle_seed: Option<u64>,
    drop_last: bool,
}

impl DataLoader {
    /// Create an unshuffled loader that keeps the trailing partial batch.
    pub fn new(dataset: Arc<PointCloudDataset>, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(PclsIoError::ZeroBatchSize);
        }
        Ok(Self {
            dataset,
            batch_size,
            shuffle_seed: None,
            drop_last: false,
        })
    }

    /// Reshuffle every epoch from `seed`.
    pub fn with_shuffle(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    /// Drop the trailing batch when it is smaller than the batch size.
    pub fn with_drop_last(mut self, drop_last: bool) -> Self {
        self.drop_last = drop_last;
        self
    }

    /// Underlying dataset.
    pub fn dataset(&self) -> &PointCloudDataset {
        &self.dataset
    }

    /// Configured batch size.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of batches one pass yields.
    pub fn num_batches(&self) -> usize {
        let n = self.dataset.len();
        if self.drop_last {
            n / self.batch_size
        } else {
            n.div_ceil(self.batch_size)
        }
    }

    /// Iterate one epoch. The same epoch index always yields the same order.
    pub fn iter(&self, epoch: usize) -> BatchIter<'_> {
        let mut order: Vec<usize> = (0..self.dataset.len()).collect();
        if let Some(seed) = self.shuffle_seed {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(epoch as u64));
            order.shuffle(&mut rng);
        }
        if self.drop_last {
            order.truncate(self.num_batches() * self.batch_size);
        }

        BatchIter {
            loader: self,
            order,
            cursor: 0,
        }
    }
}

/// Iterator over the batches of one epoch.
#[derive(Debug)]
pub struct BatchIter<'a> {
    loader: &'a DataLoader,
    order: Vec<usize>,
    cursor: usize,
}

impl Iterator for BatchIter<'_> {
    type Item = SampleBatch;

    fn next(&mut self) -> Option<SampleBatch> {
        if self.cursor >= self.order.len() {
            return None;
        }

        let end = (self.cursor + self.loader.batch_size).min(self.order.len());
        let indices = &self.order[self.cursor..end];
        self.cursor = end;

        let dataset = &self.loader.dataset;
        let num_points = dataset.num_points();
        let mut points = Vec::with_capacity(indices.len() * num_points * 3);
        let mut labels = Vec::with_capacity(indices.len());

        for &index in indices {
            let sample = &dataset.samples()[index];
            points.extend(sample.points.iter().flatten().copied());
            labels.push(sample.label);
        }

        Some(SampleBatch {
            points,
            labels,
            batch_size: indices.len(),
            num_points,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.order.len() - self.cursor).div_ceil(self.loader.batch_size);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BatchIter<'_> {}
