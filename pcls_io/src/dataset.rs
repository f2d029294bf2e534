//! Point-cloud classification datasets.
//!
//! A dataset is an ordered, read-only list of fixed-size point sets with an
//! integer class label each. Split files live at
//! `<data_root>/<dataset>/<split>.pcls`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{PclsIoError, Result};
use crate::format::load_from_file;

/// A single labelled point set.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSample {
    /// Point coordinates.
    pub points: Vec<[f32; 3]>,
    /// Class index.
    pub label: usize,
}

impl PointSample {
    /// Create a sample.
    pub fn new(points: Vec<[f32; 3]>, label: usize) -> Self {
        Self { points, label }
    }

    /// Number of points in the sample.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the sample has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Supported benchmark datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum DatasetKind {
    /// ModelNet40 CAD shapes.
    ModelNet40,
    /// ModelNet10 CAD shapes.
    ModelNet10,
    /// ScanObjectNN real-world scans.
    ScanObjectNN,
    /// MNIST digits lifted to point sets.
    Mnist,
}

impl DatasetKind {
    /// All dataset kinds.
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::ModelNet40,
        DatasetKind::ModelNet10,
        DatasetKind::ScanObjectNN,
        DatasetKind::Mnist,
    ];

    /// Number of classes in the dataset.
    pub fn num_classes(self) -> usize {
        match self {
            DatasetKind::ModelNet40 => 40,
            DatasetKind::ModelNet10 => 10,
            DatasetKind::ScanObjectNN => 15,
            DatasetKind::Mnist => 10,
        }
    }

    /// Directory name under the data root.
    pub fn name(self) -> &'static str {
        match self {
            DatasetKind::ModelNet40 => "modelnet40",
            DatasetKind::ModelNet10 => "modelnet10",
            DatasetKind::ScanObjectNN => "scanobjectnn",
            DatasetKind::Mnist => "mnist",
        }
    }

    /// Location of a split file.
    pub fn split_path(self, data_root: &Path, split: Split) -> PathBuf {
        data_root
            .join(self.name())
            .join(format!("{}.pcls", split.name()))
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DatasetKind {
    type Err = PclsIoError;

    fn from_str(s: &str) -> Result<Self> {
        DatasetKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| PclsIoError::UnknownDataset {
                name: s.to_string(),
            })
    }
}

/// Dataset partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    /// Training partition.
    Train,
    /// Held-out test partition.
    Test,
}

impl Split {
    /// File stem of the split.
    pub fn name(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
        }
    }
}

/// In-memory dataset of equally sized point sets.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloudDataset {
    samples: Vec<PointSample>,
    num_classes: usize,
    num_points: usize,
}

impl PointCloudDataset {
    /// Build a dataset, checking point counts and labels.
    pub fn new(samples: Vec<PointSample>, num_classes: usize) -> Result<Self> {
        let num_points = samples.first().map(PointSample::len).unwrap_or(0);

        for (index, sample) in samples.iter().enumerate() {
            if sample.len() != num_points {
                return Err(PclsIoError::RaggedSample {
                    index,
                    expected: num_points,
                    got: sample.len(),
                });
            }
            if sample.label >= num_classes {
                return Err(PclsIoError::LabelOutOfRange {
                    index,
                    label: sample.label,
                    num_classes,
                });
            }
        }

        Ok(Self {
            samples,
            num_classes,
            num_points,
        })
    }

    /// Load one split of a benchmark dataset, keeping the first
    /// `num_points` points of every sample.
    pub fn open(data_root: &Path, kind: DatasetKind, split: Split, num_points: usize) -> Result<Self> {
        let path = kind.split_path(data_root, split);
        if !path.is_file() {
            return Err(PclsIoError::DatasetNotFound { path });
        }

        let dataset = load_from_file(&path)?;
        if dataset.num_classes() > kind.num_classes() {
            return Err(PclsIoError::InvalidFormat {
                message: "class count exceeds the dataset's class count",
            });
        }

        log::debug!(
            "Loaded {} {} samples from {}",
            dataset.len(),
            split.name(),
            path.display()
        );

        let dataset = Self {
            num_classes: kind.num_classes(),
            ..dataset
        };
        dataset.truncate(num_points)
    }

    /// Keep the first `num_points` points of every sample.
    pub fn truncate(mut self, num_points: usize) -> Result<Self> {
        if num_points > self.num_points && !self.samples.is_empty() {
            return Err(PclsIoError::NotEnoughPoints {
                requested: num_points,
                available: self.num_points,
            });
        }
        for sample in &mut self.samples {
            sample.points.truncate(num_points);
        }
        self.num_points = num_points;
        Ok(self)
    }

    /// Deterministic toy dataset: class `c` samples lie on a sphere of
    /// radius `0.2 * (c + 1)` with small jitter. Labels cycle through the
    /// classes so every class has equal support when `num_samples` is a
    /// multiple of `num_classes`.
    pub fn synthetic(num_samples: usize, num_points: usize, num_classes: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let classes = num_classes.max(1);

        let samples = (0..num_samples)
            .map(|i| {
                let label = i % classes;
                let radius = 0.2 * (label + 1) as f32;
                let points = (0..num_points)
                    .map(|_| {
                        let theta = rng.gen_range(0.0..std::f32::consts::TAU);
                        let z: f32 = rng.gen_range(-1.0..1.0);
                        let r = (1.0 - z * z).sqrt();
                        let jitter = rng.gen_range(0.98..1.02) * radius;
                        [r * theta.cos() * jitter, r * theta.sin() * jitter, z * jitter]
                    })
                    .collect();
                PointSample::new(points, label)
            })
            .collect();

        Self {
            samples,
            num_classes: classes,
            num_points,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at `index`.
    pub fn get(&self, index: usize) -> Option<&PointSample> {
        self.samples.get(index)
    }

    /// All samples in storage order.
    pub fn samples(&self) -> &[PointSample] {
        &self.samples
    }

    /// Number of classes labels are drawn from.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Points per sample.
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Samples per class, indexed by class.
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.num_classes];
        for sample in &self.samples {
            counts[sample.label] += 1;
        }
        counts
    }
}
