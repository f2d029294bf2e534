//! Host batches to device tensors.

use burn::prelude::*;

use pcls_io::SampleBatch;

/// A batch of point clouds on the device, channel-major.
#[derive(Debug, Clone)]
pub struct ClassificationBatch<B: Backend> {
    /// Point coordinates: [batch, 3, num_points]
    pub points: Tensor<B, 3>,
    /// True class per sample.
    pub labels: Vec<usize>,
}

impl<B: Backend> ClassificationBatch<B> {
    /// Upload a host batch and permute it to channel-major order.
    pub fn from_samples(batch: &SampleBatch, device: &B::Device) -> Self {
        let points = Tensor::<B, 3>::from_data(
            TensorData::new(batch.points.clone(), batch.shape()),
            device,
        )
        .swap_dims(1, 2);

        Self {
            points,
            labels: batch.labels.clone(),
        }
    }

    /// Number of samples in the batch.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Arg-max class per row of a logits tensor.
pub fn predictions<B: Backend>(logits: Tensor<B, 2>) -> Vec<usize> {
    logits
        .argmax(1)
        .into_data()
        .iter::<i64>()
        .map(|class| class as usize)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_channel_major() {
        let device = Default::default();
        let batch = SampleBatch {
            // Two samples of two points: (1,2,3), (4,5,6) | (7,8,9), (10,11,12)
            points: (1..=12).map(|v| v as f32).collect(),
            labels: vec![1, 0],
            batch_size: 2,
            num_points: 2,
        };

        let tensors = ClassificationBatch::<TestBackend>::from_samples(&batch, &device);
        assert_eq!(tensors.points.dims(), [2, 3, 2]);
        assert_eq!(tensors.len(), 2);

        let values: Vec<f32> = tensors.points.into_data().iter::<f32>().collect();
        assert_eq!(
            values,
            vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0, 7.0, 10.0, 8.0, 11.0, 9.0, 12.0]
        );
    }

    #[test]
    fn test_predictions() {
        let device = Default::default();
        let logits = Tensor::<TestBackend, 2>::from_data(
            TensorData::new(vec![0.1f32, 0.9, 0.0, 2.0, -1.0, 0.5], [2, 3]),
            &device,
        );

        assert_eq!(predictions(logits), vec![1, 0]);
    }
}
