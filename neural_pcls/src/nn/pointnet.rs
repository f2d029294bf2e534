//! PointNet classifier.

use burn::module::Module;
use burn::nn::conv::{Conv1d, Conv1dConfig};
use burn::nn::{BatchNorm, BatchNormConfig, Dropout, DropoutConfig, Linear, LinearConfig, Relu};
use burn::prelude::*;

use super::{norm_features, PointClassifier};
use crate::config::PointNetClsConfig;

/// PointNet-style classifier.
///
/// A shared MLP (1x1 convolutions with batch norm) lifts every point to
/// `emb_dims` features, max pooling over points gives a permutation
/// invariant global code, and a two-layer head produces the logits.
#[derive(Module, Debug)]
pub struct PointNetCls<B: Backend> {
    /// Per-point layers, the last one producing `emb_dims` channels.
    convs: Vec<Conv1d<B>>,
    /// Batch norm after each per-point layer.
    norms: Vec<BatchNorm<B, 1>>,
    /// Hidden classification layer.
    linear1: Linear<B>,
    head_norm: BatchNorm<B, 1>,
    dropout: Dropout,
    /// Output projection to class logits.
    linear2: Linear<B>,
    activation: Relu,
}

impl<B: Backend> PointNetCls<B> {
    /// Create a new classifier from configuration.
    pub fn new(config: &PointNetClsConfig, device: &B::Device) -> Self {
        let mut convs = Vec::new();
        let mut norms = Vec::new();
        let mut in_dim = 3;

        for &out_dim in config.hidden_dims.iter().chain([&config.emb_dims]) {
            convs.push(
                Conv1dConfig::new(in_dim, out_dim, 1)
                    .with_bias(false)
                    .init(device),
            );
            norms.push(BatchNormConfig::new(out_dim).init(device));
            in_dim = out_dim;
        }

        Self {
            convs,
            norms,
            linear1: LinearConfig::new(config.emb_dims, config.head_dim)
                .with_bias(false)
                .init(device),
            head_norm: BatchNormConfig::new(config.head_dim).init(device),
            dropout: DropoutConfig::new(config.dropout).init(),
            linear2: LinearConfig::new(config.head_dim, config.num_classes).init(device),
            activation: Relu::new(),
        }
    }

    /// Forward pass.
    ///
    /// Input: points of shape [batch, 3, num_points]
    /// Output: logits of shape [batch, num_classes]
    pub fn forward(&self, points: Tensor<B, 3>) -> Tensor<B, 2> {
        let mut x = points;
        for (conv, norm) in self.convs.iter().zip(&self.norms) {
            x = self.activation.forward(norm.forward(conv.forward(x)));
        }

        // Max pooling over points: [batch, emb_dims]
        let [batch, channels, _] = x.dims();
        let x = x.max_dim(2).reshape([batch, channels]);

        let x = self.linear1.forward(x);
        let x = self.activation.forward(norm_features(&self.head_norm, x));
        let x = self.dropout.forward(x);
        self.linear2.forward(x)
    }
}

impl<B: Backend> PointClassifier<B> for PointNetCls<B> {
    fn forward(&self, points: Tensor<B, 3>) -> Tensor<B, 2> {
        PointNetCls::forward(self, points)
    }
}
