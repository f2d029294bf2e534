//! Attention-based (IBT) classifier.
//!
//! ```text
//! points [B,3,N] -> per-point embedding -> k-NN edge aggregation
//!   -> attention block x num_blocks -> concat -> fuse to emb_dims
//!   -> max || mean pooling -> MLP head -> logits [B,C]
//! ```

use burn::module::Module;
use burn::nn::attention::{MhaInput, MultiHeadAttention, MultiHeadAttentionConfig};
use burn::nn::{
    BatchNorm, BatchNormConfig, Dropout, DropoutConfig, LayerNorm, LayerNormConfig, Linear,
    LinearConfig, Relu,
};
use burn::prelude::*;

use super::{norm_features, PointClassifier};
use crate::config::IbtClsConfig;

/// Indices of the `k` nearest points (self included) for every point.
///
/// Input: coordinates of shape [batch, num_points, 3]
/// Output: indices of shape [batch, num_points, k], nearest first
pub(crate) fn knn_indices<B: Backend>(coords: Tensor<B, 3>, k: usize) -> Tensor<B, 3, Int> {
    let [batch, num_points, _] = coords.dims();

    // |a - b|^2 = |a|^2 + |b|^2 - 2 a.b
    let inner = coords.clone().matmul(coords.clone().swap_dims(1, 2));
    let sq = (coords.clone() * coords).sum_dim(2);
    let dist = sq.clone() + sq.swap_dims(1, 2) - inner.mul_scalar(2.0);

    dist.argsort(2).slice([0..batch, 0..num_points, 0..k])
}

/// Edge convolution over each point's k-nearest neighbourhood.
///
/// Every edge feature is `[f_j - f_i, f_i]`; a shared linear layer maps it
/// and max pooling over the neighbourhood reduces it back to one feature
/// per point.
#[derive(Module, Debug)]
pub struct EdgeConv<B: Backend> {
    linear: Linear<B>,
    norm: LayerNorm<B>,
    activation: Relu,
    k: usize,
}

impl<B: Backend> EdgeConv<B> {
    /// Create an edge convolution mapping `in_dim` to `out_dim` features.
    pub fn new(in_dim: usize, out_dim: usize, k: usize, device: &B::Device) -> Self {
        Self {
            linear: LinearConfig::new(2 * in_dim, out_dim).init(device),
            norm: LayerNormConfig::new(out_dim).init(device),
            activation: Relu::new(),
            k,
        }
    }

    /// Forward pass.
    ///
    /// Input: coordinates [batch, num_points, 3] and features [batch, num_points, in_dim]
    /// Output: features [batch, num_points, out_dim]
    pub fn forward(&self, coords: Tensor<B, 3>, features: Tensor<B, 3>) -> Tensor<B, 3> {
        let [batch, num_points, dim] = features.dims();
        let k = self.k.min(num_points);

        let indices = knn_indices(coords.detach(), k)
            .reshape([batch, num_points * k, 1])
            .expand([batch, num_points * k, dim]);
        let neighbours: Tensor<B, 4> = features
            .clone()
            .gather(1, indices)
            .reshape([batch, num_points, k, dim]);
        let centre: Tensor<B, 4> = features
            .reshape([batch, num_points, 1, dim])
            .expand([batch, num_points, k, dim]);

        let edges = Tensor::cat(vec![neighbours - centre.clone(), centre], 3);
        let x = self
            .activation
            .forward(self.norm.forward(self.linear.forward(edges)));

        // Reduce over the trailing axis: [batch, num_points, out_dim, k]
        let out_dim = x.dims()[3];
        x.swap_dims(2, 3)
            .max_dim(3)
            .reshape([batch, num_points, out_dim])
    }
}

/// Self-attention block with residual connections and post-norm.
#[derive(Module, Debug)]
pub struct AttentionBlock<B: Backend> {
    attention: MultiHeadAttention<B>,
    norm1: LayerNorm<B>,
    ff1: Linear<B>,
    ff2: Linear<B>,
    norm2: LayerNorm<B>,
    activation: Relu,
}

impl<B: Backend> AttentionBlock<B> {
    /// Create a block of width `dim` with `num_heads` heads.
    pub fn new(dim: usize, num_heads: usize, device: &B::Device) -> Self {
        Self {
            attention: MultiHeadAttentionConfig::new(dim, num_heads)
                .with_dropout(0.0)
                .init(device),
            norm1: LayerNormConfig::new(dim).init(device),
            ff1: LinearConfig::new(dim, 2 * dim).init(device),
            ff2: LinearConfig::new(2 * dim, dim).init(device),
            norm2: LayerNormConfig::new(dim).init(device),
            activation: Relu::new(),
        }
    }

    /// Forward pass over [batch, num_points, dim].
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let attended = self.attention.forward(MhaInput::self_attn(x.clone())).context;
        let x = self.norm1.forward(x + attended);

        let ff = self
            .ff2
            .forward(self.activation.forward(self.ff1.forward(x.clone())));
        self.norm2.forward(x + ff)
    }
}

/// Attention-based point-cloud classifier.
#[derive(Module, Debug)]
pub struct IbtCls<B: Backend> {
    embed: Linear<B>,
    embed_norm: LayerNorm<B>,
    edge: EdgeConv<B>,
    blocks: Vec<AttentionBlock<B>>,
    fuse: Linear<B>,
    fuse_norm: LayerNorm<B>,
    linear1: Linear<B>,
    norm1: BatchNorm<B, 1>,
    dropout1: Dropout,
    linear2: Linear<B>,
    norm2: BatchNorm<B, 1>,
    dropout2: Dropout,
    linear3: Linear<B>,
    activation: Relu,
}

impl<B: Backend> IbtCls<B> {
    /// Create a new classifier from configuration.
    pub fn new(config: &IbtClsConfig, device: &B::Device) -> Self {
        let dim = config.model_dim;
        let blocks = (0..config.num_blocks)
            .map(|_| AttentionBlock::new(dim, config.num_heads, device))
            .collect();

        Self {
            embed: LinearConfig::new(3, dim).init(device),
            embed_norm: LayerNormConfig::new(dim).init(device),
            edge: EdgeConv::new(dim, dim, config.k, device),
            blocks,
            fuse: LinearConfig::new(dim * config.num_blocks, config.emb_dims).init(device),
            fuse_norm: LayerNormConfig::new(config.emb_dims).init(device),
            linear1: LinearConfig::new(2 * config.emb_dims, 512)
                .with_bias(false)
                .init(device),
            norm1: BatchNormConfig::new(512).init(device),
            dropout1: DropoutConfig::new(config.dropout).init(),
            linear2: LinearConfig::new(512, 256).init(device),
            norm2: BatchNormConfig::new(256).init(device),
            dropout2: DropoutConfig::new(config.dropout).init(),
            linear3: LinearConfig::new(256, config.num_classes).init(device),
            activation: Relu::new(),
        }
    }

    /// Forward pass.
    ///
    /// Input: points of shape [batch, 3, num_points]
    /// Output: logits of shape [batch, num_classes]
    pub fn forward(&self, points: Tensor<B, 3>) -> Tensor<B, 2> {
        let coords = points.swap_dims(1, 2);

        let x = self
            .activation
            .forward(self.embed_norm.forward(self.embed.forward(coords.clone())));
        let mut x = self.edge.forward(coords, x);

        let mut stages = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            x = block.forward(x);
            stages.push(x.clone());
        }

        let fused = self
            .activation
            .forward(self.fuse_norm.forward(self.fuse.forward(Tensor::cat(stages, 2))));

        let [batch, _, emb_dims] = fused.dims();
        let max = fused
            .clone()
            .swap_dims(1, 2)
            .max_dim(2)
            .reshape([batch, emb_dims]);
        let mean = fused.mean_dim(1).reshape([batch, emb_dims]);
        let x = Tensor::cat(vec![max, mean], 1);

        let x = self.linear1.forward(x);
        let x = self.dropout1.forward(self.activation.forward(norm_features(&self.norm1, x)));
        let x = self.linear2.forward(x);
        let x = self.dropout2.forward(self.activation.forward(norm_features(&self.norm2, x)));
        self.linear3.forward(x)
    }
}

impl<B: Backend> PointClassifier<B> for IbtCls<B> {
    fn forward(&self, points: Tensor<B, 3>) -> Tensor<B, 2> {
        IbtCls::forward(self, points)
    }
}
