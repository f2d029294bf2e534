//! Network configuration types.

use burn::config::Config;

use crate::nn::ModelKind;

/// Configuration for the PointNet classifier.
#[derive(Config, Debug)]
pub struct PointNetClsConfig {
    /// Number of output classes.
    pub num_classes: usize,

    /// Width of the global feature after max pooling.
    #[config(default = 1024)]
    pub emb_dims: usize,

    /// Per-point MLP widths before the embedding layer.
    #[config(default = "vec![64, 64, 64, 128]")]
    pub hidden_dims: Vec<usize>,

    /// Width of the hidden classification layer.
    #[config(default = 512)]
    pub head_dim: usize,

    /// Dropout probability in the head.
    #[config(default = 0.5)]
    pub dropout: f64,
}

/// Configuration for the attention-based (IBT) classifier.
#[derive(Config, Debug)]
pub struct IbtClsConfig {
    /// Number of output classes.
    pub num_classes: usize,

    /// Width of the fused point feature before pooling.
    #[config(default = 1024)]
    pub emb_dims: usize,

    /// Neighbours aggregated per point.
    #[config(default = 40)]
    pub k: usize,

    /// Width of the attention blocks.
    #[config(default = 64)]
    pub model_dim: usize,

    /// Attention heads per block.
    #[config(default = 4)]
    pub num_heads: usize,

    /// Number of stacked attention blocks.
    #[config(default = 4)]
    pub num_blocks: usize,

    /// Dropout probability in the head.
    #[config(default = 0.5)]
    pub dropout: f64,
}

impl IbtClsConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.k == 0 {
            return Err("k must be positive".to_string());
        }
        if self.num_heads == 0 || self.model_dim % self.num_heads != 0 {
            return Err("model_dim must be a positive multiple of num_heads".to_string());
        }
        if self.num_blocks == 0 {
            return Err("num_blocks must be positive".to_string());
        }
        Ok(())
    }
}

/// Architecture-independent model settings resolved for one dataset.
#[derive(Config, Debug)]
pub struct ModelConfig {
    /// Which architecture to build.
    pub kind: ModelKind,

    /// Number of output classes.
    pub num_classes: usize,

    /// Embedding width.
    #[config(default = 1024)]
    pub emb_dims: usize,

    /// Neighbour count (IBT only).
    #[config(default = 40)]
    pub k: usize,

    /// Head dropout probability.
    #[config(default = 0.5)]
    pub dropout: f64,
}

impl ModelConfig {
    /// PointNet settings.
    pub fn pointnet(&self) -> PointNetClsConfig {
        PointNetClsConfig::new(self.num_classes)
            .with_emb_dims(self.emb_dims)
            .with_dropout(self.dropout)
    }

    /// IBT settings.
    pub fn ibt(&self) -> IbtClsConfig {
        IbtClsConfig::new(self.num_classes)
            .with_emb_dims(self.emb_dims)
            .with_k(self.k)
            .with_dropout(self.dropout)
    }
}
