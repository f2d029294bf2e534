//! Point-cloud classifiers.
//!
//! Every model maps channel-major points `[batch, 3, num_points]` to raw
//! class logits `[batch, num_classes]`.

mod ibt;
mod pointnet;

use std::fmt;
use std::str::FromStr;

use burn::module::Module;
use burn::nn::BatchNorm;
use burn::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::NeuralPclsError;

pub use ibt::{AttentionBlock, EdgeConv, IbtCls};
pub use pointnet::PointNetCls;

/// Common interface of the classifiers.
pub trait PointClassifier<B: Backend>: Module<B> {
    /// Logits for a channel-major batch of points.
    fn forward(&self, points: Tensor<B, 3>) -> Tensor<B, 2>;
}

/// Batch norm over `[batch, features]`, viewed as a length-1 sequence.
pub(crate) fn norm_features<B: Backend>(norm: &BatchNorm<B, 1>, x: Tensor<B, 2>) -> Tensor<B, 2> {
    let [batch, features] = x.dims();
    norm.forward(x.reshape([batch, features, 1]))
        .reshape([batch, features])
}

/// Supported architectures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Shared per-point MLP with global max pooling.
    #[value(name = "pointnet")]
    PointNet,
    /// Neighbourhood embedding followed by stacked self-attention.
    Ibt,
}

impl ModelKind {
    /// Name accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            ModelKind::PointNet => "pointnet",
            ModelKind::Ibt => "ibt",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelKind {
    type Err = NeuralPclsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pointnet" => Ok(ModelKind::PointNet),
            "ibt" => Ok(ModelKind::Ibt),
            _ => Err(NeuralPclsError::UnknownModel {
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_kind_parse() {
        assert_eq!("pointnet".parse::<ModelKind>().unwrap(), ModelKind::PointNet);
        assert_eq!("IBT".parse::<ModelKind>().unwrap(), ModelKind::Ibt);

        let err = "dgcnn".parse::<ModelKind>().unwrap_err();
        assert!(matches!(err, NeuralPclsError::UnknownModel { .. }));
    }

    #[test]
    fn test_model_kind_value_enum() {
        use clap::ValueEnum;

        let parse = |s: &str| <ModelKind as ValueEnum>::from_str(s, false);
        assert_eq!(parse("pointnet").unwrap(), ModelKind::PointNet);
        assert_eq!(parse("ibt").unwrap(), ModelKind::Ibt);
        assert!(parse("dgcnn").is_err());
    }
}
