//! Optimizer selection.
//!
//! Both optimizers receive the learning rate on every step from the epoch
//! schedule, so only their static settings live here.

use burn::optim::decay::WeightDecayConfig;
use burn::optim::momentum::MomentumConfig;
use burn::optim::{AdamConfig, SgdConfig};
use burn::tensor::ElementConversion;

use crate::config::TrainingConfig;

/// SGD runs at this multiple of the configured learning rate.
pub const SGD_LR_SCALE: f64 = 100.0;

/// Which optimizer a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizerKind {
    /// SGD with momentum and weight decay.
    Sgd,
    /// Adam with weight decay.
    Adam,
}

impl OptimizerKind {
    /// Optimizer chosen by the configuration.
    pub fn from_config(config: &TrainingConfig) -> Self {
        if config.use_sgd {
            OptimizerKind::Sgd
        } else {
            OptimizerKind::Adam
        }
    }

    /// Base learning rate handed to the schedule.
    pub fn base_lr(self, lr: f64) -> f64 {
        match self {
            OptimizerKind::Sgd => lr * SGD_LR_SCALE,
            OptimizerKind::Adam => lr,
        }
    }

    /// Console line announcing the choice.
    pub fn announcement(self) -> &'static str {
        match self {
            OptimizerKind::Sgd => "Use SGD",
            OptimizerKind::Adam => "Use Adam",
        }
    }
}

/// Classical momentum, no dampening, no Nesterov.
pub fn momentum_config(config: &TrainingConfig) -> MomentumConfig {
    MomentumConfig::new()
        .with_momentum(config.momentum)
        .with_dampening(0.0)
        .with_nesterov(false)
}

/// SGD settings: momentum plus L2 weight decay.
pub fn sgd_config(config: &TrainingConfig) -> SgdConfig {
    SgdConfig::new()
        .with_momentum(Some(momentum_config(config)))
        .with_weight_decay(Some(WeightDecayConfig::new(config.weight_decay.elem())))
}

/// Epsilon of the Adam denominator.
pub const ADAM_EPSILON: f32 = 1e-8;

/// Adam settings with L2 weight decay.
pub fn adam_config(config: &TrainingConfig) -> AdamConfig {
    AdamConfig::new()
        .with_epsilon(ADAM_EPSILON)
        .with_weight_decay(Some(WeightDecayConfig::new(config.weight_decay.elem())))
}
