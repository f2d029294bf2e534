//! Configuration types for neural_pcls.
//!
//! Burn-style configuration structs for the classifiers and the run.

mod network;
mod training;

pub use network::{IbtClsConfig, ModelConfig, PointNetClsConfig};
pub use training::TrainingConfig;
