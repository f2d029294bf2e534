//! Model checkpoints.
//!
//! Parameters are encoded with burn's bytes recorder at full precision and
//! written to the exact path given, so the run always keeps a single
//! `models/model.t7` that is overwritten on every new best.

use std::fs;
use std::path::Path;

use burn::module::Module;
use burn::prelude::*;
use burn::record::{BinBytesRecorder, FullPrecisionSettings, Recorder};

use crate::error::{NeuralPclsError, Result};

type CheckpointRecorder = BinBytesRecorder<FullPrecisionSettings>;

/// Check if a checkpoint file exists.
pub fn checkpoint_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().is_file()
}

/// Write the model parameters to `path`, replacing any previous file.
pub fn save_checkpoint<B: Backend, M: Module<B>>(model: &M, path: &Path) -> Result<()> {
    let recorder = CheckpointRecorder::default();
    let bytes = Recorder::<B>::record(&recorder, model.clone().into_record(), ())
        .map_err(|e| NeuralPclsError::Recorder(e.to_string()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;

    log::debug!("Saved checkpoint to {}", path.display());
    Ok(())
}

/// Restore parameters from `path` into `model`.
///
/// Fails with [`NeuralPclsError::CheckpointNotFound`] before reading
/// anything when the file does not exist.
pub fn load_checkpoint<B: Backend, M: Module<B>>(
    model: M,
    path: &Path,
    device: &B::Device,
) -> Result<M> {
    if !checkpoint_exists(path) {
        return Err(NeuralPclsError::CheckpointNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = fs::read(path)?;
    let recorder = CheckpointRecorder::default();
    let record: M::Record = Recorder::<B>::load(&recorder, bytes, device)
        .map_err(|e| NeuralPclsError::Recorder(e.to_string()))?;

    Ok(model.load_record(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PointNetClsConfig;
    use crate::nn::PointNetCls;
    use burn::backend::NdArray;
    use tempfile::TempDir;

    type TestBackend = NdArray;

    fn small_model(device: &<TestBackend as Backend>::Device) -> PointNetCls<TestBackend> {
        let config = PointNetClsConfig::new(3)
            .with_emb_dims(16)
            .with_hidden_dims(vec![8])
            .with_head_dim(8);
        PointNetCls::new(&config, device)
    }

    #[test]
    fn test_missing_checkpoint() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("models/model.t7");
        let device = Default::default();

        let result = load_checkpoint(small_model(&device), &path, &device);
        assert!(matches!(result, Err(NeuralPclsError::CheckpointNotFound { .. })));
    }

    #[test]
    fn test_roundtrip_reproduces_logits() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("models/model.t7");
        let device = Default::default();

        let model = small_model(&device);
        save_checkpoint(&model, &path).unwrap();
        assert!(checkpoint_exists(&path));

        // Fresh weights differ until the record is loaded.
        let restored = load_checkpoint(small_model(&device), &path, &device).unwrap();

        let points = Tensor::<TestBackend, 3>::random(
            [2, 3, 8],
            burn::tensor::Distribution::Default,
            &device,
        );
        let diff = (model.forward(points.clone()) - restored.forward(points))
            .abs()
            .max()
            .into_scalar();
        assert!(diff < 1e-6, "Max diff: {}", diff);
    }

    #[test]
    fn test_save_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("model.t7");
        let device = Default::default();

        save_checkpoint(&small_model(&device), &path).unwrap();
        save_checkpoint(&small_model(&device), &path).unwrap();

        let entries = fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
