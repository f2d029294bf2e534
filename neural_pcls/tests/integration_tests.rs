//! End-to-end tests: tiny training runs, checkpoint evaluation and metric
//! aggregation over real loaders.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use burn::backend::{Autodiff, NdArray};
use burn::module::Module;
use burn::nn::{Linear, LinearConfig};
use burn::prelude::*;
use tempfile::TempDir;

use neural_pcls::prelude::*;
use pcls_core::LrSchedule;
use pcls_io::{format, Split};

type TestBackend = Autodiff<NdArray>;
type InferenceBackend = NdArray;

const NUM_POINTS: usize = 16;

/// Write small synthetic train/test splits for `kind` under `root`.
fn write_splits(root: &Path, kind: DatasetKind) {
    let classes = kind.num_classes();
    for (split, samples, seed) in [(Split::Train, 4 * classes, 1), (Split::Test, 2 * classes, 2)] {
        let dataset = PointCloudDataset::synthetic(samples, NUM_POINTS, classes, seed);
        let path = kind.split_path(root, split);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        format::save_to_file(&dataset, &path).unwrap();
    }
}

fn tiny_config(root: &Path, model: ModelKind) -> TrainingConfig {
    TrainingConfig::new()
        .with_exp_name("tiny".to_string())
        .with_model(model)
        .with_dataset(DatasetKind::ModelNet10)
        .with_data_root(root.join("data"))
        .with_output_root(root.join("outputs"))
        .with_batch_size(8)
        .with_test_batch_size(6)
        .with_epochs(2)
        .with_num_points(NUM_POINTS)
        .with_emb_dims(32)
        .with_k(4)
        .with_no_cuda(true)
        .with_progress(false)
}

// ============================================================================
// Training
// ============================================================================

#[test]
fn test_pointnet_training_run() {
    let temp_dir = TempDir::new().unwrap();
    write_splits(&temp_dir.path().join("data"), DatasetKind::ModelNet10);

    let config = tiny_config(temp_dir.path(), ModelKind::PointNet);
    let experiment = Experiment::create(&config.output_root, &config.exp_name).unwrap();

    let outcome = run(&config, &experiment).unwrap();
    let RunOutcome::Trained(summary) = outcome else {
        panic!("expected a training outcome");
    };

    assert_eq!(summary.epochs.len(), 2);
    assert!(experiment.checkpoint_path().is_file());
    assert!(experiment.config_path().is_file());

    // The first epoch always beats the initial best of zero.
    assert!(summary.epochs[0].checkpoint_saved);

    for report in &summary.epochs {
        // drop_last: 40 training samples in batches of 8.
        assert_eq!(report.train.samples, 40);
        // No drop_last on the test loader.
        assert_eq!(report.test.samples, 20);
        assert!(report.train.loss.is_finite());
        assert!((0.0..=1.0).contains(&report.test.metrics.accuracy));
    }
}

#[test]
fn test_checkpoint_saved_iff_not_worse() {
    let temp_dir = TempDir::new().unwrap();
    write_splits(&temp_dir.path().join("data"), DatasetKind::ModelNet10);

    let config = tiny_config(temp_dir.path(), ModelKind::PointNet)
        .with_epochs(3)
        .with_use_sgd(false);
    let checkpoint = temp_dir.path().join("models/model.t7");
    let device = Default::default();

    let summary = train::<TestBackend>(&config, checkpoint.clone(), &device).unwrap();

    let mut best = 0.0;
    for report in &summary.epochs {
        let accuracy = report.test.metrics.accuracy;
        assert_eq!(report.checkpoint_saved, accuracy >= best);
        if accuracy >= best {
            best = accuracy;
        }
    }
    assert_eq!(summary.best_accuracy, best);
    assert!(checkpoint.is_file());
}

#[test]
fn test_epochs_follow_schedule() {
    let temp_dir = TempDir::new().unwrap();
    write_splits(&temp_dir.path().join("data"), DatasetKind::ModelNet10);
    let device = Default::default();

    for scheduler in [SchedulerKind::Cos, SchedulerKind::Step] {
        let config = tiny_config(temp_dir.path(), ModelKind::PointNet)
            .with_epochs(3)
            .with_scheduler(scheduler);
        let checkpoint = temp_dir.path().join(format!("{}/model.t7", scheduler));

        let summary = train::<TestBackend>(&config, checkpoint, &device).unwrap();

        let base_lr = OptimizerKind::from_config(&config).base_lr(config.lr);
        let mut expected = scheduler.build(base_lr, config.epochs);
        for report in &summary.epochs {
            assert!(
                (report.learning_rate - expected.learning_rate()).abs() < 1e-12,
                "{} epoch {}: {} != {}",
                scheduler,
                report.epoch,
                report.learning_rate,
                expected.learning_rate()
            );
            expected.step();
        }
    }
}

#[test]
fn test_ibt_training_step() {
    let temp_dir = TempDir::new().unwrap();
    write_splits(&temp_dir.path().join("data"), DatasetKind::ModelNet10);

    let config = tiny_config(temp_dir.path(), ModelKind::Ibt).with_epochs(1);
    let checkpoint = temp_dir.path().join("models/model.t7");
    let device = Default::default();

    let summary = train::<TestBackend>(&config, checkpoint.clone(), &device).unwrap();

    assert_eq!(summary.epochs.len(), 1);
    assert!(summary.epochs[0].train.loss.is_finite());
    assert!(checkpoint.is_file());
}

// ============================================================================
// Evaluation
// ============================================================================

#[test]
fn test_eval_reports_missing_checkpoint() {
    let temp_dir = TempDir::new().unwrap();
    write_splits(&temp_dir.path().join("data"), DatasetKind::ModelNet10);

    let config = tiny_config(temp_dir.path(), ModelKind::PointNet)
        .with_eval(true)
        .with_model_path(Some(temp_dir.path().join("missing/model.t7")));
    let device = Default::default();

    let result = evaluate_checkpoint::<InferenceBackend>(&config, &device);
    assert!(matches!(
        result,
        Err(NeuralPclsError::CheckpointNotFound { .. })
    ));
}

#[test]
fn test_eval_after_training() {
    let temp_dir = TempDir::new().unwrap();
    write_splits(&temp_dir.path().join("data"), DatasetKind::ModelNet10);

    let config = tiny_config(temp_dir.path(), ModelKind::PointNet).with_epochs(1);
    let experiment = Experiment::create(&config.output_root, &config.exp_name).unwrap();
    run(&config, &experiment).unwrap();

    let config = config
        .with_eval(true)
        .with_model_path(Some(experiment.checkpoint_path()));
    let outcome = run(&config, &experiment).unwrap();

    let RunOutcome::Evaluated(summary) = outcome else {
        panic!("expected an evaluation outcome");
    };
    assert_eq!(summary.samples, 20);
    // No loss is computed in standalone evaluation.
    assert_eq!(summary.loss, 0.0);
}

/// Predicts class 0 for every sample.
#[derive(Module, Debug)]
struct ConstantCls<B: Backend> {
    probe: Linear<B>,
}

impl<B: Backend> PointClassifier<B> for ConstantCls<B> {
    fn forward(&self, points: Tensor<B, 3>) -> Tensor<B, 2> {
        let [batch, _, _] = points.dims();
        Tensor::<B, 1>::from_floats([1.0, 0.0], &points.device())
            .reshape([1, 2])
            .expand([batch, 2])
    }
}

#[test]
fn test_constant_classifier_metrics() {
    let device = Default::default();
    let model = ConstantCls::<InferenceBackend> {
        probe: LinearConfig::new(3, 2).init(&device),
    };

    // Labels alternate 0, 1: five of each.
    let dataset = Arc::new(PointCloudDataset::synthetic(10, 8, 2, 0));
    let loader = DataLoader::new(dataset, 4).unwrap();
    let options = PassOptions {
        epoch: 0,
        progress: false,
    };

    let summary = evaluate(&model, &loader, None, &device, options).unwrap();
    assert_eq!(summary.samples, 10);
    assert!((summary.metrics.accuracy - 0.5).abs() < 1e-12);
    assert!((summary.metrics.balanced_accuracy - 0.5).abs() < 1e-12);

    let report = PassReport::standalone(summary);
    assert_eq!(
        report.to_string(),
        "Test :: test acc: 0.500000, test avg acc: 0.500000"
    );
}

#[test]
fn test_invalid_config_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config = tiny_config(temp_dir.path(), ModelKind::Ibt).with_k(NUM_POINTS + 1);
    let experiment = Experiment::create(&config.output_root, &config.exp_name).unwrap();

    let result = run(&config, &experiment);
    assert!(matches!(result, Err(NeuralPclsError::InvalidConfig { .. })));
}
