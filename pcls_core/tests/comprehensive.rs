//! Behavioural test suite for pcls_core.
//!
//! # Test Categories
//!
//! 1. **Metric Invariants** - ranges, perfect-score conditions, balanced vs plain
//! 2. **Schedule Invariants** - floor clamping, monotone annealing
//! 3. **Checkpoint Policy** - save iff accuracy >= best
//! 4. **Scenarios** - small hand-checked passes

use pcls_core::prelude::*;
use pcls_core::{COSINE_LR_FLOOR, STEP_LR_FLOOR};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Labels/predictions of equal length, classes drawn from `0..8`.
fn paired_arrays() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    (1usize..64).prop_flat_map(|len| {
        (
            prop::collection::vec(0usize..8, len),
            prop::collection::vec(0usize..8, len),
        )
    })
}

/// Labels where every class has the same support, plus arbitrary predictions.
fn balanced_arrays() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    (1usize..6, 1usize..8).prop_flat_map(|(classes, support)| {
        let labels: Vec<usize> = (0..classes)
            .flat_map(|c| std::iter::repeat(c).take(support))
            .collect();
        let len = labels.len();
        (
            prop::collection::vec(0usize..classes + 2, len),
            Just(labels),
        )
    })
}

// =============================================================================
// 1. Metric Invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn accuracy_in_unit_interval((preds, labels) in paired_arrays()) {
        let acc = accuracy(&preds, &labels).unwrap();
        prop_assert!((0.0..=1.0).contains(&acc));

        let bal = balanced_accuracy(&preds, &labels).unwrap();
        prop_assert!((0.0..=1.0).contains(&bal));
    }

    #[test]
    fn accuracy_is_one_iff_all_match((preds, labels) in paired_arrays()) {
        let acc = accuracy(&preds, &labels).unwrap();
        let all_match = preds == labels;
        prop_assert_eq!(acc == 1.0, all_match);
        prop_assert_eq!(accuracy(&labels, &labels).unwrap(), 1.0);
    }

    #[test]
    fn balanced_equals_plain_with_equal_support((preds, labels) in balanced_arrays()) {
        let metrics = PassMetrics::compute(&preds, &labels).unwrap();
        prop_assert!((metrics.accuracy - metrics.balanced_accuracy).abs() < 1e-9);
    }

    #[test]
    fn batch_predictions_match_label_count(
        batches in prop::collection::vec(prop::collection::vec(0usize..4, 1..10), 1..6)
    ) {
        let mut pass = PassAccumulator::new();
        for labels in &batches {
            let preds = vec![0; labels.len()];
            prop_assert_eq!(preds.len(), labels.len());
            pass.record(1.0, preds, labels.clone()).unwrap();
        }
        let summary = pass.finish().unwrap();
        let total: usize = batches.iter().map(Vec::len).sum();
        prop_assert_eq!(summary.samples, total);
    }
}

// =============================================================================
// 2. Schedule Invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn step_schedule_never_below_floor_once_clamped(
        base in 1e-5f64..1.0,
        gamma in 0.05f64..0.95,
        step_size in 1usize..25,
    ) {
        let mut sched = StepDecay::new(base, step_size, gamma, STEP_LR_FLOOR);
        let mut clamped = false;
        for _ in 0..2000 {
            sched.step();
            let lr = sched.learning_rate();
            prop_assert!(lr >= STEP_LR_FLOOR);
            if clamped {
                prop_assert_eq!(lr, STEP_LR_FLOOR);
            }
            if lr == STEP_LR_FLOOR {
                clamped = true;
            }
        }
    }

    #[test]
    fn cosine_schedule_non_increasing(
        base in 1e-4f64..1.0,
        epochs in 1usize..400,
    ) {
        let mut sched = CosineAnnealing::new(base, COSINE_LR_FLOOR, epochs);
        let mut previous = sched.learning_rate();
        for _ in 0..epochs + 5 {
            sched.step();
            let lr = sched.learning_rate();
            prop_assert!(lr <= previous + 1e-15);
            prop_assert!(lr >= COSINE_LR_FLOOR.min(base) - 1e-15);
            previous = lr;
        }
    }
}

#[test]
fn step_schedule_matches_clamp_not_lower_bound() {
    // With gamma 0.7 and a 20 epoch step the rate passes the floor between
    // two decays; the clamp lands it exactly on the floor.
    let mut sched = SchedulerKind::Step.build(0.1, 2000);
    let mut history = Vec::new();
    for _ in 0..2000 {
        sched.step();
        history.push(sched.learning_rate());
    }

    let first_floor = history
        .iter()
        .position(|&lr| lr == STEP_LR_FLOOR)
        .expect("step schedule should reach the floor");
    assert!(history[first_floor - 1] > STEP_LR_FLOOR);
    assert!(history[first_floor..].iter().all(|&lr| lr == STEP_LR_FLOOR));
}

// =============================================================================
// 3. Checkpoint Policy
// =============================================================================

proptest! {
    #[test]
    fn checkpoint_saves_iff_not_worse(accs in prop::collection::vec(0.0f64..=1.0, 1..50)) {
        let mut best = BestAccuracy::new();
        let mut reference = 0.0f64;
        for acc in accs {
            let expected = acc >= reference;
            prop_assert_eq!(best.observe(acc), expected);
            if expected {
                reference = acc;
            }
            prop_assert_eq!(best.value(), reference);
        }
    }
}

// =============================================================================
// 4. Scenarios
// =============================================================================

#[test]
fn constant_class_zero_predictor_on_balanced_split() {
    // 10 samples, 5 per class, batches of 5, model always predicts class 0.
    let labels = [0, 1, 0, 1, 0, 1, 0, 1, 0, 1];
    let mut pass = PassAccumulator::new();
    for chunk in labels.chunks(5) {
        pass.record(0.69, vec![0; chunk.len()], chunk.to_vec()).unwrap();
    }

    let summary = pass.finish().unwrap();
    assert!((summary.metrics.accuracy - 0.5).abs() < 1e-12);
    assert!((summary.metrics.balanced_accuracy - 0.5).abs() < 1e-12);
}

#[test]
fn missing_class_in_split_is_well_defined() {
    // Class 2 never appears as a label.
    let preds = [0, 2, 1, 1];
    let labels = [0, 0, 1, 1];
    let bal = balanced_accuracy(&preds, &labels).unwrap();
    assert!((bal - 0.75).abs() < 1e-12);
}
