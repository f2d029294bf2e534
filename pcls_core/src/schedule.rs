//! Per-epoch learning-rate schedules.
//!
//! The optimizer receives the learning rate explicitly on every step, so a
//! schedule is just a small state machine advanced once at the end of each
//! epoch.

use core::f64::consts::PI;
use core::fmt;
use core::str::FromStr;

use crate::error::{PclsCoreError, Result};

/// Floor used by the step schedule once the learning rate decays past it.
pub const STEP_LR_FLOOR: f64 = 1e-5;

/// Floor the cosine schedule anneals towards.
pub const COSINE_LR_FLOOR: f64 = 1e-3;

/// Epoch interval between step-schedule decays.
pub const STEP_SIZE: usize = 20;

/// Multiplicative decay applied by the step schedule.
pub const STEP_GAMMA: f64 = 0.7;

/// Learning-rate schedule advanced once per epoch.
pub trait LrSchedule {
    /// Learning rate to use for the next epoch.
    fn learning_rate(&self) -> f64;

    /// Advance the schedule by one epoch.
    fn step(&mut self);
}

/// Cosine annealing from `base_lr` to `min_lr` over `total_epochs`.
#[derive(Debug, Clone, PartialEq)]
pub struct CosineAnnealing {
    base_lr: f64,
    min_lr: f64,
    total_epochs: usize,
    epoch: usize,
}

impl CosineAnnealing {
    /// Create a schedule annealing over `total_epochs`.
    ///
    /// The floor is capped at `base_lr`, so the rate never rises.
    pub fn new(base_lr: f64, min_lr: f64, total_epochs: usize) -> Self {
        Self {
            base_lr,
            min_lr: min_lr.min(base_lr),
            total_epochs: total_epochs.max(1),
            epoch: 0,
        }
    }

    /// Learning rate after `epoch` steps, in closed form.
    pub fn rate_at(&self, epoch: usize) -> f64 {
        let t = epoch.min(self.total_epochs) as f64;
        let progress = t / self.total_epochs as f64;
        self.min_lr + (self.base_lr - self.min_lr) * (1.0 + (PI * progress).cos()) / 2.0
    }

    /// Number of epochs stepped so far.
    pub fn epoch(&self) -> usize {
        self.epoch
    }
}

impl LrSchedule for CosineAnnealing {
    fn learning_rate(&self) -> f64 {
        self.rate_at(self.epoch)
    }

    fn step(&mut self) {
        self.epoch += 1;
    }
}

/// Step decay with a hard floor.
///
/// Every `step_size` counted epochs the current rate is multiplied by
/// `gamma`. The counter only advances while the rate is strictly above
/// `floor`; when a decay lands below the floor the rate is set exactly to
/// `floor` and stays there for the rest of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct StepDecay {
    lr: f64,
    step_size: usize,
    gamma: f64,
    floor: f64,
    counter: usize,
}

impl StepDecay {
    /// Create a step schedule starting at `base_lr`.
    pub fn new(base_lr: f64, step_size: usize, gamma: f64, floor: f64) -> Self {
        Self {
            lr: base_lr,
            step_size: step_size.max(1),
            gamma,
            floor,
            counter: 0,
        }
    }

    /// Whether the rate has reached the floor.
    pub fn is_clamped(&self) -> bool {
        self.lr <= self.floor
    }
}

impl LrSchedule for StepDecay {
    fn learning_rate(&self) -> f64 {
        self.lr
    }

    fn step(&mut self) {
        if self.lr > self.floor {
            self.counter += 1;
            if self.counter % self.step_size == 0 {
                self.lr *= self.gamma;
            }
        }
        if self.lr < self.floor {
            self.lr = self.floor;
        }
    }
}

/// Which schedule a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum SchedulerKind {
    /// Cosine annealing towards [`COSINE_LR_FLOOR`].
    Cos,
    /// Step decay by [`STEP_GAMMA`] every [`STEP_SIZE`] epochs, floored at [`STEP_LR_FLOOR`].
    Step,
}

impl SchedulerKind {
    /// Build the schedule for a run of `epochs` epochs.
    pub fn build(self, base_lr: f64, epochs: usize) -> LrScheduler {
        match self {
            SchedulerKind::Cos => {
                LrScheduler::Cosine(CosineAnnealing::new(base_lr, COSINE_LR_FLOOR, epochs))
            }
            SchedulerKind::Step => LrScheduler::Step(StepDecay::new(
                base_lr,
                STEP_SIZE,
                STEP_GAMMA,
                STEP_LR_FLOOR,
            )),
        }
    }
}

impl SchedulerKind {
    /// Name accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            SchedulerKind::Cos => "cos",
            SchedulerKind::Step => "step",
        }
    }
}

impl fmt::Display for SchedulerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SchedulerKind {
    type Err = PclsCoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cos" => Ok(SchedulerKind::Cos),
            "step" => Ok(SchedulerKind::Step),
            _ => Err(PclsCoreError::UnknownScheduler),
        }
    }
}

/// Closed set of schedules selectable at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum LrScheduler {
    /// Cosine annealing.
    Cosine(CosineAnnealing),
    /// Floored step decay.
    Step(StepDecay),
}

impl LrSchedule for LrScheduler {
    fn learning_rate(&self) -> f64 {
        match self {
            LrScheduler::Cosine(s) => s.learning_rate(),
            LrScheduler::Step(s) => s.learning_rate(),
        }
    }

    fn step(&mut self) {
        match self {
            LrScheduler::Cosine(s) => s.step(),
            LrScheduler::Step(s) => s.step(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_endpoints() {
        let mut sched = CosineAnnealing::new(0.1, 1e-3, 10);
        assert!((sched.learning_rate() - 0.1).abs() < 1e-12);
        for _ in 0..10 {
            sched.step();
        }
        assert!((sched.learning_rate() - 1e-3).abs() < 1e-12);

        // Past the horizon it stays at the floor.
        sched.step();
        assert!((sched.learning_rate() - 1e-3).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_midpoint() {
        let sched = CosineAnnealing::new(0.1, 0.0, 4);
        assert!((sched.rate_at(2) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_floor_above_base_is_capped() {
        let mut sched = CosineAnnealing::new(5e-4, 1e-3, 5);
        let first = sched.learning_rate();
        sched.step();
        assert!(sched.learning_rate() <= first);
    }

    #[test]
    fn test_step_decay_every_step_size() {
        let mut sched = StepDecay::new(0.1, 20, 0.7, 1e-5);
        for _ in 0..19 {
            sched.step();
        }
        assert!((sched.learning_rate() - 0.1).abs() < 1e-12);
        sched.step();
        assert!((sched.learning_rate() - 0.07).abs() < 1e-12);
    }

    #[test]
    fn test_step_decay_clamps_exactly() {
        // 2e-5 * 0.1 drops below the floor on the first decay.
        let mut sched = StepDecay::new(2e-5, 1, 0.1, 1e-5);
        sched.step();
        assert_eq!(sched.learning_rate(), 1e-5);
        assert!(sched.is_clamped());

        for _ in 0..50 {
            sched.step();
            assert_eq!(sched.learning_rate(), 1e-5);
        }
    }

    #[test]
    fn test_scheduler_kind_build() {
        let cos = SchedulerKind::Cos.build(0.1, 200);
        assert!(matches!(cos, LrScheduler::Cosine(_)));
        let step = SchedulerKind::Step.build(0.1, 200);
        assert!(matches!(step, LrScheduler::Step(_)));
        assert_eq!(step.learning_rate(), 0.1);
    }

    #[test]
    fn test_scheduler_kind_from_str() {
        assert_eq!("cos".parse::<SchedulerKind>(), Ok(SchedulerKind::Cos));
        assert_eq!("STEP".parse::<SchedulerKind>(), Ok(SchedulerKind::Step));
        assert_eq!(
            "linear".parse::<SchedulerKind>(),
            Err(PclsCoreError::UnknownScheduler)
        );
        assert_eq!(SchedulerKind::Step.to_string(), "step");
    }
}
