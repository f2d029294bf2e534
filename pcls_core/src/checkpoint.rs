//! Keep-latest-best checkpoint policy.

/// Best test accuracy seen so far in a run.
///
/// Starts at zero and never decreases. Threaded through the epoch loop by
/// value rather than held globally.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BestAccuracy {
    best: f64,
}

impl BestAccuracy {
    /// Tracker for a fresh run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Best accuracy recorded so far.
    pub fn value(&self) -> f64 {
        self.best
    }

    /// Record a pass accuracy.
    ///
    /// Returns `true` when the checkpoint should be written: the accuracy is
    /// greater than *or equal to* the best so far, so ties overwrite.
    pub fn observe(&mut self, accuracy: f64) -> bool {
        if accuracy >= self.best {
            self.best = accuracy;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_pass_always_saves() {
        let mut best = BestAccuracy::new();
        assert!(best.observe(0.0));
        assert_eq!(best.value(), 0.0);
    }

    #[test]
    fn test_ties_save() {
        let mut best = BestAccuracy::new();
        assert!(best.observe(0.8));
        assert!(best.observe(0.8));
        assert!(!best.observe(0.79));
        assert_eq!(best.value(), 0.8);
    }

    #[test]
    fn test_never_decreases() {
        let mut best = BestAccuracy::new();
        for acc in [0.3, 0.5, 0.2, 0.9, 0.1] {
            best.observe(acc);
        }
        assert_eq!(best.value(), 0.9);
    }
}
