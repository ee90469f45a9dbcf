//! The seam between the GA engine and circuit scoring.
//!
//! [`Objective`] is what [`GaRunner`](super::GaRunner) maximizes. The
//! production implementation is [`FitnessEvaluator`]; tests and callers may
//! plug in their own.

use super::runner::GenerationStats;
use crate::error::Result;
use crate::fitness::FitnessEvaluator;

/// Scores valid circuit encodings. Higher performance is better.
///
/// # Thread Safety
///
/// `Objective` must be `Send + Sync` because the runner may score a
/// population in parallel using rayon, and batches share one objective
/// across concurrent runs.
pub trait Objective: Send + Sync {
    /// Returns the performance of a valid encoding.
    ///
    /// Errors abort the run; recoverable failures should be folded into a
    /// score by the implementation.
    fn performance(&self, encoding: &[usize]) -> Result<f64>;

    /// Called once per scored generation.
    ///
    /// The default implementation is a no-op.
    fn on_generation(&self, _stats: &GenerationStats) {}
}

impl Objective for FitnessEvaluator {
    fn performance(&self, encoding: &[usize]) -> Result<f64> {
        self.evaluate(encoding)
    }
}

impl<O: Objective + ?Sized> Objective for &O {
    fn performance(&self, encoding: &[usize]) -> Result<f64> {
        (**self).performance(encoding)
    }

    fn on_generation(&self, stats: &GenerationStats) {
        (**self).on_generation(stats)
    }
}
