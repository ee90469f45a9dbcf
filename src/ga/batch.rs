//! Independent multi-run coordination.
//!
//! A batch repeats the same GA configuration with derived seeds and keeps
//! the globally best circuit. Runs share nothing but the objective, so they
//! are spread across rayon workers when `parallel` is set.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::info;

use super::config::GaConfig;
use super::runner::{GaResult, GaRunner};
use super::types::Objective;
use crate::error::{CircuitError, Result};
use crate::random::derive_seed;

/// Outcome of a batch of GA runs.
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Every run, in run order.
    pub runs: Vec<GaResult>,
    /// Index into `runs` of the best final performance.
    pub best_run: usize,
}

impl BatchResult {
    /// The run holding the globally best circuit.
    pub fn best(&self) -> &GaResult {
        &self.runs[self.best_run]
    }
}

/// Runs the GA several times with independent seeds.
pub struct BatchRunner;

impl BatchRunner {
    /// Executes `runs` GA runs.
    ///
    /// Run `i` uses seed `derive_seed(base, i)`, where `base` is
    /// `config.seed` or a fresh random value. With `config.parallel` the runs
    /// are spread across threads and each run scores its population
    /// sequentially.
    ///
    /// # Errors
    /// [`CircuitError::InvalidConfig`] for zero runs; otherwise the first
    /// error of any run aborts the batch.
    pub fn run<O: Objective>(objective: &O, config: &GaConfig, runs: usize) -> Result<BatchResult> {
        if runs == 0 {
            return Err(CircuitError::InvalidConfig("runs must be at least 1".into()));
        }
        config.validate().map_err(CircuitError::InvalidConfig)?;

        let base = config.seed.unwrap_or_else(rand::random);
        let single = |i: usize| -> Result<GaResult> {
            let run_config = GaConfig {
                seed: Some(derive_seed(base, i)),
                parallel: false,
                ..config.clone()
            };
            let result = GaRunner::run(objective, &run_config)?;
            info!(
                run = i,
                best = result.best_performance,
                generations = result.generations,
                "run finished"
            );
            Ok(result)
        };

        let results = if config.parallel {
            run_all(runs, single)
        } else {
            (0..runs).map(single).collect()
        };
        let runs = results?;

        let mut best_run = 0;
        for (i, r) in runs.iter().enumerate().skip(1) {
            if r.best_performance > runs[best_run].best_performance {
                best_run = i;
            }
        }
        info!(
            runs = runs.len(),
            best_run,
            best = runs[best_run].best_performance,
            "batch finished"
        );

        Ok(BatchResult { runs, best_run })
    }
}

#[cfg(feature = "parallel")]
fn run_all<F>(runs: usize, f: F) -> Result<Vec<GaResult>>
where
    F: Fn(usize) -> Result<GaResult> + Sync + Send,
{
    (0..runs).into_par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
fn run_all<F>(runs: usize, f: F) -> Result<Vec<GaResult>>
where
    F: Fn(usize) -> Result<GaResult>,
{
    (0..runs).map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::check;
    use crate::fitness::FitnessEvaluator;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scores like the default evaluator until `limit` circuits have been
    /// scored, then reports a mass-balance failure.
    struct FailsAfter {
        limit: usize,
        calls: AtomicUsize,
    }

    impl FailsAfter {
        fn new(limit: usize) -> Self {
            Self {
                limit,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Objective for FailsAfter {
        fn performance(&self, encoding: &[usize]) -> Result<f64> {
            if self.calls.fetch_add(1, Ordering::Relaxed) >= self.limit {
                return Err(CircuitError::MassConservation {
                    expected: 110.0,
                    actual: 100.0,
                    relative_error: 0.1,
                });
            }
            FitnessEvaluator::default().evaluate(encoding)
        }
    }

    fn config() -> GaConfig {
        GaConfig::default()
            .with_num_units(3)
            .with_population_size(12)
            .with_max_generations(15)
            .with_stagnation_limit(0)
            .with_seed(7)
    }

    #[test]
    fn test_batch_picks_best_run() {
        let evaluator = FitnessEvaluator::default();
        let batch = BatchRunner::run(&evaluator, &config().with_parallel(false), 4).unwrap();

        assert_eq!(batch.runs.len(), 4);
        let max = batch
            .runs
            .iter()
            .map(|r| r.best_performance)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(batch.best().best_performance, max);
        assert!(check(&batch.best().best).is_valid());
    }

    #[test]
    fn test_runs_use_derived_seeds() {
        let evaluator = FitnessEvaluator::default();
        let batch = BatchRunner::run(&evaluator, &config().with_parallel(false), 3).unwrap();

        let second = GaRunner::run(
            &evaluator,
            &config().with_parallel(false).with_seed(derive_seed(7, 1)),
        )
        .unwrap();
        assert_eq!(batch.runs[1], second);
    }

    #[test]
    fn test_parallel_batch_matches_sequential() {
        let evaluator = FitnessEvaluator::default();
        let sequential = BatchRunner::run(&evaluator, &config().with_parallel(false), 3).unwrap();
        let parallel = BatchRunner::run(&evaluator, &config().with_parallel(true), 3).unwrap();
        assert_eq!(sequential.runs, parallel.runs);
        assert_eq!(sequential.best_run, parallel.best_run);
    }

    #[test]
    fn test_fatal_error_aborts_sequential_batch() {
        for limit in [0, 400] {
            let objective = FailsAfter::new(limit);
            let err = BatchRunner::run(&objective, &config().with_parallel(false), 4).unwrap_err();
            assert!(matches!(err, CircuitError::MassConservation { .. }), "limit {limit}");
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_fatal_error_aborts_parallel_batch() {
        for limit in [0, 400] {
            let objective = FailsAfter::new(limit);
            let err = BatchRunner::run(&objective, &config().with_parallel(true), 4).unwrap_err();
            assert!(matches!(err, CircuitError::MassConservation { .. }), "limit {limit}");
        }
    }

    #[test]
    fn test_zero_runs_rejected() {
        let err = BatchRunner::run(&FitnessEvaluator::default(), &config(), 0).unwrap_err();
        assert!(matches!(err, CircuitError::InvalidConfig(_)));
    }
}
