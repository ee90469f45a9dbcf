//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the complete evolutionary process:
//! initialization → scoring → selection → crossover → mutation → validity
//! filter → repeat.

use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info};

use super::config::GaConfig;
use super::operators::{adaptive_rate, mutate, prefix_crossover, random_circuit};
use super::selection::RouletteWheel;
use super::types::Objective;
use crate::circuit::check;
use crate::error::{CircuitError, Result};
use crate::random::create_rng;

/// Candidate draws allowed per population slot before giving up.
const ATTEMPTS_PER_SLOT: usize = 10_000;

/// Result of a GA optimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct GaResult {
    /// The best circuit scored during the entire run.
    pub best: Vec<usize>,

    /// Performance of `best`.
    pub best_performance: f64,

    /// Generation (0-based) in which `best` was first scored.
    pub best_generation: usize,

    /// Number of generations scored.
    pub generations: usize,

    /// Whether the run was terminated due to stagnation.
    pub stagnated: bool,

    /// Best performance of each scored generation.
    pub performance_history: Vec<f64>,
}

/// Summary of one scored generation, passed to
/// [`Objective::on_generation`].
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStats {
    /// 0-based generation index.
    pub generation: usize,
    /// Best performance in this generation.
    pub best_performance: f64,
    /// Mean performance in this generation.
    pub mean_performance: f64,
    /// Best performance seen so far in the run.
    pub best_so_far: f64,
    /// Current stagnation counter.
    pub stagnation: usize,
    /// Individuals copied unchanged from the previous generation by elitism.
    pub elites: usize,
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```
/// use u_separation::fitness::FitnessEvaluator;
/// use u_separation::ga::{GaConfig, GaRunner};
///
/// let config = GaConfig::default()
///     .with_num_units(3)
///     .with_population_size(10)
///     .with_max_generations(5)
///     .with_seed(42);
/// let result = GaRunner::run(&FitnessEvaluator::default(), &config).unwrap();
/// assert_eq!(result.best.len(), 7);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA optimization.
    ///
    /// # Errors
    /// - [`CircuitError::InvalidConfig`] if `config` fails validation
    /// - [`CircuitError::PopulationExhausted`] if valid circuits cannot be
    ///   found within the attempt budget
    /// - any error returned by the objective, such as a mass-conservation
    ///   violation
    pub fn run<O: Objective>(objective: &O, config: &GaConfig) -> Result<GaResult> {
        config.validate().map_err(CircuitError::InvalidConfig)?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = create_rng(seed);
        let n = config.num_units;
        let window = config.prematurity_generations();
        let rates = config.rates;

        // 1. Initialize population
        let mut population = initial_population(n, config.population_size, &mut rng)?;

        let mut best: Vec<usize> = Vec::new();
        let mut best_performance = f64::NEG_INFINITY;
        let mut best_generation = 0;
        let mut performance_history = Vec::with_capacity(config.max_generations);

        let mut previous_best = 0.0;
        let mut stagnation = 1usize;
        let mut stagnated = false;
        let mut elites = 0usize;

        for gen in 0..config.max_generations {
            // 2. Score
            let performance = score_population(objective, &population, config.parallel)?;
            let fitness = offset_fitness(&performance, config.fitness_offset);

            let gen_best = argmax(&performance);
            let gen_best_performance = performance[gen_best];
            if gen_best_performance > best_performance {
                best_performance = gen_best_performance;
                best = population[gen_best].clone();
                best_generation = gen;
            }
            performance_history.push(gen_best_performance);

            // 3. Convergence bookkeeping
            if (gen_best_performance - previous_best).abs() <= config.convergence_tolerance {
                stagnation += 1;
            } else {
                stagnation = 1;
            }
            previous_best = gen_best_performance;

            let stats = GenerationStats {
                generation: gen,
                best_performance: gen_best_performance,
                mean_performance: mean(&performance),
                best_so_far: best_performance,
                stagnation,
                elites,
            };
            debug!(
                generation = gen,
                best = stats.best_performance,
                mean = stats.mean_performance,
                stagnation,
                elites,
                "generation scored"
            );
            objective.on_generation(&stats);

            if config.stagnation_limit > 0 && stagnation >= config.stagnation_limit {
                stagnated = true;
                break;
            }
            if gen + 1 == config.max_generations {
                break;
            }

            // 4. Breed the next generation
            let mut next_gen: Vec<Vec<usize>> = Vec::with_capacity(config.population_size);
            elites = 0;
            if gen >= window {
                next_gen.push(population[gen_best].clone());
                elites = 1;
            }

            let wheel = RouletteWheel::new(&fitness);
            let fmax = fitness[gen_best];
            let favg = mean(&fitness);
            let budget = config.population_size * ATTEMPTS_PER_SLOT;
            let mut attempts = 0usize;
            let mut rejected = 0usize;

            while next_gen.len() < config.population_size {
                let (i, j) = wheel.select_pair(&mut rng);

                let f_pair = fitness[i].max(fitness[j]);
                let pc = adaptive_rate(rates.k1, rates.k3, f_pair, fmax, favg);
                let (c1, c2) = if rng.random::<f64>() < pc {
                    prefix_crossover(&population[i], &population[j], &mut rng)
                } else {
                    (population[i].clone(), population[j].clone())
                };

                for mut child in [c1, c2] {
                    if next_gen.len() >= config.population_size {
                        break;
                    }
                    attempts += 1;
                    if attempts > budget {
                        return Err(CircuitError::PopulationExhausted {
                            attempts: budget,
                            accepted: next_gen.len(),
                        });
                    }

                    let f_self = child_fitness(
                        objective,
                        &child,
                        [(&population[i], fitness[i]), (&population[j], fitness[j])],
                        config.fitness_offset,
                    )?;
                    let pm = adaptive_rate(rates.k2, rates.k4, f_self, fmax, favg);
                    mutate(&mut child, pm, n, &mut rng);

                    if check(&child).is_valid() {
                        next_gen.push(child);
                    } else {
                        rejected += 1;
                    }
                }
            }
            debug!(generation = gen, rejected, "offspring bred");

            population = next_gen;
        }

        let generations = performance_history.len();
        info!(
            generations,
            best = best_performance,
            best_generation,
            reason = if stagnated { "stagnation" } else { "generation cap" },
            "GA finished"
        );

        Ok(GaResult {
            best,
            best_performance,
            best_generation,
            generations,
            stagnated,
            performance_history,
        })
    }
}

/// Draws `size` valid circuits of `num_units` units.
pub(crate) fn initial_population<R: Rng>(
    num_units: usize,
    size: usize,
    rng: &mut R,
) -> Result<Vec<Vec<usize>>> {
    let budget = size * ATTEMPTS_PER_SLOT;
    let mut population = Vec::with_capacity(size);
    let mut attempts = 0usize;

    while population.len() < size {
        if attempts == budget {
            return Err(CircuitError::PopulationExhausted {
                attempts,
                accepted: population.len(),
            });
        }
        attempts += 1;
        let candidate = random_circuit(num_units, rng);
        if check(&candidate).is_valid() {
            population.push(candidate);
        }
    }

    debug!(num_units, size, attempts, "initial population ready");
    Ok(population)
}

/// Shifts performance by `offset` so that selection weights are positive.
pub(crate) fn offset_fitness(performance: &[f64], offset: f64) -> Vec<f64> {
    performance.iter().map(|p| p + offset).collect()
}

/// Fitness of a child before mutation.
///
/// Copies of a parent reuse its fitness. Invalid children get `-inf`, so
/// they mutate at the below-average rate without being simulated.
fn child_fitness<O: Objective>(
    objective: &O,
    child: &[usize],
    parents: [(&Vec<usize>, f64); 2],
    offset: f64,
) -> Result<f64> {
    if let Some(&(_, f)) = parents.iter().find(|(p, _)| p.as_slice() == child) {
        return Ok(f);
    }
    if !check(child).is_valid() {
        return Ok(f64::NEG_INFINITY);
    }
    Ok(objective.performance(child)? + offset)
}

/// Scores every individual of the population.
fn score_population<O: Objective>(
    objective: &O,
    population: &[Vec<usize>],
    parallel: bool,
) -> Result<Vec<f64>> {
    #[cfg(feature = "parallel")]
    if parallel {
        return population
            .par_iter()
            .map(|c| objective.performance(c))
            .collect();
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    population.iter().map(|c| objective.performance(c)).collect()
}

/// Index of the largest value; the first one on ties.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// ============================================================================
// Tests
// ============================================================================
