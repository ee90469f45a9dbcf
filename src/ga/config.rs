//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop;
//! [`AdaptiveRates`] holds the coefficients of the adaptive crossover and
//! mutation probabilities.

/// Coefficients of the adaptive crossover and mutation probabilities.
///
/// For an individual (or parent pair) with fitness `f`, generation maximum
/// `fmax` and average `favg`:
///
/// - `pc = k1 * (fmax - f) / (fmax - favg)` if `f >= favg`, else `k3`
/// - `pm = k2 * (fmax - f) / (fmax - favg)` if `f >= favg`, else `k4`
///
/// Above-average individuals are disrupted less the closer they are to the
/// best; below-average ones are always recombined at the base rates.
///
/// Reference: Srinivas & Patnaik (1994), "Adaptive Probabilities of Crossover
/// and Mutation in Genetic Algorithms"
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AdaptiveRates {
    /// Crossover scale for above-average pairs.
    pub k1: f64,
    /// Mutation scale for above-average children.
    pub k2: f64,
    /// Crossover probability for below-average pairs.
    pub k3: f64,
    /// Mutation probability per gene for below-average children.
    pub k4: f64,
}

impl Default for AdaptiveRates {
    fn default() -> Self {
        Self {
            k1: 1.0,
            k2: 0.5,
            k3: 1.0,
            k4: 0.5,
        }
    }
}

impl AdaptiveRates {
    /// Creates rates, clamping each coefficient into `[0, 1]`.
    pub fn new(k1: f64, k2: f64, k3: f64, k4: f64) -> Self {
        Self {
            k1: k1.clamp(0.0, 1.0),
            k2: k2.clamp(0.0, 1.0),
            k3: k3.clamp(0.0, 1.0),
            k4: k4.clamp(0.0, 1.0),
        }
    }

    /// Validates that every coefficient is a probability.
    pub fn validate(&self) -> Result<(), String> {
        for (name, k) in [("k1", self.k1), ("k2", self.k2), ("k3", self.k3), ("k4", self.k4)] {
            if !(0.0..=1.0).contains(&k) {
                return Err(format!("{name} must be in [0, 1], got {k}"));
            }
        }
        Ok(())
    }
}

/// Configuration for the circuit Genetic Algorithm.
///
/// # Defaults
///
/// ```
/// use u_separation::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 200);
/// assert_eq!(config.num_units, 10);
/// assert_eq!(config.prematurity_generations(), 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_separation::ga::{AdaptiveRates, GaConfig};
///
/// let config = GaConfig::default()
///     .with_num_units(5)
///     .with_population_size(50)
///     .with_max_generations(200)
///     .with_rates(AdaptiveRates::new(0.9, 0.3, 0.9, 0.3))
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GaConfig {
    /// Number of circuits in every generation.
    pub population_size: usize,

    /// Maximum number of generations before termination.
    pub max_generations: usize,

    /// Number of separation units in each circuit.
    pub num_units: usize,

    /// Consecutive generations with an unchanged best performance that stop
    /// the run.
    ///
    /// Set to 0 to disable stagnation-based termination.
    pub stagnation_limit: usize,

    /// Largest change of the best performance still counted as unchanged.
    pub convergence_tolerance: f64,

    /// Offset added to performance to obtain non-negative roulette weights.
    ///
    /// Must exceed the magnitude of the worst expected performance.
    pub fitness_offset: f64,

    /// Adaptive crossover/mutation coefficients.
    pub rates: AdaptiveRates,

    /// Generations during which elitism is suppressed.
    ///
    /// `None` uses `min(300, max_generations / 100)`.
    pub prematurity_window: Option<usize>,

    /// Whether to score the population in parallel using rayon.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` draws a fresh seed per run.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 200,
            max_generations: 10_000,
            num_units: 10,
            stagnation_limit: 300,
            convergence_tolerance: 0.1,
            fitness_offset: 50_000.0,
            rates: AdaptiveRates::default(),
            prematurity_window: None,
            parallel: true,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the number of units per circuit.
    pub fn with_num_units(mut self, n: usize) -> Self {
        self.num_units = n;
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the convergence tolerance on the best performance.
    pub fn with_convergence_tolerance(mut self, tolerance: f64) -> Self {
        self.convergence_tolerance = tolerance.max(0.0);
        self
    }

    /// Sets the fitness offset.
    pub fn with_fitness_offset(mut self, offset: f64) -> Self {
        self.fitness_offset = offset;
        self
    }

    /// Sets the adaptive rate coefficients.
    pub fn with_rates(mut self, rates: AdaptiveRates) -> Self {
        self.rates = rates;
        self
    }

    /// Sets an explicit prematurity window.
    pub fn with_prematurity_window(mut self, generations: usize) -> Self {
        self.prematurity_window = Some(generations);
        self
    }

    /// Enables or disables parallel scoring.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Generations at the start of a run during which the best circuit is
    /// not carried over.
    pub fn prematurity_generations(&self) -> usize {
        self.prematurity_window
            .unwrap_or_else(|| (self.max_generations / 100).min(300))
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 2 {
            return Err("population_size must be at least 2".into());
        }
        if self.max_generations == 0 {
            return Err("max_generations must be at least 1".into());
        }
        if self.num_units == 0 {
            return Err("num_units must be at least 1".into());
        }
        if !(self.fitness_offset > 0.0) || !self.fitness_offset.is_finite() {
            return Err("fitness_offset must be positive and finite".into());
        }
        if !(self.convergence_tolerance >= 0.0) {
            return Err("convergence_tolerance must be non-negative".into());
        }
        self.rates.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 200);
        assert_eq!(config.max_generations, 10_000);
        assert_eq!(config.num_units, 10);
        assert_eq!(config.stagnation_limit, 300);
        assert!((config.convergence_tolerance - 0.1).abs() < 1e-15);
        assert!((config.fitness_offset - 50_000.0).abs() < 1e-9);
        assert_eq!(config.rates, AdaptiveRates::new(1.0, 0.5, 1.0, 0.5));
        assert!(config.parallel);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::default()
            .with_population_size(30)
            .with_max_generations(400)
            .with_num_units(6)
            .with_stagnation_limit(25)
            .with_convergence_tolerance(0.5)
            .with_fitness_offset(1e4)
            .with_prematurity_window(3)
            .with_parallel(false)
            .with_seed(42);

        assert_eq!(config.population_size, 30);
        assert_eq!(config.max_generations, 400);
        assert_eq!(config.num_units, 6);
        assert_eq!(config.stagnation_limit, 25);
        assert!((config.convergence_tolerance - 0.5).abs() < 1e-15);
        assert!((config.fitness_offset - 1e4).abs() < 1e-9);
        assert_eq!(config.prematurity_generations(), 3);
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_prematurity_window_formula() {
        assert_eq!(GaConfig::default().with_max_generations(50).prematurity_generations(), 0);
        assert_eq!(GaConfig::default().with_max_generations(5_000).prematurity_generations(), 50);
        assert_eq!(GaConfig::default().with_max_generations(100_000).prematurity_generations(), 300);
    }

    #[test]
    fn test_validate_population_too_small() {
        assert!(GaConfig::default().with_population_size(1).validate().is_err());
    }

    #[test]
    fn test_validate_zero_generations() {
        assert!(GaConfig::default().with_max_generations(0).validate().is_err());
    }

    #[test]
    fn test_validate_zero_units() {
        assert!(GaConfig::default().with_num_units(0).validate().is_err());
    }

    #[test]
    fn test_validate_offset() {
        assert!(GaConfig::default().with_fitness_offset(0.0).validate().is_err());
        assert!(GaConfig::default().with_fitness_offset(f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_rates_clamped() {
        let rates = AdaptiveRates::new(1.5, -0.5, 0.3, 2.0);
        assert_eq!(rates, AdaptiveRates { k1: 1.0, k2: 0.0, k3: 0.3, k4: 1.0 });
        assert!(rates.validate().is_ok());
    }

    #[test]
    fn test_unclamped_rates_rejected() {
        let config = GaConfig::default().with_rates(AdaptiveRates {
            k1: 1.2,
            ..AdaptiveRates::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_tolerance_clamped() {
        let config = GaConfig::default().with_convergence_tolerance(-1.0);
        assert_eq!(config.convergence_tolerance, 0.0);
    }
}
