//! Flow simulator configuration.

/// Numerical settings for [`FlowSimulator`](super::FlowSimulator).
///
/// # Examples
///
/// ```
/// use u_separation::flow::SimulatorConfig;
///
/// let config = SimulatorConfig::default()
///     .with_tolerance(1e-6)
///     .with_max_iterations(300);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulatorConfig {
    /// Largest relative change of any unit feed, per material, at which the
    /// circuit counts as steady.
    pub tolerance: f64,

    /// Iterations allowed before reporting non-convergence.
    pub max_iterations: usize,

    /// Relative tolerance of the final mass balance.
    pub mass_tolerance: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-4,
            max_iterations: 1000,
            mass_tolerance: 1e-4,
        }
    }
}

impl SimulatorConfig {
    /// Sets the steady-state tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the mass balance tolerance.
    pub fn with_mass_tolerance(mut self, mass_tolerance: f64) -> Self {
        self.mass_tolerance = mass_tolerance;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.tolerance > 0.0) {
            return Err("tolerance must be positive".into());
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".into());
        }
        if !(self.mass_tolerance > 0.0) {
            return Err("mass_tolerance must be positive".into());
        }
        Ok(())
    }
}

/// Constant feed into the circuit entry unit, in kg/s.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Feed {
    /// Valuable mineral.
    pub mineral: f64,
    /// Waste (gangue).
    pub waste: f64,
}

impl Default for Feed {
    fn default() -> Self {
        Self {
            mineral: 10.0,
            waste: 100.0,
        }
    }
}

impl Feed {
    pub fn new(mineral: f64, waste: f64) -> Self {
        Self { mineral, waste }
    }

    /// Combined mass rate of both materials.
    pub fn total(&self) -> f64 {
        self.mineral + self.waste
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.mineral >= 0.0 && self.waste >= 0.0) {
            return Err("feed rates must be non-negative".into());
        }
        if !(self.total() > 0.0) {
            return Err("feed must carry some mass".into());
        }
        Ok(())
    }
}
