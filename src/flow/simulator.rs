//! Successive-substitution flow solver.

use tracing::warn;

use super::config::{Feed, SimulatorConfig};
use crate::circuit::CircuitGraph;
use crate::error::{CircuitError, Result};

/// Fraction of a unit's mineral feed reporting to its concentrate stream.
pub const MINERAL_SPLIT: f64 = 0.2;

/// Fraction of a unit's waste feed reporting to its concentrate stream.
pub const WASTE_SPLIT: f64 = 0.05;

/// Steady-state mass flow rates of a circuit, in kg/s.
///
/// Both vectors have `n + 2` slots: the feed rate into each unit, then the
/// rates arriving at the concentrate and tailings collectors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flows {
    pub mineral: Vec<f64>,
    pub waste: Vec<f64>,
    /// Substitution rounds run before the tolerance test passed.
    pub iterations: usize,
}

impl Flows {
    /// Number of separation units.
    pub fn num_units(&self) -> usize {
        self.mineral.len() - 2
    }

    /// Mineral reaching the concentrate collector.
    pub fn concentrate_mineral(&self) -> f64 {
        self.mineral[self.num_units()]
    }

    /// Waste reaching the concentrate collector.
    pub fn concentrate_waste(&self) -> f64 {
        self.waste[self.num_units()]
    }

    /// Mineral reaching the tailings collector.
    pub fn tailings_mineral(&self) -> f64 {
        self.mineral[self.num_units() + 1]
    }

    /// Waste reaching the tailings collector.
    pub fn tailings_waste(&self) -> f64 {
        self.waste[self.num_units() + 1]
    }

    /// Fraction of the fed mineral recovered in the concentrate.
    pub fn recovery(&self, feed: &Feed) -> f64 {
        if feed.mineral > 0.0 {
            self.concentrate_mineral() / feed.mineral
        } else {
            0.0
        }
    }

    /// Mineral mass fraction of the concentrate stream.
    pub fn grade(&self) -> f64 {
        let total = self.concentrate_mineral() + self.concentrate_waste();
        if total > 0.0 {
            self.concentrate_mineral() / total
        } else {
            0.0
        }
    }
}

/// Computes steady-state flows by fixed-point iteration.
///
/// Each round every unit pushes `MINERAL_SPLIT` / `WASTE_SPLIT` of its current
/// feed to its concentrate target and the rest to its tailings target, the
/// constant feed is added at the entry unit, and the collectors are drained.
/// The solver stops once no unit's feed of either material changes by more
/// than the configured relative tolerance.
///
/// # Examples
///
/// ```
/// use u_separation::flow::{Feed, FlowSimulator};
///
/// let flows = FlowSimulator::default()
///     .simulate(&[0, 1, 2, 3, 0, 0, 4], &Feed::default())
///     .unwrap();
/// assert!((flows.concentrate_mineral() - 0.59).abs() < 0.01);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FlowSimulator {
    config: SimulatorConfig,
}

impl FlowSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Simulates the circuit described by `encoding`.
    ///
    /// # Errors
    /// - [`CircuitError::BadUnit`] / [`CircuitError::MalformedEncoding`] if the
    ///   encoding does not describe a circuit.
    /// - [`CircuitError::InvalidConfig`] if the feed carries no mass or has a
    ///   negative rate.
    /// - [`CircuitError::ConvergenceFailure`] if steady state is not reached
    ///   within `max_iterations`.
    /// - [`CircuitError::MassConservation`] if the converged flows do not
    ///   account for the mass fed in.
    pub fn simulate(&self, encoding: &[usize], feed: &Feed) -> Result<Flows> {
        let graph = CircuitGraph::from_encoding(encoding)?;
        self.simulate_graph(&graph, feed)
    }

    /// Simulates an already built graph.
    pub fn simulate_graph(&self, graph: &CircuitGraph, feed: &Feed) -> Result<Flows> {
        graph.ensure_two_sinks()?;
        feed.validate().map_err(CircuitError::InvalidConfig)?;

        let n = graph.num_units();
        let entry = graph.entry();
        let (conc_sink, tails_sink) = (graph.concentrate_sink(), graph.tailings_sink());

        let mut mineral = vec![0.0; n + 2];
        let mut waste = vec![0.0; n + 2];
        mineral[entry] = feed.mineral;
        waste[entry] = feed.waste;
        let mut next_mineral = vec![0.0; n + 2];
        let mut next_waste = vec![0.0; n + 2];

        let mut exited = 0.0;
        let mut iterations = 0usize;

        let converged = loop {
            if iterations >= self.config.max_iterations {
                break false;
            }

            next_mineral.fill(0.0);
            next_waste.fill(0.0);
            for unit in graph.units() {
                let (m, w) = (mineral[unit.id()], waste[unit.id()]);
                next_mineral[unit.conc()] += m * MINERAL_SPLIT;
                next_waste[unit.conc()] += w * WASTE_SPLIT;
                next_mineral[unit.tails()] += m * (1.0 - MINERAL_SPLIT);
                next_waste[unit.tails()] += w * (1.0 - WASTE_SPLIT);
            }
            next_mineral[entry] += feed.mineral;
            next_waste[entry] += feed.waste;

            let unsteady = (0..n).any(|i| {
                relative_change(next_mineral[i], mineral[i]) > self.config.tolerance
                    || relative_change(next_waste[i], waste[i]) > self.config.tolerance
            });
            if !unsteady {
                break true;
            }

            std::mem::swap(&mut mineral, &mut next_mineral);
            std::mem::swap(&mut waste, &mut next_waste);
            // collectors do not recirculate
            for sink in [conc_sink, tails_sink] {
                exited += mineral[sink] + waste[sink];
                mineral[sink] = 0.0;
                waste[sink] = 0.0;
            }
            iterations += 1;
        };

        if !converged {
            return Err(CircuitError::ConvergenceFailure { iterations });
        }

        let held: f64 = next_mineral[..n].iter().chain(&next_waste[..n]).sum();
        let actual = exited + held;
        let expected = (iterations + 1) as f64 * feed.total();
        let relative_error = (actual - expected).abs() / expected;
        if !(relative_error <= self.config.mass_tolerance) {
            warn!(
                encoding = ?graph.to_encoding(),
                expected,
                actual,
                relative_error,
                "mass continuity violated"
            );
            return Err(CircuitError::MassConservation {
                expected,
                actual,
                relative_error,
            });
        }

        Ok(Flows {
            mineral: next_mineral,
            waste: next_waste,
            iterations,
        })
    }
}

/// Relative change from `previous` to `current`.
///
/// A slot that was empty and is still empty has not changed; one that was
/// empty and now carries mass has changed without bound.
fn relative_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        if current == 0.0 {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        (current - previous).abs() / previous.abs()
    }
}
