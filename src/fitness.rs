//! Economic evaluation of circuits.
//!
//! Performance is the value of the mineral recovered in the final
//! concentrate minus the charge for the waste that reports with it. Circuits
//! that never reach steady state score the worst case: every unit of fed
//! waste charged at the disposal cost.

use tracing::trace;

use crate::error::{CircuitError, Result};
use crate::flow::{Feed, FlowSimulator, Flows, SimulatorConfig};

/// Prices applied to the final concentrate, per kg.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Economics {
    /// Income per kg of mineral in the concentrate.
    pub mineral_price: f64,
    /// Charge per kg of waste in the concentrate.
    pub waste_cost: f64,
}

impl Default for Economics {
    fn default() -> Self {
        Self {
            mineral_price: 100.0,
            waste_cost: 500.0,
        }
    }
}

impl Economics {
    pub fn new(mineral_price: f64, waste_cost: f64) -> Self {
        Self {
            mineral_price,
            waste_cost,
        }
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(self.mineral_price >= 0.0 && self.waste_cost >= 0.0) {
            return Err("prices must be non-negative".into());
        }
        Ok(())
    }
}

/// Performance and, when the circuit converged, its flows.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub performance: f64,
    pub flows: Option<Flows>,
}

/// Scores circuit encodings.
///
/// # Examples
///
/// ```
/// use u_separation::fitness::FitnessEvaluator;
///
/// let evaluator = FitnessEvaluator::default();
/// let performance = evaluator.evaluate(&[0, 4, 3, 2, 0, 5, 4, 4, 6, 2, 1]).unwrap();
/// assert!((performance - 24.8).abs() < 0.1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FitnessEvaluator {
    simulator: FlowSimulator,
    feed: Feed,
    economics: Economics,
}

impl FitnessEvaluator {
    pub fn new(simulator: FlowSimulator, feed: Feed, economics: Economics) -> Self {
        Self {
            simulator,
            feed,
            economics,
        }
    }

    /// Convenience constructor from a simulator configuration.
    pub fn with_config(config: SimulatorConfig, feed: Feed, economics: Economics) -> Self {
        Self::new(FlowSimulator::new(config), feed, economics)
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn economics(&self) -> &Economics {
        &self.economics
    }

    pub fn simulator(&self) -> &FlowSimulator {
        &self.simulator
    }

    /// Score given to circuits that do not reach steady state.
    pub fn penalty(&self) -> f64 {
        -(self.feed.waste * self.economics.waste_cost)
    }

    /// Performance of a converged circuit.
    pub fn performance_of(&self, flows: &Flows) -> f64 {
        flows.concentrate_mineral() * self.economics.mineral_price
            - flows.concentrate_waste() * self.economics.waste_cost
    }

    /// Returns the performance of `encoding`.
    ///
    /// Non-convergence is absorbed into [`penalty`](Self::penalty).
    ///
    /// # Errors
    /// Mass-conservation violations and encodings that are not circuits.
    pub fn evaluate(&self, encoding: &[usize]) -> Result<f64> {
        self.evaluate_detailed(encoding).map(|e| e.performance)
    }

    /// Like [`evaluate`](Self::evaluate), keeping the flows for reporting.
    pub fn evaluate_detailed(&self, encoding: &[usize]) -> Result<Evaluation> {
        match self.simulator.simulate(encoding, &self.feed) {
            Ok(flows) => Ok(Evaluation {
                performance: self.performance_of(&flows),
                flows: Some(flows),
            }),
            Err(CircuitError::ConvergenceFailure { iterations }) => {
                trace!(?encoding, iterations, "circuit did not converge, scoring penalty");
                Ok(Evaluation {
                    performance: self.penalty(),
                    flows: None,
                })
            }
            Err(err) => Err(err),
        }
    }
}
