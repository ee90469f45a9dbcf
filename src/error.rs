//! Error types for circuit construction, simulation and optimization.
//!
//! Validity outcomes are not errors: [`check`](crate::circuit::check) returns
//! a [`Validity`](crate::circuit::Validity) value. [`CircuitError`] covers the
//! conditions that stop an operation, split into the recoverable
//! [`ConvergenceFailure`](CircuitError::ConvergenceFailure) and the rest, which
//! must reach the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`CircuitError`].
pub type Result<T> = std::result::Result<T, CircuitError>;

/// Unified error type for all circuit operations.
#[derive(Error, Debug)]
pub enum CircuitError {
    // ============ Construction Errors ============
    /// A unit recycles into itself or routes both branches to one destination.
    #[error("Invalid separation unit {id}: concentrate -> {conc}, tailings -> {tails} (self-recycle or merged outputs)")]
    BadUnit { id: usize, conc: usize, tails: usize },

    /// The flat encoding does not describe a circuit.
    #[error("Malformed circuit encoding: {reason}")]
    MalformedEncoding { reason: String },

    // ============ Simulation Errors ============
    /// Successive substitution did not reach steady state.
    #[error("Flow simulation did not converge after {iterations} iterations")]
    ConvergenceFailure { iterations: usize },

    /// Mass entering the circuit does not match mass held plus mass exited.
    #[error("Mass continuity failed: expected {expected:.6} kg, accounted {actual:.6} kg (relative error {relative_error:.2e})")]
    MassConservation {
        expected: f64,
        actual: f64,
        relative_error: f64,
    },

    // ============ Optimization Errors ============
    /// A configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A population could not be filled with valid circuits.
    #[error("Gave up filling the population after {attempts} attempts ({accepted} valid circuits found)")]
    PopulationExhausted { attempts: usize, accepted: usize },

    // ============ I/O Errors ============
    /// Reading settings or writing a circuit report failed.
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CircuitError {
    /// Create a bad unit error
    pub fn bad_unit(id: usize, conc: usize, tails: usize) -> Self {
        Self::BadUnit { id, conc, tails }
    }

    /// Create a malformed encoding error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedEncoding {
            reason: reason.into(),
        }
    }

    /// Whether the caller may substitute a score and carry on.
    ///
    /// Only non-convergence qualifies. A mass-conservation violation is a
    /// broken invariant and must terminate the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ConvergenceFailure { .. })
    }
}
