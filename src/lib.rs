//! Mineral separation circuit optimization.
//!
//! A circuit routes a two-material feed (valuable mineral and waste) through
//! `n` identical separation units, each splitting its input into a
//! concentrate and a tailings stream. This crate searches the space of
//! circuit topologies for the one with the best economic performance:
//!
//! - **Circuits** ([`circuit`]): flat integer encodings, the unit graph
//!   built from them, and the forward + reverse BFS validity check.
//! - **Flow simulation** ([`flow`]): steady-state mass balance by successive
//!   substitution, with a mass-continuity check on the result.
//! - **Fitness** ([`fitness`]): concentrate value minus waste charge, with a
//!   fixed penalty for circuits that never settle.
//! - **Genetic Algorithm** ([`ga`]): roulette selection with adaptive
//!   crossover and mutation, delayed elitism and stagnation detection.
//! - **Reports** ([`report`]): the fixed text layout used to persist a
//!   circuit and its flows.
//!
//! # Example
//!
//! ```
//! use u_separation::circuit::{check, Validity};
//! use u_separation::fitness::FitnessEvaluator;
//!
//! let circuit = [0, 4, 3, 2, 0, 5, 4, 4, 6, 2, 1];
//! assert_eq!(check(&circuit), Validity::Valid);
//!
//! let performance = FitnessEvaluator::default().evaluate(&circuit).unwrap();
//! assert!(performance > 0.0);
//! ```

pub mod circuit;
pub mod error;
pub mod fitness;
pub mod flow;
pub mod ga;
pub mod random;
pub mod report;
#[cfg(feature = "cli")]
pub mod settings;

pub use error::{CircuitError, Result};
