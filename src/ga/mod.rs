//! Adaptive Genetic Algorithm over circuit encodings.
//!
//! The engine maximizes an [`Objective`] over valid circuits of a fixed
//! number of units. Every generation is scored, turned into non-negative
//! fitness by a constant offset, and bred by roulette selection, adaptive
//! single-point crossover and adaptive per-gene mutation. Only children that
//! pass the validity check join the next generation.
//!
//! # Core Traits
//!
//! - [`Objective`]: Scores an encoding; implemented by
//!   [`FitnessEvaluator`](crate::fitness::FitnessEvaluator)
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population, rates, termination)
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`GaResult`]: Best circuit and per-generation history
//! - [`BatchRunner`]: Independent runs with derived seeds
//!
//! # Submodules
//!
//! - [`operators`]: Circuit initialization, crossover, mutation and the
//!   adaptive rate formula
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Srinivas & Patnaik (1994), "Adaptive Probabilities of Crossover and
//!   Mutation in Genetic Algorithms"

mod batch;
mod config;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use batch::{BatchResult, BatchRunner};
pub use config::{AdaptiveRates, GaConfig};
pub use runner::{GaResult, GaRunner, GenerationStats};
pub use selection::RouletteWheel;
pub use types::Objective;
