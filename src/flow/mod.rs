//! Steady-state flow simulation.
//!
//! Every unit splits its mineral feed with fraction [`MINERAL_SPLIT`] and its
//! waste feed with fraction [`WASTE_SPLIT`] to the concentrate stream. The
//! [`FlowSimulator`] finds the steady state by successive substitution and
//! verifies overall mass continuity before returning [`Flows`].

mod config;
mod simulator;

pub use config::{Feed, SimulatorConfig};
pub use simulator::{FlowSimulator, Flows, MINERAL_SPLIT, WASTE_SPLIT};
