//! Circuit representation and validity checking.
//!
//! A circuit of `n` separation units is encoded as `2n + 1` integers:
//! the feed entry unit, then the concentrate and tailings targets of each
//! unit in order. Targets `n` and `n + 1` are the final concentrate and
//! tailings collectors.
//!
//! - [`Unit`]: one separation stage; construction rejects malformed units
//! - [`CircuitGraph`]: the unit arena built from an encoding
//! - [`check`]: forward + reverse BFS validity test returning [`Validity`]

mod graph;
mod unit;
mod validity;

pub use graph::{encoding_len, CircuitGraph};
pub use unit::Unit;
pub use validity::{check, check_parallel, Validity};
