//! Circuit graph built from the flat integer encoding.

use super::unit::Unit;
use crate::error::{CircuitError, Result};

/// Length of the encoding of a circuit with `num_units` units.
pub fn encoding_len(num_units: usize) -> usize {
    2 * num_units + 1
}

/// An index-based circuit: an arena of [`Unit`]s plus the feed entry.
///
/// The encoding `[entry, c0, t0, c1, t1, ...]` maps unit `i` to positions
/// `2i + 1` (concentrate) and `2i + 2` (tailings). Units refer to each other
/// only by index, so a graph is cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitGraph {
    entry: usize,
    units: Vec<Unit>,
}

impl CircuitGraph {
    /// Builds the graph for one encoding.
    ///
    /// # Errors
    /// - [`CircuitError::MalformedEncoding`] for an empty or even-length
    ///   encoding, or a feed entry that is not a unit id.
    /// - [`CircuitError::BadUnit`] for the first unit that self-recycles or
    ///   merges its outputs.
    pub fn from_encoding(encoding: &[usize]) -> Result<Self> {
        if encoding.len() < 3 || encoding.len() % 2 == 0 {
            return Err(CircuitError::malformed(format!(
                "expected 2n+1 entries with n >= 1, got {}",
                encoding.len()
            )));
        }
        let n = (encoding.len() - 1) / 2;
        let entry = encoding[0];
        if entry >= n {
            return Err(CircuitError::malformed(format!(
                "feed entry {entry} is not one of the {n} units"
            )));
        }

        let units = encoding[1..]
            .chunks_exact(2)
            .enumerate()
            .map(|(id, pair)| Unit::new(id, pair[0], pair[1]))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { entry, units })
    }

    /// Number of separation units (`n`).
    pub fn num_units(&self) -> usize {
        self.units.len()
    }

    /// Unit receiving the circuit feed.
    pub fn entry(&self) -> usize {
        self.entry
    }

    /// All units, indexed by id.
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// The unit with the given id.
    pub fn unit(&self, id: usize) -> &Unit {
        &self.units[id]
    }

    /// Index of the final concentrate collector (`n`).
    pub fn concentrate_sink(&self) -> usize {
        self.units.len()
    }

    /// Index of the final tailings collector (`n + 1`).
    pub fn tailings_sink(&self) -> usize {
        self.units.len() + 1
    }

    /// Whether `target` denotes a sink rather than a unit.
    pub fn is_sink(&self, target: usize) -> bool {
        target >= self.units.len()
    }

    /// Fails if any stream leaves for a sink other than the two collectors.
    pub fn ensure_two_sinks(&self) -> Result<()> {
        let limit = self.tailings_sink();
        match self
            .units
            .iter()
            .find(|u| u.conc() > limit || u.tails() > limit)
        {
            Some(u) => Err(CircuitError::malformed(format!(
                "unit {} routes to {:?}, beyond tailings sink {limit}",
                u.id(),
                u.targets()
            ))),
            None => Ok(()),
        }
    }

    /// Rebuilds the flat encoding.
    pub fn to_encoding(&self) -> Vec<usize> {
        let mut encoding = Vec::with_capacity(encoding_len(self.units.len()));
        encoding.push(self.entry);
        for unit in &self.units {
            encoding.extend_from_slice(&unit.targets());
        }
        encoding
    }

    pub(crate) fn add_predecessor(&mut self, target: usize, from: usize) {
        self.units[target].predecessors.push(from);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE_UNITS: [usize; 11] = [0, 4, 3, 2, 0, 5, 4, 4, 6, 2, 1];

    #[test]
    fn test_builds_units_from_pairs() {
        let graph = CircuitGraph::from_encoding(&FIVE_UNITS).unwrap();
        assert_eq!(graph.num_units(), 5);
        assert_eq!(graph.entry(), 0);
        assert_eq!(graph.unit(0).targets(), [4, 3]);
        assert_eq!(graph.unit(2).targets(), [5, 4]);
        assert_eq!(graph.unit(4).targets(), [2, 1]);
        assert_eq!(graph.concentrate_sink(), 5);
        assert_eq!(graph.tailings_sink(), 6);
        assert!(graph.is_sink(5));
        assert!(!graph.is_sink(4));
    }

    #[test]
    fn test_encoding_round_trip() {
        let graph = CircuitGraph::from_encoding(&FIVE_UNITS).unwrap();
        assert_eq!(graph.to_encoding(), FIVE_UNITS.to_vec());
        assert_eq!(encoding_len(5), FIVE_UNITS.len());
    }

    #[test]
    fn test_bad_unit_reported() {
        let err = CircuitGraph::from_encoding(&[0, 2, 2]).unwrap_err();
        assert!(matches!(err, CircuitError::BadUnit { id: 0, conc: 2, tails: 2 }));
    }

    #[test]
    fn test_malformed_lengths() {
        for enc in [&[][..], &[0][..], &[0, 1][..], &[0, 1, 2, 3][..]] {
            assert!(matches!(
                CircuitGraph::from_encoding(enc),
                Err(CircuitError::MalformedEncoding { .. })
            ));
        }
    }

    #[test]
    fn test_entry_must_be_unit() {
        assert!(matches!(
            CircuitGraph::from_encoding(&[1, 1, 2]),
            Err(CircuitError::MalformedEncoding { .. })
        ));
    }

    #[test]
    fn test_third_sink_detected() {
        let graph = CircuitGraph::from_encoding(&[0, 1, 2, 0, 7, 3, 0]).unwrap();
        assert!(graph.ensure_two_sinks().is_err());
        let graph = CircuitGraph::from_encoding(&FIVE_UNITS).unwrap();
        assert!(graph.ensure_two_sinks().is_ok());
    }
}
