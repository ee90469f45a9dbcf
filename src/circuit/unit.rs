//! A single separation unit.

use crate::error::{CircuitError, Result};

/// One separation stage of a circuit.
///
/// Splits its feed into a concentrate stream and a tailings stream. Targets
/// are plain indices: a value below the circuit's unit count names another
/// unit, `n` and `n + 1` name the concentrate and tailings sinks.
///
/// `predecessors` holds the ids of the units whose concentrate or tailings
/// stream feeds this unit. It is filled by the forward traversal of
/// [`check`](super::check) and may contain duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    id: usize,
    conc: usize,
    tails: usize,
    pub(crate) predecessors: Vec<usize>,
}

impl Unit {
    /// Creates a unit, rejecting self-recycles and merged outputs.
    ///
    /// # Errors
    /// [`CircuitError::BadUnit`] if `conc == id`, `tails == id` or `conc == tails`.
    pub fn new(id: usize, conc: usize, tails: usize) -> Result<Self> {
        if conc == id || tails == id || conc == tails {
            return Err(CircuitError::bad_unit(id, conc, tails));
        }
        Ok(Self {
            id,
            conc,
            tails,
            predecessors: Vec::new(),
        })
    }

    /// Index of this unit within its circuit.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Destination of the concentrate stream.
    pub fn conc(&self) -> usize {
        self.conc
    }

    /// Destination of the tailings stream.
    pub fn tails(&self) -> usize {
        self.tails
    }

    /// Both destinations, concentrate first.
    pub fn targets(&self) -> [usize; 2] {
        [self.conc, self.tails]
    }

    /// Units recorded as feeding this one.
    pub fn predecessors(&self) -> &[usize] {
        &self.predecessors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_valid_unit() {
        let unit = Unit::new(2, 5, 0).unwrap();
        assert_eq!(unit.id(), 2);
        assert_eq!(unit.conc(), 5);
        assert_eq!(unit.tails(), 0);
        assert_eq!(unit.targets(), [5, 0]);
        assert!(unit.predecessors().is_empty());
    }

    #[test]
    fn test_self_recycle_rejected() {
        assert!(matches!(
            Unit::new(1, 1, 3),
            Err(CircuitError::BadUnit { id: 1, conc: 1, tails: 3 })
        ));
        assert!(matches!(Unit::new(1, 3, 1), Err(CircuitError::BadUnit { .. })));
    }

    #[test]
    fn test_merged_outputs_rejected() {
        assert!(matches!(Unit::new(0, 2, 2), Err(CircuitError::BadUnit { .. })));
    }

    proptest! {
        #[test]
        fn prop_unit_invariant(id in 0usize..8, conc in 0usize..10, tails in 0usize..10) {
            let bad = conc == id || tails == id || conc == tails;
            prop_assert_eq!(Unit::new(id, conc, tails).is_err(), bad);
        }
    }
}
