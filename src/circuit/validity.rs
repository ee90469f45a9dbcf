//! Circuit validity checking.
//!
//! A circuit is valid when every unit is well formed, every unit is reachable
//! from the feed, exactly the two collectors are reached, and every unit can
//! forward-reach both collectors.
//!
//! # Algorithm
//!
//! 1. **Forward pass**: BFS from the feed entry. Records each unit's
//!    predecessors and the units feeding each collector.
//! 2. **Reverse pass**: one BFS per collector over predecessor edges. Both
//!    must reach all `n` units.
//!
//! Visitation uses generation-stamped marks: a [`VisitMarks`] buffer is
//! allocated once and a new round is started by bumping its stamp, so a
//! sequential check reuses one buffer across all three traversals. The
//! parallel variant gives each reverse traversal its own buffer and shares
//! the graph read-only.
//!
//! # References
//!
//! - Baidari & Hanagawadimath (2014), "Traversing directed cyclic and acyclic
//!   graphs using modified BFS algorithm"

use std::collections::VecDeque;

use super::graph::CircuitGraph;
use crate::error::CircuitError;

/// Outcome of a validity check.
///
/// Invalid circuits are an ordinary outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Validity {
    /// Well formed and fully connected to both collectors.
    Valid,
    /// Disconnected, or missing forward/backward reachability of a collector.
    InvalidTopology,
    /// A unit self-recycles or routes both streams to one destination.
    InvalidUnit,
}

impl Validity {
    /// Numeric status: 0 valid, 1 invalid topology, 2 invalid unit.
    pub fn code(self) -> u8 {
        match self {
            Validity::Valid => 0,
            Validity::InvalidTopology => 1,
            Validity::InvalidUnit => 2,
        }
    }

    pub fn is_valid(self) -> bool {
        self == Validity::Valid
    }
}

/// Checks whether `encoding` describes a valid circuit.
///
/// Runs the forward pass and both reverse passes on the calling thread.
pub fn check(encoding: &[usize]) -> Validity {
    let mut graph = match build(encoding) {
        Ok(graph) => graph,
        Err(outcome) => return outcome,
    };
    let mut marks = VisitMarks::new(graph.num_units());
    let roots = match forward_pass(&mut graph, &mut marks) {
        Ok(roots) => roots,
        Err(outcome) => return outcome,
    };
    let n = graph.num_units();
    let all_reached = roots
        .iter()
        .all(|root| reverse_reach(&graph, root, &mut marks) == n);
    verdict(all_reached)
}

/// Like [`check`], but runs the two reverse passes as parallel tasks.
///
/// Each task owns its visitation marks; the graph is shared immutably.
#[cfg(feature = "parallel")]
pub fn check_parallel(encoding: &[usize]) -> Validity {
    let mut graph = match build(encoding) {
        Ok(graph) => graph,
        Err(outcome) => return outcome,
    };
    let n = graph.num_units();
    let mut marks = VisitMarks::new(n);
    let [concentrate, tailings] = match forward_pass(&mut graph, &mut marks) {
        Ok(roots) => roots,
        Err(outcome) => return outcome,
    };
    let graph = &graph;
    let (a, b) = rayon::join(
        || reverse_reach(graph, &concentrate, &mut VisitMarks::new(n)),
        || reverse_reach(graph, &tailings, &mut VisitMarks::new(n)),
    );
    verdict(a == n && b == n)
}

/// Sequential fallback when rayon is not compiled in.
#[cfg(not(feature = "parallel"))]
pub fn check_parallel(encoding: &[usize]) -> Validity {
    check(encoding)
}

fn build(encoding: &[usize]) -> Result<CircuitGraph, Validity> {
    CircuitGraph::from_encoding(encoding).map_err(|err| match err {
        CircuitError::BadUnit { .. } => Validity::InvalidUnit,
        _ => Validity::InvalidTopology,
    })
}

fn verdict(all_reached: bool) -> Validity {
    if all_reached {
        Validity::Valid
    } else {
        Validity::InvalidTopology
    }
}

/// Runs the forward pass and returns the two collector roots, ordered
/// concentrate first.
fn forward_pass(
    graph: &mut CircuitGraph,
    marks: &mut VisitMarks,
) -> Result<[SinkRoot; 2], Validity> {
    let scan = forward_scan(graph, marks);
    if scan.reached != graph.num_units() || scan.sinks.len() != 2 {
        return Err(Validity::InvalidTopology);
    }
    let limit = graph.tailings_sink();
    if scan.sinks.iter().any(|root| root.sink > limit) {
        return Err(Validity::InvalidTopology);
    }

    let mut sinks = scan.sinks;
    sinks.sort_by_key(|root| root.sink);
    let tailings = sinks.pop();
    let concentrate = sinks.pop();
    match (concentrate, tailings) {
        (Some(c), Some(t)) => Ok([c, t]),
        _ => Err(Validity::InvalidTopology),
    }
}

/// A collector met during the forward pass, with the units feeding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SinkRoot {
    pub(crate) sink: usize,
    pub(crate) feeders: Vec<usize>,
}

#[derive(Debug)]
pub(crate) struct ForwardScan {
    /// Distinct units visited, root included.
    pub(crate) reached: usize,
    /// Distinct collectors in order of discovery.
    pub(crate) sinks: Vec<SinkRoot>,
}

/// BFS from the feed entry. Fills predecessor sets in place.
pub(crate) fn forward_scan(graph: &mut CircuitGraph, marks: &mut VisitMarks) -> ForwardScan {
    marks.next_round();
    let root = graph.entry();
    let mut queue = VecDeque::from([root]);
    marks.visit(root);
    let mut reached = 1usize;
    let mut sinks: Vec<SinkRoot> = Vec::with_capacity(2);

    while let Some(id) = queue.pop_front() {
        for target in graph.unit(id).targets() {
            if graph.is_sink(target) {
                match sinks.iter_mut().find(|root| root.sink == target) {
                    Some(root) => root.feeders.push(id),
                    None => sinks.push(SinkRoot {
                        sink: target,
                        feeders: vec![id],
                    }),
                }
                continue;
            }
            graph.add_predecessor(target, id);
            if marks.visit(target) {
                queue.push_back(target);
                reached += 1;
            }
        }
    }

    ForwardScan { reached, sinks }
}

/// Counts the distinct units that can forward-reach `root.sink`.
pub(crate) fn reverse_reach(graph: &CircuitGraph, root: &SinkRoot, marks: &mut VisitMarks) -> usize {
    marks.next_round();
    let mut queue = VecDeque::with_capacity(graph.num_units());
    let mut count = 0usize;
    for &feeder in &root.feeders {
        if marks.visit(feeder) {
            queue.push_back(feeder);
            count += 1;
        }
    }

    while let Some(id) = queue.pop_front() {
        for &pred in graph.unit(id).predecessors() {
            if marks.visit(pred) {
                queue.push_back(pred);
                count += 1;
            }
        }
    }
    count
}

/// Generation-stamped visited flags.
///
/// A slot counts as visited when its stamp equals the current round, so
/// starting a new traversal costs one increment instead of a reset.
#[derive(Debug, Clone)]
pub(crate) struct VisitMarks {
    stamps: Vec<u32>,
    round: u32,
}

impl VisitMarks {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            stamps: vec![0; len],
            round: 0,
        }
    }

    pub(crate) fn next_round(&mut self) {
        self.round = self.round.wrapping_add(1);
        if self.round == 0 {
            self.stamps.iter_mut().for_each(|s| *s = 0);
            self.round = 1;
        }
    }

    /// Marks `id` visited; returns `false` if it already was this round.
    pub(crate) fn visit(&mut self, id: usize) -> bool {
        if self.stamps[id] == self.round {
            false
        } else {
            self.stamps[id] = self.round;
            true
        }
    }
}
