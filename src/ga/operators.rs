//! Genetic operators for circuit encodings.
//!
//! All operators work on `&[usize]` encodings of length `2n + 1` whose genes
//! lie in `[0, n + 2)`. Position 0 (the feed entry) is produced once by
//! [`random_circuit`] and never touched by crossover or mutation.
//!
//! # Operators
//!
//! - [`random_circuit`]: Candidate for the initial population
//! - [`prefix_crossover`]: Single-point exchange of a leading segment
//! - [`mutate`]: Per-gene modular offset
//! - [`adaptive_rate`]: Srinivas & Patnaik probability for one individual
//!
//! # References
//!
//! - Srinivas & Patnaik (1994), "Adaptive Probabilities of Crossover and
//!   Mutation in Genetic Algorithms"

use rand::seq::SliceRandom;
use rand::Rng;

use crate::circuit::encoding_len;

/// Draws a candidate circuit of `num_units` units.
///
/// The feed enters unit 0. The `2n` target genes hold every id in
/// `1..=n + 1` once, so each unit but the entry and both collectors appear as
/// a target at least once, plus `n - 1` uniformly drawn targets, shuffled.
/// The result is not necessarily a valid circuit.
///
/// # Panics
/// Panics if `num_units` is 0.
pub fn random_circuit<R: Rng>(num_units: usize, rng: &mut R) -> Vec<usize> {
    assert!(num_units > 0, "a circuit needs at least one unit");

    let span = num_units + 2;
    let mut targets: Vec<usize> = (1..=num_units + 1).collect();
    targets.extend((1..num_units).map(|_| rng.random_range(0..span)));
    targets.shuffle(rng);

    let mut encoding = Vec::with_capacity(encoding_len(num_units));
    encoding.push(0);
    encoding.extend(targets);
    encoding
}

/// Single-point crossover exchanging the segment `[1, point)`.
///
/// `point` is drawn from `1..=len`, so the exchanged segment may be empty
/// (children equal to their parents) or cover every target gene.
///
/// # Panics
/// Panics if the parents have different lengths or are empty.
pub fn prefix_crossover<R: Rng>(
    parent1: &[usize],
    parent2: &[usize],
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>) {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    assert!(n > 0, "parents must not be empty");

    let point = rng.random_range(1..=n);
    let mut child1 = parent1.to_vec();
    let mut child2 = parent2.to_vec();
    child1[1..point].copy_from_slice(&parent2[1..point]);
    child2[1..point].copy_from_slice(&parent1[1..point]);
    (child1, child2)
}

/// Mutates every target gene independently with probability `pm`.
///
/// A mutated gene becomes `(gene + offset) mod (n + 2)` with `offset`
/// uniform in `[0, n + 2)`. Returns the number of genes drawn for mutation.
pub fn mutate<R: Rng>(encoding: &mut [usize], pm: f64, num_units: usize, rng: &mut R) -> usize {
    let span = num_units + 2;
    let mut drawn = 0;
    for gene in encoding.iter_mut().skip(1) {
        if rng.random::<f64>() < pm {
            *gene = (*gene + rng.random_range(0..span)) % span;
            drawn += 1;
        }
    }
    drawn
}

/// Adaptive crossover or mutation probability for fitness `f`.
///
/// Returns `k_high * (fmax - f) / (fmax - favg)` when `f >= favg`, and
/// `k_low` otherwise or when the generation has no spread above its
/// average. The result is clamped into `[0, 1]`.
///
/// # Examples
///
/// ```
/// use u_separation::ga::operators::adaptive_rate;
///
/// // The best individual is never disrupted.
/// assert_eq!(adaptive_rate(1.0, 0.5, 10.0, 10.0, 5.0), 0.0);
/// // Below average uses the base rate.
/// assert_eq!(adaptive_rate(1.0, 0.5, 2.0, 10.0, 5.0), 0.5);
/// ```
pub fn adaptive_rate(k_high: f64, k_low: f64, f: f64, fmax: f64, favg: f64) -> f64 {
    let spread = fmax - favg;
    let degenerate = !(spread > f64::EPSILON * fmax.abs().max(1.0));
    let rate = if f >= favg && !degenerate {
        k_high * (fmax - f) / spread
    } else {
        k_low
    };
    if rate.is_nan() {
        return k_low.clamp(0.0, 1.0);
    }
    rate.clamp(0.0, 1.0)
}
