//! Fitness-proportionate parent selection.
//!
//! The wheel stores the cumulative normalized fitness of a generation once,
//! so every draw is a single binary search instead of a linear scan.
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*, ch. 1 (roulette wheel selection)

use rand::Rng;

/// Roulette wheel over non-negative fitness values.
///
/// Negative or non-finite weights count as zero. A wheel whose total weight
/// is not positive selects uniformly.
///
/// # Examples
///
/// ```
/// use u_separation::ga::RouletteWheel;
///
/// let wheel = RouletteWheel::new(&[1.0, 3.0]);
/// assert_eq!(wheel.cumulative(), &[0.25, 1.0]);
/// ```
#[derive(Debug, Clone)]
pub struct RouletteWheel {
    cumulative: Vec<f64>,
}

impl RouletteWheel {
    /// Builds the cumulative distribution of `fitness`.
    ///
    /// # Panics
    /// Panics if `fitness` is empty.
    pub fn new(fitness: &[f64]) -> Self {
        assert!(!fitness.is_empty(), "cannot select from empty population");

        let weights: Vec<f64> = fitness
            .iter()
            .map(|&f| if f.is_finite() && f > 0.0 { f } else { 0.0 })
            .collect();
        let total: f64 = weights.iter().sum();

        let n = weights.len();
        let mut cumulative = Vec::with_capacity(n);
        if total > 0.0 && total.is_finite() {
            let mut running = 0.0;
            for w in weights {
                running += w;
                cumulative.push(running / total);
            }
        } else {
            cumulative.extend((1..=n).map(|i| i as f64 / n as f64));
        }
        if let Some(last) = cumulative.last_mut() {
            *last = 1.0;
        }

        Self { cumulative }
    }

    /// Cumulative selection probabilities, non-decreasing and ending at 1.
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Number of individuals on the wheel.
    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// Draws an index with probability proportional to its weight.
    ///
    /// # Complexity
    /// O(log n)
    pub fn select<R: Rng>(&self, rng: &mut R) -> usize {
        let r: f64 = rng.random();
        self.cumulative
            .partition_point(|&c| c <= r)
            .min(self.cumulative.len() - 1)
    }

    /// Draws two distinct indices.
    ///
    /// The second parent is redrawn while it equals the first; after 64
    /// identical draws it is picked uniformly among the others. Returns
    /// `(i, i)` only for a single-individual wheel.
    pub fn select_pair<R: Rng>(&self, rng: &mut R) -> (usize, usize) {
        let first = self.select(rng);
        let n = self.len();
        if n == 1 {
            return (first, first);
        }
        for _ in 0..64 {
            let second = self.select(rng);
            if second != first {
                return (first, second);
            }
        }
        let offset = rng.random_range(1..n);
        (first, (first + offset) % n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_proportional_counts() {
        let wheel = RouletteWheel::new(&[1.0, 0.0, 3.0]);
        let mut rng = create_rng(42);

        let mut counts = [0u32; 3];
        let n = 20_000;
        for _ in 0..n {
            counts[wheel.select(&mut rng)] += 1;
        }
        assert_eq!(counts[1], 0, "zero weight must never be drawn");
        let share = counts[2] as f64 / n as f64;
        assert!((share - 0.75).abs() < 0.02, "expected ~75%, got {share}");
    }

    #[test]
    fn test_cumulative_probabilities() {
        let wheel = RouletteWheel::new(&[5.0, 15.0, 20.0, 25.0, 15.0, 5.0, 15.0]);
        let expected = [0.05, 0.2, 0.4, 0.65, 0.8, 0.85, 1.0];
        assert_eq!(wheel.len(), expected.len());
        for (&got, &want) in wheel.cumulative().iter().zip(&expected) {
            assert_relative_eq!(got, want, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_degenerate_wheel_is_uniform() {
        let wheel = RouletteWheel::new(&[0.0, -5.0, f64::NAN, 0.0]);
        assert_eq!(wheel.cumulative(), &[0.25, 0.5, 0.75, 1.0]);

        let mut rng = create_rng(42);
        let mut counts = [0u32; 4];
        for _ in 0..10_000 {
            counts[wheel.select(&mut rng)] += 1;
        }
        for &c in &counts {
            assert!(c > 2_000, "expected uniform, got counts: {counts:?}");
        }
    }

    #[test]
    fn test_single_individual() {
        let wheel = RouletteWheel::new(&[5.0]);
        let mut rng = create_rng(1);
        assert_eq!(wheel.select(&mut rng), 0);
        assert_eq!(wheel.select_pair(&mut rng), (0, 0));
    }

    #[test]
    fn test_pair_is_distinct_even_when_one_dominates() {
        let wheel = RouletteWheel::new(&[0.0, 1.0, 0.0]);
        let mut rng = create_rng(42);
        for _ in 0..200 {
            let (a, b) = wheel.select_pair(&mut rng);
            assert_ne!(a, b);
            assert_eq!(a, 1);
        }
    }

    #[test]
    #[should_panic(expected = "empty population")]
    fn test_empty_panics() {
        RouletteWheel::new(&[]);
    }

    proptest! {
        #[test]
        fn prop_cumulative_monotone_ending_at_one(
            fitness in prop::collection::vec(0.0f64..1e5, 1..64),
        ) {
            let wheel = RouletteWheel::new(&fitness);
            let c = wheel.cumulative();
            prop_assert_eq!(c.len(), fitness.len());
            for w in c.windows(2) {
                prop_assert!(w[0] <= w[1]);
            }
            prop_assert!(c.iter().all(|&p| (0.0..=1.0).contains(&p)));
            assert_relative_eq!(c[c.len() - 1], 1.0);
        }

        #[test]
        fn prop_select_in_bounds(
            fitness in prop::collection::vec(-10.0f64..1e3, 1..32),
            seed in any::<u64>(),
        ) {
            let wheel = RouletteWheel::new(&fitness);
            let mut rng = create_rng(seed);
            for _ in 0..16 {
                prop_assert!(wheel.select(&mut rng) < fitness.len());
            }
        }
    }
}
