use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

use rand::Rng;

use crate::error::{Error, Result};

/// A weighted item set supporting proportional random sampling.
///
/// Each label carries a non-negative weight; [`random_pick`](Distribution::random_pick)
/// draws a label with probability `weight / total`. The random source is
/// injected by the caller so sampling stays deterministic under a fixed seed.
#[derive(Debug, Clone)]
pub struct Distribution<L: Eq + Hash + Clone> {
    weights: HashMap<L, f64>,
    order: Vec<L>,
    total: f64,
}

impl<L: Eq + Hash + Clone> Distribution<L> {
    pub fn new() -> Self {
        Self {
            weights: HashMap::new(),
            order: Vec::new(),
            total: 0.0,
        }
    }

    /// Adds `weight` to `label`, creating the entry on first use.
    /// `weight` must be non-negative.
    pub fn add(&mut self, label: L, weight: f64) {
        debug_assert!(weight >= 0.0, "weights must be non-negative");
        match self.weights.entry(label.clone()) {
            Entry::Occupied(mut e) => *e.get_mut() += weight,
            Entry::Vacant(e) => {
                e.insert(weight);
                self.order.push(label);
            }
        }
        self.total += weight;
    }

    pub fn weight(&self, label: &L) -> f64 {
        self.weights.get(label).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Fraction of the total weight carried by `label`; 0.0 when the
    /// distribution is empty.
    pub fn portion(&self, label: &L) -> f64 {
        if self.total == 0.0 {
            0.0
        } else {
            self.weight(label) / self.total
        }
    }

    /// Draws a label with probability proportional to its weight.
    ///
    /// Fails with [`Error::EmptyDistribution`] when the total weight is zero.
    pub fn random_pick<R: Rng>(&self, rng: &mut R) -> Result<&L> {
        if self.total <= 0.0 {
            return Err(Error::EmptyDistribution);
        }
        let mut remaining = rng.gen_range(0.0..self.total);
        let mut last_weighted = None;
        for label in &self.order {
            let weight = self.weights[label];
            if weight <= 0.0 {
                continue;
            }
            if remaining < weight {
                return Ok(label);
            }
            remaining -= weight;
            last_weighted = Some(label);
        }
        // Floating-point accumulation can walk just past the final entry.
        last_weighted.ok_or(Error::EmptyDistribution)
    }
}

impl<L: Eq + Hash + Clone> Default for Distribution<L> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Histogram;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_sampling_tracks_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut d = Distribution::new();
        d.add('a', 2.0);
        d.add('b', 4.0);

        let mut h = Histogram::new();
        for _ in 0..10_000 {
            h.bump(*d.random_pick(&mut rng).unwrap());
        }
        assert!((h.portion(&'a') - 1.0 / 3.0).abs() < 0.05);
        assert!((h.portion(&'b') - 2.0 / 3.0).abs() < 0.05);
    }

    #[test]
    fn test_weights_accumulate() {
        let mut d = Distribution::new();
        d.add("x", 1.5);
        d.add("x", 2.5);
        assert_eq!(d.weight(&"x"), 4.0);
        assert_eq!(d.total(), 4.0);
        assert_eq!(d.portion(&"x"), 1.0);
    }

    #[test]
    fn test_empty_pick_fails() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let d: Distribution<char> = Distribution::new();
        assert!(matches!(
            d.random_pick(&mut rng),
            Err(Error::EmptyDistribution)
        ));
    }

    #[test]
    fn test_zero_weight_pick_fails() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut d = Distribution::new();
        d.add('a', 0.0);
        assert!(matches!(
            d.random_pick(&mut rng),
            Err(Error::EmptyDistribution)
        ));
        assert_eq!(d.portion(&'a'), 0.0);
    }

    #[test]
    fn test_zero_weight_entries_never_drawn() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut d = Distribution::new();
        d.add('a', 0.0);
        d.add('b', 1.0);
        for _ in 0..100 {
            assert_eq!(d.random_pick(&mut rng).unwrap(), &'b');
        }
    }
}
